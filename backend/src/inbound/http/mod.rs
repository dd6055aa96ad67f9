//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod health;
pub mod loans;
pub mod schemas;
pub mod state;

pub use error::{ApiResult, json_config};
