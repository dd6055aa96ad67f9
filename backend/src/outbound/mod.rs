//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **kyc**: reqwest-backed verification gateway client
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod kyc;
pub mod persistence;
