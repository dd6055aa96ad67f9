//! Verification gateway outbound adapters.
//!
//! A thin HTTP implementation of the `KycGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::{DEFAULT_KYC_APP_ID, HttpKycGateway, KycClientBuildError, KycCredentials};
