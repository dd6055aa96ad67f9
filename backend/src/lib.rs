//! Loan-origination service library.
//!
//! Hexagonal layout: `domain` holds the rules and ports, `inbound` the HTTP
//! adapter, `outbound` the PostgreSQL and verification gateway adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
pub use settings::AppSettings;
