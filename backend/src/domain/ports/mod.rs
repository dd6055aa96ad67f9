//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`UserRepository`, `KycGateway`, `LoanRepository`) are
//! implemented by outbound adapters. Driving ports (`UserValidation`,
//! `LoanCommand`, `LoanQuery`) are implemented by domain services and
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod kyc_gateway;
mod loan_command;
mod loan_query;
mod loan_repository;
mod user_repository;
mod user_validation;

#[cfg(test)]
pub use kyc_gateway::MockKycGateway;
pub use kyc_gateway::{FixtureKycGateway, KycGateway, KycGatewayError};
#[cfg(test)]
pub use loan_command::MockLoanCommand;
pub use loan_command::{
    CreateLoanPaymentRequest, CreateLoanRequest, FixtureLoanCommand, LoanCommand,
};
#[cfg(test)]
pub use loan_query::MockLoanQuery;
pub use loan_query::{FixtureLoanQuery, LoanQuery};
#[cfg(test)]
pub use loan_repository::MockLoanRepository;
pub use loan_repository::{FixtureLoanRepository, LoanRepository, LoanRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_validation::MockUserValidation;
pub use user_validation::{FixtureUserValidation, UserValidation, ValidationRequest};
