//! Domain primitives, services, and ports.
//!
//! Purpose: hold the loan-origination rules independent of HTTP, SQL, or the
//! verification vendor's wire format.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: closed failure taxonomy shared by every layer.
//! - `TraceId`: request-scoped correlation identifier.
//! - `UserId`, `UserRecord`: applicant identity and validation state.
//! - KYC check and verification types, including `SalaryBand`.
//! - Loan entities and the OTR/principal policy.
//! - `price_loan`: I/O-free loan term checks run before verification.
//! - `UserValidationService` and `LoanService`: driving port implementations.

pub mod error;
pub mod kyc;
pub mod loan;
pub mod loan_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_validation;

pub use self::error::{Error, ErrorCode};
pub use self::kyc::{
    IdentityCheck, IdentityVerification, PHOTO_VALID_STATUS, PhotoCheck, PhotoVerification,
    ReferenceId, SalaryBand, SalaryBandError, SalaryCheck, SalaryVerification,
};
pub use self::loan::{
    ContractNumber, LimitType, LoanDetails, LoanPayment, LoanStatus, LoanType, LoanTypeName,
    LoanValidationError, NewLoan, NewLoanPayment, OTR_MARKUP_RATE, calculate_otr_amount,
    principal_amount,
};
pub use self::loan_service::{LoanPricing, LoanService, price_loan};
pub use self::trace_id::TraceId;
pub use self::user::{UserId, UserIdError, UserRecord};
pub use self::user_validation::UserValidationService;

/// Response header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
