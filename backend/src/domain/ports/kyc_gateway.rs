//! Port for the external know-your-customer verification service.

use async_trait::async_trait;

use crate::domain::{
    IdentityCheck, IdentityVerification, PhotoCheck, PhotoVerification, SalaryCheck,
    SalaryVerification,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by verification gateway adapters.
    pub enum KycGatewayError {
        /// The request could not be delivered or timed out.
        Transport { message: String } => "kyc gateway transport failed: {message}",
        /// The gateway answered with a status other than 200.
        UnexpectedStatus { status: u16, message: String } =>
            "kyc gateway returned status {status}: {message}",
        /// The response body did not match the expected shape.
        Decode { message: String } => "kyc gateway response could not be decoded: {message}",
    }
}

/// Three independent verification calls. Each call is a single request with
/// no retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KycGateway: Send + Sync {
    /// Match national id, legal name, and birth date against the registry.
    async fn verify_identity(
        &self,
        check: &IdentityCheck,
    ) -> Result<IdentityVerification, KycGatewayError>;

    /// Obtain the salary band the registry associates with the applicant.
    async fn verify_salary(&self, check: &SalaryCheck)
    -> Result<SalaryVerification, KycGatewayError>;

    /// Compare the national id photo with the applicant's photo.
    async fn verify_photo(&self, check: &PhotoCheck) -> Result<PhotoVerification, KycGatewayError>;
}

/// Fixture gateway that confirms every check.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureKycGateway;

#[async_trait]
impl KycGateway for FixtureKycGateway {
    async fn verify_identity(
        &self,
        check: &IdentityCheck,
    ) -> Result<IdentityVerification, KycGatewayError> {
        Ok(IdentityVerification {
            national_id_matched: true,
            name_matched: true,
            birth_date_matched: true,
            reference_id: check.reference_id.to_string(),
        })
    }

    async fn verify_salary(
        &self,
        check: &SalaryCheck,
    ) -> Result<SalaryVerification, KycGatewayError> {
        Ok(SalaryVerification {
            lower_bound: Some("0".to_owned()),
            upper_bound: Some(f64::MAX.to_string()),
            reference_id: check.reference_id.to_string(),
        })
    }

    async fn verify_photo(&self, _check: &PhotoCheck) -> Result<PhotoVerification, KycGatewayError> {
        Ok(PhotoVerification {
            status: crate::domain::PHOTO_VALID_STATUS.to_owned(),
        })
    }
}
