//! Driving port for applicant validation.

use async_trait::async_trait;

use crate::domain::{Error, UserId};

/// Applicant data submitted for verification. Not persisted as-is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationRequest {
    pub national_id: String,
    pub full_name: Option<String>,
    pub legal_name: String,
    pub birth_place: Option<String>,
    /// Calendar date as `YYYY-MM-DD`; unparseable values are tolerated.
    pub birth_date: String,
    /// Declared salary in decimal string form.
    pub salary: String,
    pub national_id_photo: Vec<u8>,
    pub user_photo: Vec<u8>,
}

/// Runs identity, salary, and photo verification for an applicant and
/// records the outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserValidation: Send + Sync {
    /// Returns whether the validation pass completed.
    ///
    /// A check the gateway declines is not an error; any lookup, gateway, or
    /// store failure is.
    async fn validate_data(
        &self,
        user_id: UserId,
        request: ValidationRequest,
    ) -> Result<bool, Error>;
}

/// Fixture implementation accepting every applicant.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserValidation;

#[async_trait]
impl UserValidation for FixtureUserValidation {
    async fn validate_data(
        &self,
        _user_id: UserId,
        _request: ValidationRequest,
    ) -> Result<bool, Error> {
        Ok(true)
    }
}
