//! Applicant validation orchestrator.
//!
//! Sequences the identity, salary, and photo checks against the KYC gateway
//! and writes the outcome back to the user store. A first-time applicant gets
//! all three checks; a known applicant only re-runs the checks still
//! outstanding. Nothing is written until every check in the pass has
//! returned, so a failed call leaves the store untouched.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::ports::{
    KycGateway, KycGatewayError, UserPersistenceError, UserRepository, UserValidation,
    ValidationRequest,
};
use crate::domain::{
    Error, IdentityCheck, PhotoCheck, ReferenceId, SalaryCheck, UserId, UserRecord,
};

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

fn map_user_error(error: UserPersistenceError) -> Error {
    Error::internal(error.to_string())
}

fn map_gateway_error(error: KycGatewayError) -> Error {
    Error::internal(error.to_string())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_owned)
}

fn non_empty_bytes(bytes: &[u8]) -> Option<Vec<u8>> {
    (!bytes.is_empty()).then(|| bytes.to_vec())
}

/// Orchestrates verification calls for one applicant per invocation.
#[derive(Clone)]
pub struct UserValidationService<U, K> {
    users: Arc<U>,
    kyc: Arc<K>,
}

impl<U, K> UserValidationService<U, K> {
    /// Create a new orchestrator over a user store and a KYC gateway.
    pub fn new(users: Arc<U>, kyc: Arc<K>) -> Self {
        Self { users, kyc }
    }
}

impl<U, K> UserValidationService<U, K>
where
    U: UserRepository,
    K: KycGateway,
{
    async fn validate_new_applicant(
        &self,
        user_id: UserId,
        request: &ValidationRequest,
        reference_id: &ReferenceId,
    ) -> Result<bool, Error> {
        let mut buffer = UserRecord::new(user_id);
        self.check_identity(&mut buffer, request, reference_id).await?;
        self.check_salary(&mut buffer, request, reference_id).await?;
        self.check_photo(&mut buffer, request, reference_id).await?;

        buffer.updated_by = Some(user_id.to_string());
        self.users
            .update_by_id(&buffer)
            .await
            .map_err(map_user_error)
            .map_err(|err| err.with_context("persist validated applicant"))?;

        info!(
            %user_id,
            %reference_id,
            identity = buffer.is_national_id_validated,
            salary = buffer.is_salary_validated,
            photo = buffer.is_photo_validated,
            "first-time applicant validated"
        );
        Ok(true)
    }

    async fn revalidate(
        &self,
        user_id: UserId,
        mut record: UserRecord,
        request: &ValidationRequest,
        reference_id: &ReferenceId,
    ) -> Result<bool, Error> {
        let mut rechecked = false;
        // Gated on the identity flag, not the salary flag.
        if !record.is_national_id_validated {
            self.check_salary(&mut record, request, reference_id).await?;
            rechecked = true;
        }
        if !record.is_photo_validated {
            self.check_photo(&mut record, request, reference_id).await?;
            rechecked = true;
        }

        if rechecked {
            record.updated_by = Some(user_id.to_string());
            self.users
                .update_by_id(&record)
                .await
                .map_err(map_user_error)
                .map_err(|err| err.with_context("persist revalidated applicant"))?;
        }

        debug!(%user_id, %reference_id, rechecked, "known applicant revalidated");
        Ok(true)
    }

    async fn check_identity(
        &self,
        buffer: &mut UserRecord,
        request: &ValidationRequest,
        reference_id: &ReferenceId,
    ) -> Result<(), Error> {
        let verdict = self
            .kyc
            .verify_identity(&IdentityCheck {
                national_id: request.national_id.clone(),
                legal_name: request.legal_name.clone(),
                birth_date: request.birth_date.clone(),
                reference_id: reference_id.clone(),
            })
            .await
            .map_err(map_gateway_error)
            .map_err(|err| err.with_context("identity check"))?;

        if !verdict.is_confirmed() {
            debug!(%reference_id, "identity not confirmed by gateway");
            return Ok(());
        }

        buffer.birth_date =
            NaiveDate::parse_from_str(request.birth_date.trim(), BIRTH_DATE_FORMAT).ok();
        buffer.national_id = Some(request.national_id.clone());
        buffer.legal_name = Some(request.legal_name.clone());
        buffer.full_name = non_empty(request.full_name.as_deref());
        buffer.birth_place = non_empty(request.birth_place.as_deref());
        buffer.is_national_id_validated = true;
        Ok(())
    }

    async fn check_salary(
        &self,
        buffer: &mut UserRecord,
        request: &ValidationRequest,
        reference_id: &ReferenceId,
    ) -> Result<(), Error> {
        let declared = f64::from_str(request.salary.trim()).map_err(|_| {
            Error::invalid_request(format!("salary is not a number: {:?}", request.salary))
        })?;

        let verdict = self
            .kyc
            .verify_salary(&SalaryCheck {
                national_id: request.national_id.clone(),
                legal_name: request.legal_name.clone(),
                salary: request.salary.clone(),
                reference_id: reference_id.clone(),
            })
            .await
            .map_err(map_gateway_error)
            .map_err(|err| err.with_context("salary check"))?;

        let band = verdict
            .band()
            .map_err(|err| Error::internal(err.to_string()).with_context("salary check"))?;

        if !band.contains(declared) {
            debug!(%reference_id, "declared salary outside gateway band");
            return Ok(());
        }

        buffer.salary = Some(declared);
        buffer.is_salary_validated = true;
        Ok(())
    }

    async fn check_photo(
        &self,
        buffer: &mut UserRecord,
        request: &ValidationRequest,
        reference_id: &ReferenceId,
    ) -> Result<(), Error> {
        let verdict = self
            .kyc
            .verify_photo(&PhotoCheck {
                national_id: request.national_id.clone(),
                legal_name: request.legal_name.clone(),
                national_id_photo: request.national_id_photo.clone(),
                user_photo: request.user_photo.clone(),
                reference_id: reference_id.clone(),
            })
            .await
            .map_err(map_gateway_error)
            .map_err(|err| err.with_context("photo check"))?;

        if !verdict.is_valid() {
            debug!(%reference_id, status = %verdict.status, "photo not accepted");
            return Ok(());
        }

        buffer.national_id_photo = non_empty_bytes(&request.national_id_photo);
        buffer.user_photo = non_empty_bytes(&request.user_photo);
        buffer.is_photo_validated = true;
        Ok(())
    }
}

#[async_trait]
impl<U, K> UserValidation for UserValidationService<U, K>
where
    U: UserRepository,
    K: KycGateway,
{
    async fn validate_data(
        &self,
        user_id: UserId,
        request: ValidationRequest,
    ) -> Result<bool, Error> {
        if request.national_id.trim().is_empty() {
            return Err(Error::invalid_request("national id is required"));
        }

        let reference_id = ReferenceId::for_current_request();
        let existing = self
            .users
            .find_by_national_id(&request.national_id)
            .await
            .map_err(map_user_error)
            .map_err(|err| err.with_context("look up applicant"))?;

        match existing {
            None => self.validate_new_applicant(user_id, &request, &reference_id).await,
            Some(record) => self.revalidate(user_id, record, &request, &reference_id).await,
        }
    }
}

#[cfg(test)]
#[path = "user_validation_tests.rs"]
mod tests;
