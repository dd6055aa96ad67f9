//! Wire DTOs for the verification gateway.
//!
//! Requests borrow from the domain checks; responses decode into DTOs first
//! and are then mapped into domain verdicts in one pass.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::domain::{
    IdentityCheck, IdentityVerification, PhotoCheck, PhotoVerification, SalaryCheck,
    SalaryVerification,
};

#[derive(Debug, Serialize)]
pub(super) struct IdentityRequestDto<'a> {
    pub(super) nik: &'a str,
    pub(super) name: &'a str,
    pub(super) birth_date: &'a str,
    pub(super) reference_id: &'a str,
}

impl<'a> From<&'a IdentityCheck> for IdentityRequestDto<'a> {
    fn from(check: &'a IdentityCheck) -> Self {
        Self {
            nik: check.national_id.as_str(),
            name: check.legal_name.as_str(),
            birth_date: check.birth_date.as_str(),
            reference_id: check.reference_id.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SalaryRequestDto<'a> {
    pub(super) national_id: &'a str,
    pub(super) name: &'a str,
    pub(super) salary: &'a str,
    pub(super) reference_id: &'a str,
}

impl<'a> From<&'a SalaryCheck> for SalaryRequestDto<'a> {
    fn from(check: &'a SalaryCheck) -> Self {
        Self {
            national_id: check.national_id.as_str(),
            name: check.legal_name.as_str(),
            salary: check.salary.as_str(),
            reference_id: check.reference_id.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PhotoRequestDto<'a> {
    pub(super) national_id: &'a str,
    pub(super) name: &'a str,
    pub(super) national_id_photo: String,
    pub(super) user_photo: String,
    pub(super) reference_id: &'a str,
}

impl<'a> From<&'a PhotoCheck> for PhotoRequestDto<'a> {
    fn from(check: &'a PhotoCheck) -> Self {
        Self {
            national_id: check.national_id.as_str(),
            name: check.legal_name.as_str(),
            national_id_photo: STANDARD.encode(&check.national_id_photo),
            user_photo: STANDARD.encode(&check.user_photo),
            reference_id: check.reference_id.as_str(),
        }
    }
}

/// Outer envelope shared by every gateway response.
#[derive(Debug, Deserialize)]
pub(super) struct GatewayResponseDto<T> {
    #[serde(default)]
    pub(super) message: String,
    pub(super) data: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct VerificationDataDto {
    #[serde(default)]
    pub(super) nik: bool,
    #[serde(default)]
    pub(super) name: bool,
    #[serde(default)]
    pub(super) birth_date: bool,
    pub(super) salary_upper: Option<String>,
    pub(super) salary_lower: Option<String>,
    #[serde(default)]
    pub(super) reference_id: String,
}

impl From<VerificationDataDto> for IdentityVerification {
    fn from(data: VerificationDataDto) -> Self {
        Self {
            national_id_matched: data.nik,
            name_matched: data.name,
            birth_date_matched: data.birth_date,
            reference_id: data.reference_id,
        }
    }
}

impl From<VerificationDataDto> for SalaryVerification {
    fn from(data: VerificationDataDto) -> Self {
        Self {
            lower_bound: data.salary_lower,
            upper_bound: data.salary_upper,
            reference_id: data.reference_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PhotoDataDto {
    #[serde(default)]
    pub(super) status: String,
}

impl From<PhotoDataDto> for PhotoVerification {
    fn from(data: PhotoDataDto) -> Self {
        Self {
            status: data.status,
        }
    }
}
