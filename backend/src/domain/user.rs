//! Applicant identity and the user record mutated by validation passes.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Validation errors for [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    #[error("user id must be a positive integer, got {value}")]
    NotPositive { value: i64 },
    #[error("user id must be numeric: {raw}")]
    NotNumeric { raw: String },
}

/// Authenticated user identifier.
///
/// ## Invariants
/// - Always strictly positive; zero means "no user".
///
/// # Examples
/// ```
/// use loan_origination::domain::UserId;
///
/// let id: UserId = "42".parse().expect("numeric id");
/// assert_eq!(id.as_i64(), 42);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and construct a user id.
    pub fn new(value: i64) -> Result<Self, UserIdError> {
        if value <= 0 {
            return Err(UserIdError::NotPositive { value });
        }
        Ok(Self(value))
    }

    /// Raw numeric value.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| UserIdError::NotNumeric { raw: s.to_owned() })?;
        Self::new(value)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Durable applicant record and the in-flight mutation buffer of a
/// validation pass.
///
/// Optional fields left as `None` never overwrite stored values. The three
/// validity flags are independent; a record may be partially validated.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: UserId,
    pub national_id: Option<String>,
    pub full_name: Option<String>,
    pub legal_name: Option<String>,
    pub birth_place: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub national_id_photo: Option<Vec<u8>>,
    pub user_photo: Option<Vec<u8>>,
    pub is_national_id_validated: bool,
    pub is_photo_validated: bool,
    pub is_salary_validated: bool,
    pub updated_by: Option<String>,
}

impl UserRecord {
    /// Fresh buffer carrying only the record id.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            national_id: None,
            full_name: None,
            legal_name: None,
            birth_place: None,
            birth_date: None,
            salary: None,
            national_id_photo: None,
            user_photo: None,
            is_national_id_validated: false,
            is_photo_validated: false,
            is_salary_validated: false,
            updated_by: None,
        }
    }

    /// True once identity, salary, and photo have all been verified.
    pub fn is_fully_validated(&self) -> bool {
        self.is_national_id_validated && self.is_salary_validated && self.is_photo_validated
    }
}
