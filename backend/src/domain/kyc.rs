//! Know-your-customer check payloads and verification outcomes.
//!
//! These types cross the [`crate::domain::ports::KycGateway`] boundary. They
//! carry applicant data out and the gateway's verdicts back in; acceptance
//! rules live here so adapters stay thin.

use std::str::FromStr;

use uuid::Uuid;

use crate::domain::TraceId;

/// Gateway status literal marking an accepted photo comparison.
pub const PHOTO_VALID_STATUS: &str = "valid";

/// Correlation id attached to every verification call of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceId(String);

impl ReferenceId {
    /// Wrap an existing identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Use the active request trace id, or mint a fresh UUID outside a
    /// request scope.
    pub fn for_current_request() -> Self {
        let id = TraceId::current()
            .map(|trace_id| *trace_id.as_uuid())
            .unwrap_or_else(Uuid::new_v4);
        Self(id.to_string())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity check sent to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityCheck {
    /// National id number to look up.
    pub national_id: String,
    /// Name as it appears on the national id.
    pub legal_name: String,
    /// Declared birth date, passed through unparsed.
    pub birth_date: String,
    /// Correlation id shared by every check in one request.
    pub reference_id: ReferenceId,
}

/// Salary range check sent to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryCheck {
    /// National id number of the applicant.
    pub national_id: String,
    /// Name as it appears on the national id.
    pub legal_name: String,
    /// Declared monthly salary as submitted.
    pub salary: String,
    /// Correlation id shared by every check in one request.
    pub reference_id: ReferenceId,
}

/// Photo comparison check sent to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoCheck {
    /// National id number of the applicant.
    pub national_id: String,
    /// Name as it appears on the national id.
    pub legal_name: String,
    /// Raw bytes of the national id card photo.
    pub national_id_photo: Vec<u8>,
    /// Raw bytes of the applicant's selfie.
    pub user_photo: Vec<u8>,
    /// Correlation id shared by every check in one request.
    pub reference_id: ReferenceId,
}

/// Gateway verdict for an identity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityVerification {
    /// Whether the national id matched a registry record.
    pub national_id_matched: bool,
    /// Whether the legal name matched that record.
    pub name_matched: bool,
    /// Whether the birth date matched that record.
    pub birth_date_matched: bool,
    /// Reference id echoed by the gateway.
    pub reference_id: String,
}

impl IdentityVerification {
    /// The identity is accepted when the national id matches.
    pub fn is_confirmed(&self) -> bool {
        self.national_id_matched
    }
}

/// Gateway verdict for a salary check: the accepted range as reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryVerification {
    /// Exclusive lower bound of the accepted salary range.
    pub lower_bound: Option<String>,
    /// Exclusive upper bound of the accepted salary range.
    pub upper_bound: Option<String>,
    /// Reference id echoed by the gateway.
    pub reference_id: String,
}

impl SalaryVerification {
    /// Parse the reported bounds into a numeric band.
    ///
    /// # Errors
    /// Returns [`SalaryBandError`] when either bound is missing or not a
    /// number.
    pub fn band(&self) -> Result<SalaryBand, SalaryBandError> {
        let lower = parse_bound("salary_lower", self.lower_bound.as_deref())?;
        let upper = parse_bound("salary_upper", self.upper_bound.as_deref())?;
        Ok(SalaryBand { lower, upper })
    }
}

fn parse_bound(name: &'static str, raw: Option<&str>) -> Result<f64, SalaryBandError> {
    let raw = raw.ok_or(SalaryBandError::Missing { bound: name })?;
    f64::from_str(raw.trim()).map_err(|_| SalaryBandError::Invalid {
        bound: name,
        value: raw.to_owned(),
    })
}

/// Errors raised while interpreting gateway salary bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SalaryBandError {
    #[error("gateway omitted {bound}")]
    Missing { bound: &'static str },
    #[error("gateway returned non-numeric {bound}: {value}")]
    Invalid { bound: &'static str, value: String },
}

/// Open salary interval accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryBand {
    lower: f64,
    upper: f64,
}

impl SalaryBand {
    /// Construct a band from explicit bounds.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Strict on both sides: salaries equal to a bound are rejected.
    ///
    /// # Examples
    /// ```
    /// use loan_origination::domain::SalaryBand;
    ///
    /// let band = SalaryBand::new(1000.0, 5000.0);
    /// assert!(band.contains(1000.01));
    /// assert!(!band.contains(1000.0));
    /// assert!(!band.contains(5000.0));
    /// ```
    pub fn contains(&self, salary: f64) -> bool {
        self.lower < salary && salary < self.upper
    }
}

/// Gateway verdict for a photo comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVerification {
    /// Comparison status reported by the gateway.
    pub status: String,
}

impl PhotoVerification {
    /// Accepted only on the exact, case-sensitive `"valid"` status.
    pub fn is_valid(&self) -> bool {
        self.status == PHOTO_VALID_STATUS
    }
}
