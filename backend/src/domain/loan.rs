//! Loan and repayment entities plus the amount policy.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::UserId;

/// Fixed markup applied to the requested amount to obtain the OTR amount.
///
/// Provisional policy until pricing rules are finalised.
pub const OTR_MARKUP_RATE: f64 = 0.3;

const CONTRACT_NUMBER_MAX: usize = 64;

/// Compute the on-the-road amount: base amount plus the fixed markup.
///
/// # Examples
/// ```
/// use loan_origination::domain::calculate_otr_amount;
///
/// assert_eq!(calculate_otr_amount(1000.0), 1300.0);
/// ```
pub fn calculate_otr_amount(amount: f64) -> f64 {
    amount + amount * OTR_MARKUP_RATE
}

/// Principal financed after the down payment.
///
/// # Examples
/// ```
/// use loan_origination::domain::principal_amount;
///
/// assert_eq!(principal_amount(1300.0, 300.0), 1000.0);
/// ```
pub fn principal_amount(otr_amount: f64, down_payment: f64) -> f64 {
    otr_amount - down_payment
}

/// Validation errors for loan value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoanValidationError {
    #[error("contract number must not be empty")]
    EmptyContractNumber,
    #[error("contract number must be at most {max} characters")]
    ContractNumberTooLong { max: usize },
    #[error("unknown loan status: {value}")]
    UnknownStatus { value: String },
    #[error("unknown loan type: {value}")]
    UnknownLoanType { value: String },
}

/// Contract number, unique per user.
///
/// # Examples
/// ```
/// use loan_origination::domain::ContractNumber;
///
/// let number = ContractNumber::new("  KTR-001 ").expect("valid");
/// assert_eq!(number.as_ref(), "KTR-001");
/// assert!(ContractNumber::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractNumber(String);

impl ContractNumber {
    /// Trim and validate a raw contract number.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LoanValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LoanValidationError::EmptyContractNumber);
        }
        if trimmed.chars().count() > CONTRACT_NUMBER_MAX {
            return Err(LoanValidationError::ContractNumberTooLong {
                max: CONTRACT_NUMBER_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ContractNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ContractNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Active,
    Inactive,
    Rejected,
}

impl LoanStatus {
    /// Upper-case name stored in the `status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Rejected => "REJECTED",
        }
    }
}

impl FromStr for LoanStatus {
    type Err = LoanValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(LoanValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset category financed by a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanTypeName {
    Car,
    Bike,
    WhiteGoods,
}

impl LoanTypeName {
    /// Name stored in the `loan_types` table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Car => "CAR",
            Self::Bike => "BIKE",
            Self::WhiteGoods => "WHITE_GOODS",
        }
    }
}

impl FromStr for LoanTypeName {
    type Err = LoanValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "CAR" => Ok(Self::Car),
            "BIKE" => Ok(Self::Bike),
            "WHITE_GOODS" => Ok(Self::WhiteGoods),
            other => Err(LoanValidationError::UnknownLoanType {
                value: other.to_owned(),
            }),
        }
    }
}

impl std::fmt::Display for LoanTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference data row describing the asset category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanType {
    pub id: i16,
    pub name: LoanTypeName,
}

/// Reference data row describing the credit limit tier.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitType {
    pub id: i16,
    pub amount: Option<f64>,
    pub term: i16,
}

/// Loan ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
    pub user_id: UserId,
    pub contract_number: ContractNumber,
    pub otr_amount: f64,
    pub principal_amount: f64,
    pub asset_name: String,
    pub loan_type_id: Option<i16>,
    pub limit_type_id: Option<i16>,
    pub status: Option<LoanStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub interest_rate: Option<f64>,
}

/// Stored loan joined with its reference data.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanDetails {
    pub id: i64,
    pub user_id: UserId,
    pub contract_number: ContractNumber,
    pub otr_amount: f64,
    pub principal_amount: f64,
    pub asset_name: String,
    pub loan_type: Option<LoanType>,
    pub limit_type: Option<LimitType>,
    pub status: Option<LoanStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub interest_rate: Option<f64>,
}

/// Repayment ready to be persisted against an existing loan.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoanPayment {
    pub loan_id: i64,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub channel: String,
}

/// Stored repayment. Belongs to exactly one loan.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanPayment {
    pub id: i64,
    pub loan_id: i64,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub channel: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1000.0, 1300.0)]
    #[case(0.0, 0.0)]
    #[case(200.0, 260.0)]
    fn otr_adds_thirty_percent(#[case] amount: f64, #[case] expected: f64) {
        assert!((calculate_otr_amount(amount) - expected).abs() < 1e-9);
    }

    #[rstest]
    fn otr_of_one_thousand_is_exact() {
        assert_eq!(calculate_otr_amount(1000.0), 1300.0);
    }

    #[rstest]
    fn principal_subtracts_down_payment() {
        assert_eq!(principal_amount(1300.0, 300.0), 1000.0);
    }

    #[rstest]
    #[case("ACTIVE", LoanStatus::Active)]
    #[case("INACTIVE", LoanStatus::Inactive)]
    #[case(" REJECTED ", LoanStatus::Rejected)]
    fn parses_statuses(#[case] raw: &str, #[case] expected: LoanStatus) {
        assert_eq!(raw.parse::<LoanStatus>(), Ok(expected));
        assert_eq!(expected.to_string(), raw.trim());
    }

    #[rstest]
    fn rejects_unknown_status() {
        assert!(matches!(
            "active".parse::<LoanStatus>(),
            Err(LoanValidationError::UnknownStatus { .. })
        ));
    }

    #[rstest]
    #[case("CAR", LoanTypeName::Car)]
    #[case("BIKE", LoanTypeName::Bike)]
    #[case("WHITE_GOODS", LoanTypeName::WhiteGoods)]
    fn parses_loan_types(#[case] raw: &str, #[case] expected: LoanTypeName) {
        assert_eq!(raw.parse::<LoanTypeName>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn contract_number_rejects_overlong_values() {
        let raw = "x".repeat(CONTRACT_NUMBER_MAX + 1);
        assert_eq!(
            ContractNumber::new(raw),
            Err(LoanValidationError::ContractNumberTooLong {
                max: CONTRACT_NUMBER_MAX
            })
        );
    }
}
