//! Driving port for loan mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ContractNumber, Error, LoanStatus, UserId};

/// Request to originate a loan for an authenticated user.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateLoanRequest {
    pub user_id: UserId,
    pub contract_number: ContractNumber,
    /// Base amount before the OTR markup.
    pub amount: f64,
    pub down_payment: f64,
    pub asset_name: String,
    pub loan_type_id: Option<i16>,
    pub limit_type_id: Option<i16>,
    pub status: Option<LoanStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub interest_rate: Option<f64>,
}

/// Request to record a repayment on one of the user's loans.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateLoanPaymentRequest {
    pub user_id: UserId,
    pub contract_number: ContractNumber,
    pub amount: f64,
    pub channel: String,
    /// Defaults to the current time when absent.
    pub date: Option<DateTime<Utc>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanCommand: Send + Sync {
    /// Price and persist a new loan.
    async fn create_loan(&self, request: CreateLoanRequest) -> Result<(), Error>;

    /// Record a repayment against an existing loan.
    async fn create_loan_payment(&self, request: CreateLoanPaymentRequest) -> Result<(), Error>;
}

/// Fixture implementation accepting every command.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoanCommand;

#[async_trait]
impl LoanCommand for FixtureLoanCommand {
    async fn create_loan(&self, _request: CreateLoanRequest) -> Result<(), Error> {
        Ok(())
    }

    async fn create_loan_payment(&self, _request: CreateLoanPaymentRequest) -> Result<(), Error> {
        Ok(())
    }
}
