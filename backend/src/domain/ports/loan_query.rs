//! Driving port for loan read-backs scoped to the authenticated user.

use async_trait::async_trait;

use crate::domain::{ContractNumber, Error, LoanDetails, LoanPayment, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanQuery: Send + Sync {
    /// Fetch a loan; absent loans are [`crate::domain::ErrorCode::NotFound`].
    async fn get_loan(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<LoanDetails, Error>;

    /// List repayments of a loan. Unknown contracts yield an empty list.
    async fn list_payments(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<Vec<LoanPayment>, Error>;
}

/// Fixture implementation with no loans on record.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoanQuery;

#[async_trait]
impl LoanQuery for FixtureLoanQuery {
    async fn get_loan(
        &self,
        _user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<LoanDetails, Error> {
        Err(Error::not_found(format!("loan {contract_number} not found")))
    }

    async fn list_payments(
        &self,
        _user_id: UserId,
        _contract_number: &ContractNumber,
    ) -> Result<Vec<LoanPayment>, Error> {
        Ok(Vec::new())
    }
}
