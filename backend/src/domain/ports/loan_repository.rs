//! Port for loan and repayment persistence.

use async_trait::async_trait;

use crate::domain::{ContractNumber, LoanDetails, LoanPayment, NewLoan, NewLoanPayment, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by loan repository adapters.
    pub enum LoanRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "loan repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "loan repository query failed: {message}",
        /// The user already holds a loan with this contract number.
        DuplicateContract { contract_number: String } =>
            "contract number {contract_number} already exists for user",
        /// A payment referenced a loan that does not exist.
        LoanNotFound { loan_id: i64 } => "loan {loan_id} does not exist",
        /// The loan referenced a loan type or limit type that does not exist.
        UnknownReference { message: String } => "unknown loan reference: {message}",
    }
}

/// Loan store scoped by user id and contract number.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// Persist a new loan.
    async fn create_loan(&self, loan: &NewLoan) -> Result<(), LoanRepositoryError>;

    /// Fetch a loan with its type and limit reference data.
    async fn find_by_user_and_contract(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<Option<LoanDetails>, LoanRepositoryError>;

    /// Persist a repayment against an existing loan.
    async fn create_payment(&self, payment: &NewLoanPayment) -> Result<(), LoanRepositoryError>;

    /// List repayments of the user's loan, oldest first.
    async fn list_payments_by_user_and_contract(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<Vec<LoanPayment>, LoanRepositoryError>;
}

/// Fixture implementation: accepts writes and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoanRepository;

#[async_trait]
impl LoanRepository for FixtureLoanRepository {
    async fn create_loan(&self, _loan: &NewLoan) -> Result<(), LoanRepositoryError> {
        Ok(())
    }

    async fn find_by_user_and_contract(
        &self,
        _user_id: UserId,
        _contract_number: &ContractNumber,
    ) -> Result<Option<LoanDetails>, LoanRepositoryError> {
        Ok(None)
    }

    async fn create_payment(&self, _payment: &NewLoanPayment) -> Result<(), LoanRepositoryError> {
        Ok(())
    }

    async fn list_payments_by_user_and_contract(
        &self,
        _user_id: UserId,
        _contract_number: &ContractNumber,
    ) -> Result<Vec<LoanPayment>, LoanRepositoryError> {
        Ok(Vec::new())
    }
}
