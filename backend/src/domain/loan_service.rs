//! Loan domain service implementing the command and query driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CreateLoanPaymentRequest, CreateLoanRequest, LoanCommand, LoanQuery, LoanRepository,
    LoanRepositoryError,
};
use crate::domain::{
    ContractNumber, Error, LoanDetails, LoanPayment, NewLoan, NewLoanPayment, UserId,
    calculate_otr_amount, principal_amount,
};

fn map_repository_error(error: LoanRepositoryError) -> Error {
    match error {
        LoanRepositoryError::DuplicateContract { .. }
        | LoanRepositoryError::UnknownReference { .. } => Error::invalid_request(error.to_string()),
        LoanRepositoryError::LoanNotFound { .. } => Error::not_found(error.to_string()),
        LoanRepositoryError::Connection { .. } | LoanRepositoryError::Query { .. } => {
            Error::internal(error.to_string())
        }
    }
}

fn require_finite(field: &str, value: f64) -> Result<f64, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid_request(format!("{field} must be a finite number")))
    }
}

/// Loan service pricing new loans and serving read-backs.
#[derive(Clone)]
pub struct LoanService<R> {
    loan_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> LoanService<R> {
    /// Create a new service with the loan repository and a clock for
    /// defaulting payment dates.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use loan_origination::domain::LoanService;
    /// use loan_origination::domain::ports::FixtureLoanRepository;
    ///
    /// let service = LoanService::new(Arc::new(FixtureLoanRepository), Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(loan_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { loan_repo, clock }
    }
}

/// Amounts derived from a loan application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanPricing {
    /// Requested amount plus the OTR markup.
    pub otr_amount: f64,
    /// OTR amount less the down payment.
    pub principal_amount: f64,
}

/// Check the loan terms of an application and price it.
///
/// Runs without I/O so callers can reject a loan before any verification
/// call is made.
///
/// # Errors
/// Returns an `InvalidRequest` error when an amount is not finite, the amount
/// is not positive, the down payment is negative or exceeds the OTR amount,
/// or the asset name is blank.
///
/// # Examples
/// ```
/// use loan_origination::domain::{ContractNumber, UserId, price_loan};
/// use loan_origination::domain::ports::CreateLoanRequest;
///
/// let request = CreateLoanRequest {
///     user_id: UserId::new(7).expect("positive id"),
///     contract_number: ContractNumber::new("KTR-001").expect("valid"),
///     amount: 1000.0,
///     down_payment: 300.0,
///     asset_name: "Honda Beat".to_owned(),
///     loan_type_id: None,
///     limit_type_id: None,
///     status: None,
///     start_date: None,
///     interest_rate: None,
/// };
/// let pricing = price_loan(&request).expect("valid terms");
/// assert_eq!(pricing.otr_amount, 1300.0);
/// assert_eq!(pricing.principal_amount, 1000.0);
/// ```
pub fn price_loan(request: &CreateLoanRequest) -> Result<LoanPricing, Error> {
    let amount = require_finite("amount", request.amount)?;
    let down_payment = require_finite("down_payment", request.down_payment)?;
    if amount <= 0.0 {
        return Err(Error::invalid_request("amount must be positive"));
    }
    if down_payment < 0.0 {
        return Err(Error::invalid_request("down_payment must not be negative"));
    }

    let otr_amount = calculate_otr_amount(amount);
    if down_payment > otr_amount {
        return Err(Error::invalid_request("down_payment must not exceed the OTR amount"));
    }
    if request.asset_name.trim().is_empty() {
        return Err(Error::invalid_request("asset_name is required"));
    }
    Ok(LoanPricing {
        otr_amount,
        principal_amount: principal_amount(otr_amount, down_payment),
    })
}

impl<R> LoanService<R>
where
    R: LoanRepository,
{
    async fn find_loan(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<LoanDetails, Error> {
        self.loan_repo
            .find_by_user_and_contract(user_id, contract_number)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("loan {contract_number} not found")))
    }
}

#[async_trait]
impl<R> LoanCommand for LoanService<R>
where
    R: LoanRepository,
{
    async fn create_loan(&self, request: CreateLoanRequest) -> Result<(), Error> {
        let LoanPricing {
            otr_amount,
            principal_amount,
        } = price_loan(&request)?;

        let loan = NewLoan {
            user_id: request.user_id,
            contract_number: request.contract_number,
            otr_amount,
            principal_amount,
            asset_name: request.asset_name,
            loan_type_id: request.loan_type_id,
            limit_type_id: request.limit_type_id,
            status: request.status,
            start_date: request.start_date,
            interest_rate: request.interest_rate,
        };

        self.loan_repo
            .create_loan(&loan)
            .await
            .map_err(map_repository_error)
            .map_err(|err| err.with_context("create loan"))?;

        info!(
            user_id = %loan.user_id,
            contract_number = %loan.contract_number,
            otr_amount,
            "loan created"
        );
        Ok(())
    }

    async fn create_loan_payment(&self, request: CreateLoanPaymentRequest) -> Result<(), Error> {
        let amount = require_finite("amount", request.amount)?;
        if amount <= 0.0 {
            return Err(Error::invalid_request("amount must be positive"));
        }
        let channel = request.channel.trim();
        if channel.is_empty() {
            return Err(Error::invalid_request("channel is required"));
        }

        let loan = self
            .find_loan(request.user_id, &request.contract_number)
            .await?;
        let payment = NewLoanPayment {
            loan_id: loan.id,
            amount,
            date: request.date.unwrap_or_else(|| self.clock.utc()),
            channel: channel.to_owned(),
        };

        self.loan_repo
            .create_payment(&payment)
            .await
            .map_err(map_repository_error)
            .map_err(|err| err.with_context("create loan payment"))?;

        info!(
            user_id = %request.user_id,
            contract_number = %request.contract_number,
            loan_id = loan.id,
            "loan payment recorded"
        );
        Ok(())
    }
}

#[async_trait]
impl<R> LoanQuery for LoanService<R>
where
    R: LoanRepository,
{
    async fn get_loan(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<LoanDetails, Error> {
        self.find_loan(user_id, contract_number).await
    }

    async fn list_payments(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<Vec<LoanPayment>, Error> {
        self.loan_repo
            .list_payments_by_user_and_contract(user_id, contract_number)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "loan_service_tests.rs"]
mod tests;
