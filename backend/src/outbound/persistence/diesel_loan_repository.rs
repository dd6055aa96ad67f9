//! PostgreSQL-backed `LoanRepository` implementation using Diesel ORM.
//!
//! Every read is scoped by `(user_id, contract_number)`, so a caller can
//! never observe another user's loan or payments.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LoanRepository, LoanRepositoryError};
use crate::domain::{ContractNumber, LoanDetails, LoanPayment, NewLoan, NewLoanPayment, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{
    LimitTypeRow, LoanPaymentRow, LoanRow, LoanTypeRow, NewLoanPaymentRow, NewLoanRow,
    loan_details_from_rows,
};
use super::pool::{DbPool, PoolError};
use super::schema::{limit_type, loan, loan_payment, loan_type};

/// Diesel-backed implementation of the `LoanRepository` port.
#[derive(Clone)]
pub struct DieselLoanRepository {
    pool: DbPool,
}

impl DieselLoanRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LoanRepositoryError {
    map_basic_pool_error(error, LoanRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> LoanRepositoryError {
    map_basic_diesel_error(
        error,
        LoanRepositoryError::query,
        LoanRepositoryError::connection,
    )
}

fn map_insert_loan_error(error: DieselError, contract_number: &str) -> LoanRepositoryError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            LoanRepositoryError::duplicate_contract(contract_number)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            LoanRepositoryError::unknown_reference(
                info.constraint_name()
                    .unwrap_or("loan type or limit type")
                    .to_owned(),
            )
        }
        other => map_diesel_error(other),
    }
}

fn map_insert_payment_error(error: DieselError, loan_id: i64) -> LoanRepositoryError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            LoanRepositoryError::loan_not_found(loan_id)
        }
        other => map_diesel_error(other),
    }
}

#[async_trait]
impl LoanRepository for DieselLoanRepository {
    async fn create_loan(&self, new_loan: &NewLoan) -> Result<(), LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewLoanRow {
            user_id: new_loan.user_id.as_i64(),
            contract_number: new_loan.contract_number.as_ref(),
            otr_amount: new_loan.otr_amount,
            principal_amount: new_loan.principal_amount,
            asset_name: new_loan.asset_name.as_str(),
            loan_type_id: new_loan.loan_type_id,
            limit_type_id: new_loan.limit_type_id,
            status: new_loan.status.map(|status| status.as_str()),
            start_date: new_loan.start_date,
            interest_rate: new_loan.interest_rate,
        };

        diesel::insert_into(loan::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_insert_loan_error(err, row.contract_number))?;
        Ok(())
    }

    async fn find_by_user_and_contract(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<Option<LoanDetails>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found = loan::table
            .left_join(loan_type::table)
            .left_join(limit_type::table)
            .filter(loan::user_id.eq(user_id.as_i64()))
            .filter(loan::contract_number.eq(contract_number.as_ref()))
            .select((
                LoanRow::as_select(),
                Option::<LoanTypeRow>::as_select(),
                Option::<LimitTypeRow>::as_select(),
            ))
            .first::<(LoanRow, Option<LoanTypeRow>, Option<LimitTypeRow>)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        found
            .map(|(row, type_row, limit_row)| loan_details_from_rows(row, type_row, limit_row))
            .transpose()
            .map_err(LoanRepositoryError::query)
    }

    async fn create_payment(&self, payment: &NewLoanPayment) -> Result<(), LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewLoanPaymentRow {
            loan_id: payment.loan_id,
            amount: payment.amount,
            date: payment.date,
            channel: payment.channel.as_str(),
        };

        diesel::insert_into(loan_payment::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_insert_payment_error(err, payment.loan_id))?;
        Ok(())
    }

    async fn list_payments_by_user_and_contract(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<Vec<LoanPayment>, LoanRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LoanPaymentRow> = loan_payment::table
            .inner_join(loan::table)
            .filter(loan::user_id.eq(user_id.as_i64()))
            .filter(loan::contract_number.eq(contract_number.as_ref()))
            .order((loan_payment::date.asc(), loan_payment::id.asc()))
            .select(LoanPaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(LoanPayment::from).collect())
    }
}
