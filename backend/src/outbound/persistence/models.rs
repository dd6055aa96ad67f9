//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next to
//! the rows so every repository decodes stored values the same way.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::{
    ContractNumber, LimitType, LoanDetails, LoanPayment, LoanStatus, LoanType, LoanTypeName,
    UserId, UserRecord,
};

use super::schema::{limit_type, loan, loan_payment, loan_type, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
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

impl TryFrom<UserRow> for UserRecord {
    type Error = String;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = UserId::new(row.id).map_err(|err| err.to_string())?;
        Ok(Self {
            id,
            national_id: row.national_id,
            full_name: row.full_name,
            legal_name: row.legal_name,
            birth_place: row.birth_place,
            birth_date: row.birth_date,
            salary: row.salary,
            national_id_photo: row.national_id_photo,
            user_photo: row.user_photo,
            is_national_id_validated: row.is_national_id_validated,
            is_photo_validated: row.is_photo_validated,
            is_salary_validated: row.is_salary_validated,
            updated_by: row.updated_by,
        })
    }
}

/// Insertable struct for a user's first write.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: i64,
    pub national_id: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub legal_name: Option<&'a str>,
    pub birth_place: Option<&'a str>,
    pub birth_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub national_id_photo: Option<&'a [u8]>,
    pub user_photo: Option<&'a [u8]>,
    pub is_national_id_validated: bool,
    pub is_photo_validated: bool,
    pub is_salary_validated: bool,
    pub created_by: Option<&'a str>,
    pub updated_by: Option<&'a str>,
}

/// Changeset for later writes. `None` columns keep their stored value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub national_id: Option<&'a str>,
    pub full_name: Option<&'a str>,
    pub legal_name: Option<&'a str>,
    pub birth_place: Option<&'a str>,
    pub birth_date: Option<NaiveDate>,
    pub salary: Option<f64>,
    pub national_id_photo: Option<&'a [u8]>,
    pub user_photo: Option<&'a [u8]>,
    pub is_national_id_validated: bool,
    pub is_photo_validated: bool,
    pub is_salary_validated: bool,
    pub updated_by: Option<&'a str>,
}

impl<'a> From<&'a UserRecord> for NewUserRow<'a> {
    fn from(record: &'a UserRecord) -> Self {
        Self {
            id: record.id.as_i64(),
            national_id: record.national_id.as_deref(),
            full_name: record.full_name.as_deref(),
            legal_name: record.legal_name.as_deref(),
            birth_place: record.birth_place.as_deref(),
            birth_date: record.birth_date,
            salary: record.salary,
            national_id_photo: record.national_id_photo.as_deref(),
            user_photo: record.user_photo.as_deref(),
            is_national_id_validated: record.is_national_id_validated,
            is_photo_validated: record.is_photo_validated,
            is_salary_validated: record.is_salary_validated,
            created_by: record.updated_by.as_deref(),
            updated_by: record.updated_by.as_deref(),
        }
    }
}

impl<'a> From<&'a UserRecord> for UserUpdate<'a> {
    fn from(record: &'a UserRecord) -> Self {
        Self {
            national_id: record.national_id.as_deref(),
            full_name: record.full_name.as_deref(),
            legal_name: record.legal_name.as_deref(),
            birth_place: record.birth_place.as_deref(),
            birth_date: record.birth_date,
            salary: record.salary,
            national_id_photo: record.national_id_photo.as_deref(),
            user_photo: record.user_photo.as_deref(),
            is_national_id_validated: record.is_national_id_validated,
            is_photo_validated: record.is_photo_validated,
            is_salary_validated: record.is_salary_validated,
            updated_by: record.updated_by.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loan models
// ---------------------------------------------------------------------------

/// Row struct for reading from the loan table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loan)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoanRow {
    pub id: i64,
    pub user_id: i64,
    pub contract_number: String,
    pub otr_amount: f64,
    pub principal_amount: f64,
    pub asset_name: String,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub interest_rate: Option<f64>,
}

/// Row struct for the joined loan type.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loan_type)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoanTypeRow {
    pub id: i16,
    pub name: String,
}

/// Row struct for the joined limit type.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = limit_type)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LimitTypeRow {
    pub id: i16,
    pub amount: Option<f64>,
    pub term: i16,
}

/// Insertable struct for creating loans.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = loan)]
pub(crate) struct NewLoanRow<'a> {
    pub user_id: i64,
    pub contract_number: &'a str,
    pub otr_amount: f64,
    pub principal_amount: f64,
    pub asset_name: &'a str,
    pub loan_type_id: Option<i16>,
    pub limit_type_id: Option<i16>,
    pub status: Option<&'a str>,
    pub start_date: Option<DateTime<Utc>>,
    pub interest_rate: Option<f64>,
}

/// Assemble a domain loan from the loan row and its optional joins.
pub(crate) fn loan_details_from_rows(
    row: LoanRow,
    loan_type: Option<LoanTypeRow>,
    limit_type: Option<LimitTypeRow>,
) -> Result<LoanDetails, String> {
    let user_id = UserId::new(row.user_id).map_err(|err| err.to_string())?;
    let contract_number =
        ContractNumber::new(row.contract_number).map_err(|err| err.to_string())?;
    let status = row
        .status
        .as_deref()
        .map(LoanStatus::from_str)
        .transpose()
        .map_err(|err| err.to_string())?;
    let loan_type = loan_type
        .map(|type_row| {
            LoanTypeName::from_str(&type_row.name).map(|name| LoanType {
                id: type_row.id,
                name,
            })
        })
        .transpose()
        .map_err(|err| err.to_string())?;
    let limit_type = limit_type.map(|limit_row| LimitType {
        id: limit_row.id,
        amount: limit_row.amount,
        term: limit_row.term,
    });

    Ok(LoanDetails {
        id: row.id,
        user_id,
        contract_number,
        otr_amount: row.otr_amount,
        principal_amount: row.principal_amount,
        asset_name: row.asset_name,
        loan_type,
        limit_type,
        status,
        start_date: row.start_date,
        interest_rate: row.interest_rate,
    })
}

// ---------------------------------------------------------------------------
// Payment models
// ---------------------------------------------------------------------------

/// Row struct for reading from the loan_payment table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loan_payment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoanPaymentRow {
    pub id: i64,
    pub loan_id: i64,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub channel: String,
}

impl From<LoanPaymentRow> for LoanPayment {
    fn from(row: LoanPaymentRow) -> Self {
        Self {
            id: row.id,
            loan_id: row.loan_id,
            amount: row.amount,
            date: row.date,
            channel: row.channel,
        }
    }
}

/// Insertable struct for recording payments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = loan_payment)]
pub(crate) struct NewLoanPaymentRow<'a> {
    pub loan_id: i64,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub channel: &'a str,
}
