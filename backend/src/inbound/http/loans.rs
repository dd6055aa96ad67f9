//! Loan HTTP handlers.
//!
//! ```text
//! POST /loan
//! GET  /loans/{contract_number}
//! GET  /loan/{contract_number}/payments
//! POST /loan/{contract_number}/payments
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, get, post, web};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateLoanPaymentRequest, CreateLoanRequest, ValidationRequest};
use crate::domain::{
    ContractNumber, Error, LimitType, LoanDetails, LoanPayment, LoanStatus, LoanType, UserId,
    price_loan,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::{
    EmptyEnvelopeSchema, ErrorEnvelopeSchema, LoanEnvelopeSchema, PaymentsEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;

/// Loan application: applicant data for verification plus loan terms.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateLoanBody {
    #[schema(example = "3171012345670001")]
    pub national_id: String,
    pub full_name: Option<String>,
    pub legal_name: String,
    pub birth_place: Option<String>,
    /// `YYYY-MM-DD`.
    #[schema(example = "1990-02-01")]
    pub birth_date: String,
    /// Declared monthly salary as a decimal string.
    #[schema(example = "7500000")]
    pub salary: String,
    /// Base64-encoded image.
    pub national_id_photo: Option<String>,
    /// Base64-encoded image.
    pub user_photo: Option<String>,
    #[schema(example = "KTR-001")]
    pub contract_number: String,
    /// Base amount; the stored OTR amount adds a 30% markup.
    pub amount: f64,
    pub down_payment: f64,
    pub asset_name: String,
    pub loan_type_id: Option<i16>,
    pub limit_type_id: Option<i16>,
    /// `ACTIVE`, `INACTIVE` or `REJECTED`.
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub interest_rate: Option<f64>,
}

/// Repayment recorded against one of the caller's loans.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatePaymentBody {
    pub amount: f64,
    #[schema(example = "VA_BCA")]
    pub channel: String,
    /// Defaults to the time of the request.
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanTypeResponse {
    pub id: i16,
    pub name: String,
}

impl From<LoanType> for LoanTypeResponse {
    fn from(value: LoanType) -> Self {
        Self {
            id: value.id,
            name: value.name.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LimitTypeResponse {
    pub id: i16,
    pub amount: Option<f64>,
    pub term: i16,
}

impl From<LimitType> for LimitTypeResponse {
    fn from(value: LimitType) -> Self {
        Self {
            id: value.id,
            amount: value.amount,
            term: value.term,
        }
    }
}

/// Stored loan as returned to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanResponse {
    pub id: i64,
    pub user_id: i64,
    pub contract_number: String,
    pub otr_amount: f64,
    pub principal_amount: f64,
    pub asset_name: String,
    pub loan_type: Option<LoanTypeResponse>,
    pub limit_type: Option<LimitTypeResponse>,
    pub status: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub interest_rate: Option<f64>,
}

impl From<LoanDetails> for LoanResponse {
    fn from(value: LoanDetails) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id.as_i64(),
            contract_number: value.contract_number.to_string(),
            otr_amount: value.otr_amount,
            principal_amount: value.principal_amount,
            asset_name: value.asset_name,
            loan_type: value.loan_type.map(LoanTypeResponse::from),
            limit_type: value.limit_type.map(LimitTypeResponse::from),
            status: value.status.map(|status| status.as_str().to_owned()),
            start_date: value.start_date,
            interest_rate: value.interest_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanPaymentResponse {
    pub id: i64,
    pub loan_id: i64,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub channel: String,
}

impl From<LoanPayment> for LoanPaymentResponse {
    fn from(value: LoanPayment) -> Self {
        Self {
            id: value.id,
            loan_id: value.loan_id,
            amount: value.amount,
            date: value.date,
            channel: value.channel,
        }
    }
}

fn parse_contract_number(raw: &str) -> Result<ContractNumber, Error> {
    ContractNumber::new(raw).map_err(|err| Error::invalid_request(err.to_string()))
}

fn decode_photo(field: &str, encoded: Option<&str>) -> Result<Vec<u8>, Error> {
    match encoded.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(Vec::new()),
        Some(value) => STANDARD
            .decode(value)
            .map_err(|_| Error::invalid_request(format!("{field} must be base64"))),
    }
}

#[derive(Debug)]
struct ParsedLoanApplication {
    validation: ValidationRequest,
    loan: CreateLoanRequest,
}

fn parse_loan_application(
    user_id: UserId,
    body: CreateLoanBody,
) -> Result<ParsedLoanApplication, Error> {
    let contract_number = parse_contract_number(&body.contract_number)?;
    let status = body
        .status
        .as_deref()
        .map(LoanStatus::from_str)
        .transpose()
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let national_id_photo = decode_photo("national_id_photo", body.national_id_photo.as_deref())?;
    let user_photo = decode_photo("user_photo", body.user_photo.as_deref())?;

    let loan = CreateLoanRequest {
        user_id,
        contract_number,
        amount: body.amount,
        down_payment: body.down_payment,
        asset_name: body.asset_name,
        loan_type_id: body.loan_type_id,
        limit_type_id: body.limit_type_id,
        status,
        start_date: body.start_date,
        interest_rate: body.interest_rate,
    };
    // Loan terms are rejected before the applicant is verified or stored.
    price_loan(&loan)?;

    Ok(ParsedLoanApplication {
        validation: ValidationRequest {
            national_id: body.national_id,
            full_name: body.full_name,
            legal_name: body.legal_name,
            birth_place: body.birth_place,
            birth_date: body.birth_date,
            salary: body.salary,
            national_id_photo,
            user_photo,
        },
        loan,
    })
}

/// Verify the applicant and originate a loan.
#[utoipa::path(
    post,
    path = "/loan",
    request_body = CreateLoanBody,
    params(("x-user-id" = i64, Header, description = "Authenticated user id")),
    responses(
        (status = 200, description = "Loan created; empty body"),
        (status = 400, description = "Invalid request or applicant", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["loans"],
    operation_id = "createLoan"
)]
#[post("/loan")]
pub async fn create_loan(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateLoanBody>,
) -> ApiResult<HttpResponse> {
    let user_id = user.user_id();
    let parsed = parse_loan_application(user_id, payload.into_inner())?;

    let validated = state
        .validation
        .validate_data(user_id, parsed.validation)
        .await?;
    if !validated {
        return Err(Error::invalid_request("applicant validation did not complete"));
    }

    state.loans.create_loan(parsed.loan).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Fetch one of the caller's loans by contract number.
#[utoipa::path(
    get,
    path = "/loans/{contract_number}",
    params(
        ("contract_number" = String, Path, description = "Contract number"),
        ("x-user-id" = i64, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Loan", body = LoanEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such loan for this user", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["loans"],
    operation_id = "getLoan"
)]
#[get("/loans/{contract_number}")]
pub async fn get_loan(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ApiResponse<LoanResponse>>> {
    let contract_number = parse_contract_number(&path)?;
    let loan = state
        .loans_query
        .get_loan(user.user_id(), &contract_number)
        .await?;
    Ok(web::Json(ApiResponse::ok(LoanResponse::from(loan))))
}

/// List repayments of one of the caller's loans, oldest first.
#[utoipa::path(
    get,
    path = "/loan/{contract_number}/payments",
    params(
        ("contract_number" = String, Path, description = "Contract number"),
        ("x-user-id" = i64, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Payments; empty for unknown contracts", body = PaymentsEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["loans"],
    operation_id = "listLoanPayments"
)]
#[get("/loan/{contract_number}/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<ApiResponse<Vec<LoanPaymentResponse>>>> {
    let contract_number = parse_contract_number(&path)?;
    let payments = state
        .loans_query
        .list_payments(user.user_id(), &contract_number)
        .await?;
    Ok(web::Json(ApiResponse::ok(
        payments.into_iter().map(LoanPaymentResponse::from).collect(),
    )))
}

/// Record a repayment against one of the caller's loans.
#[utoipa::path(
    post,
    path = "/loan/{contract_number}/payments",
    request_body = CreatePaymentBody,
    params(
        ("contract_number" = String, Path, description = "Contract number"),
        ("x-user-id" = i64, Header, description = "Authenticated user id")
    ),
    responses(
        (status = 200, description = "Payment recorded", body = EmptyEnvelopeSchema),
        (status = 400, description = "Invalid request", body = ErrorEnvelopeSchema),
        (status = 404, description = "No such loan for this user", body = ErrorEnvelopeSchema),
        (status = 500, description = "Internal server error", body = ErrorEnvelopeSchema)
    ),
    tags = ["loans"],
    operation_id = "createLoanPayment"
)]
#[post("/loan/{contract_number}/payments")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<CreatePaymentBody>,
) -> ApiResult<web::Json<ApiResponse<()>>> {
    let contract_number = parse_contract_number(&path)?;
    let body = payload.into_inner();
    state
        .loans
        .create_loan_payment(CreateLoanPaymentRequest {
            user_id: user.user_id(),
            contract_number,
            amount: body.amount,
            channel: body.channel,
            date: body.date,
        })
        .await?;
    Ok(web::Json(ApiResponse::empty()))
}

/// Register the loan routes on a service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_loan)
        .service(get_loan)
        .service(list_payments)
        .service(create_payment);
}

#[cfg(test)]
#[path = "loans_tests.rs"]
mod tests;
