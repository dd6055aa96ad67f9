//! End-to-end coverage of the loan endpoints.
//!
//! Drives the real Actix handlers and domain services while substituting
//! in-memory driven ports for PostgreSQL and the verification gateway.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use uuid::Uuid;

use loan_origination::Trace;
use loan_origination::domain::ports::{
    KycGateway, KycGatewayError, LoanRepository, LoanRepositoryError, UserPersistenceError,
    UserRepository,
};
use loan_origination::domain::{
    ContractNumber, IdentityCheck, IdentityVerification, LoanDetails, LoanPayment, LoanService,
    NewLoan, NewLoanPayment, PHOTO_VALID_STATUS, PhotoCheck, PhotoVerification, SalaryCheck,
    SalaryVerification, UserId, UserRecord, UserValidationService,
};
use loan_origination::inbound::http::json_config;
use loan_origination::inbound::http::loans::configure;
use loan_origination::inbound::http::state::HttpState;

// -----------------------------------------------------------------------------
// In-memory driven ports
// -----------------------------------------------------------------------------

#[derive(Default)]
struct InMemoryUsers {
    rows: Mutex<HashMap<i64, UserRecord>>,
}

impl InMemoryUsers {
    fn get(&self, id: i64) -> Option<UserRecord> {
        self.rows.lock().expect("users lock").get(&id).cloned()
    }

    fn insert(&self, record: UserRecord) {
        self.rows
            .lock()
            .expect("users lock")
            .insert(record.id.as_i64(), record);
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_national_id(
        &self,
        national_id: &str,
    ) -> Result<Option<UserRecord>, UserPersistenceError> {
        Ok(self
            .rows
            .lock()
            .expect("users lock")
            .values()
            .find(|record| record.national_id.as_deref() == Some(national_id))
            .cloned())
    }

    async fn update_by_id(&self, record: &UserRecord) -> Result<(), UserPersistenceError> {
        self.insert(record.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
struct GatewayCalls {
    identity: Vec<String>,
    salary: Vec<String>,
    photo: Vec<String>,
}

struct ScriptedGateway {
    identity_matches: bool,
    salary_band: (&'static str, &'static str),
    fail: bool,
    calls: Mutex<GatewayCalls>,
}

impl ScriptedGateway {
    fn accepting() -> Self {
        Self {
            identity_matches: true,
            salary_band: ("1000000", "10000000"),
            fail: false,
            calls: Mutex::new(GatewayCalls::default()),
        }
    }

    fn calls(&self) -> GatewayCalls {
        self.calls.lock().expect("gateway lock").clone()
    }

    fn guard(&self) -> Result<(), KycGatewayError> {
        if self.fail {
            Err(KycGatewayError::transport("connection refused"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KycGateway for ScriptedGateway {
    async fn verify_identity(
        &self,
        check: &IdentityCheck,
    ) -> Result<IdentityVerification, KycGatewayError> {
        self.calls
            .lock()
            .expect("gateway lock")
            .identity
            .push(check.reference_id.to_string());
        self.guard()?;
        Ok(IdentityVerification {
            national_id_matched: self.identity_matches,
            name_matched: self.identity_matches,
            birth_date_matched: self.identity_matches,
            reference_id: check.reference_id.to_string(),
        })
    }

    async fn verify_salary(
        &self,
        check: &SalaryCheck,
    ) -> Result<SalaryVerification, KycGatewayError> {
        self.calls
            .lock()
            .expect("gateway lock")
            .salary
            .push(check.reference_id.to_string());
        self.guard()?;
        Ok(SalaryVerification {
            lower_bound: Some(self.salary_band.0.to_owned()),
            upper_bound: Some(self.salary_band.1.to_owned()),
            reference_id: check.reference_id.to_string(),
        })
    }

    async fn verify_photo(&self, check: &PhotoCheck) -> Result<PhotoVerification, KycGatewayError> {
        self.calls
            .lock()
            .expect("gateway lock")
            .photo
            .push(check.reference_id.to_string());
        self.guard()?;
        Ok(PhotoVerification {
            status: PHOTO_VALID_STATUS.to_owned(),
        })
    }
}

#[derive(Default)]
struct InMemoryLoans {
    loans: Mutex<Vec<LoanDetails>>,
    payments: Mutex<Vec<LoanPayment>>,
}

impl InMemoryLoans {
    fn loans(&self) -> Vec<LoanDetails> {
        self.loans.lock().expect("loans lock").clone()
    }
}

#[async_trait]
impl LoanRepository for InMemoryLoans {
    async fn create_loan(&self, loan: &NewLoan) -> Result<(), LoanRepositoryError> {
        let mut loans = self.loans.lock().expect("loans lock");
        if loans
            .iter()
            .any(|row| row.user_id == loan.user_id && row.contract_number == loan.contract_number)
        {
            return Err(LoanRepositoryError::duplicate_contract(
                loan.contract_number.to_string(),
            ));
        }
        let id = i64::try_from(loans.len()).expect("loan count fits") + 1;
        loans.push(LoanDetails {
            id,
            user_id: loan.user_id,
            contract_number: loan.contract_number.clone(),
            otr_amount: loan.otr_amount,
            principal_amount: loan.principal_amount,
            asset_name: loan.asset_name.clone(),
            loan_type: None,
            limit_type: None,
            status: loan.status,
            start_date: loan.start_date,
            interest_rate: loan.interest_rate,
        });
        Ok(())
    }

    async fn find_by_user_and_contract(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<Option<LoanDetails>, LoanRepositoryError> {
        Ok(self
            .loans
            .lock()
            .expect("loans lock")
            .iter()
            .find(|row| row.user_id == user_id && &row.contract_number == contract_number)
            .cloned())
    }

    async fn create_payment(&self, payment: &NewLoanPayment) -> Result<(), LoanRepositoryError> {
        let mut payments = self.payments.lock().expect("payments lock");
        let id = i64::try_from(payments.len()).expect("payment count fits") + 1;
        payments.push(LoanPayment {
            id,
            loan_id: payment.loan_id,
            amount: payment.amount,
            date: payment.date,
            channel: payment.channel.clone(),
        });
        Ok(())
    }

    async fn list_payments_by_user_and_contract(
        &self,
        user_id: UserId,
        contract_number: &ContractNumber,
    ) -> Result<Vec<LoanPayment>, LoanRepositoryError> {
        let Some(loan) = self
            .find_by_user_and_contract(user_id, contract_number)
            .await?
        else {
            return Ok(Vec::new());
        };
        let mut payments: Vec<LoanPayment> = self
            .payments
            .lock()
            .expect("payments lock")
            .iter()
            .filter(|payment| payment.loan_id == loan.id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(payments)
    }
}

// -----------------------------------------------------------------------------
// Harness
// -----------------------------------------------------------------------------

struct Harness {
    users: Arc<InMemoryUsers>,
    gateway: Arc<ScriptedGateway>,
    loans: Arc<InMemoryLoans>,
}

impl Harness {
    fn with_gateway(gateway: ScriptedGateway) -> Self {
        Self {
            users: Arc::new(InMemoryUsers::default()),
            gateway: Arc::new(gateway),
            loans: Arc::new(InMemoryLoans::default()),
        }
    }

    fn state(&self) -> HttpState {
        let validation = UserValidationService::new(self.users.clone(), self.gateway.clone());
        let service = Arc::new(LoanService::new(self.loans.clone(), Arc::new(DefaultClock)));
        HttpState::new(Arc::new(validation), service.clone(), service)
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::with_gateway(ScriptedGateway::accepting())
}

fn application(contract_number: &str) -> Value {
    json!({
        "national_id": "3171012345670001",
        "full_name": "Budi Santoso",
        "legal_name": "BUDI SANTOSO",
        "birth_place": "Jakarta",
        "birth_date": "1990-02-01",
        "salary": "7500000",
        "national_id_photo": "AQID",
        "user_photo": "BAUG",
        "contract_number": contract_number,
        "amount": 1000.0,
        "down_payment": 300.0,
        "asset_name": "Honda Beat",
        "status": "ACTIVE"
    })
}

macro_rules! app_for {
    ($harness:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state()))
                .app_data(json_config())
                .wrap(Trace)
                .configure(configure),
        )
        .await
    };
}

// -----------------------------------------------------------------------------
// Scenarios
// -----------------------------------------------------------------------------

#[rstest]
#[actix_rt::test]
async fn first_application_validates_applicant_and_prices_loan(harness: Harness) {
    let app = app_for!(harness);

    let request = actix_test::TestRequest::post()
        .uri("/loan")
        .insert_header(("x-user-id", "7"))
        .set_json(application("KTR-001"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let record = harness.users.get(7).expect("applicant persisted");
    assert!(record.is_national_id_validated);
    assert!(record.is_salary_validated);
    assert!(record.is_photo_validated);
    assert_eq!(record.salary, Some(7_500_000.0));
    assert_eq!(record.national_id_photo, Some(vec![1, 2, 3]));
    assert_eq!(record.updated_by.as_deref(), Some("7"));

    let loans = harness.loans.loans();
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].otr_amount, 1300.0);
    assert_eq!(loans[0].principal_amount, 1000.0);

    let request = actix_test::TestRequest::get()
        .uri("/loans/KTR-001")
        .insert_header(("x-user-id", "7"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], Value::Bool(true));
    assert_eq!(body["message"], "success");
    assert_eq!(body["data"]["contract_number"], "KTR-001");
    assert_eq!(body["data"]["otr_amount"], 1300.0);
    assert_eq!(body["data"]["status"], "ACTIVE");
}

#[rstest]
#[actix_rt::test]
async fn every_gateway_call_shares_the_request_trace_id(harness: Harness) {
    let app = app_for!(harness);
    let trace_id = Uuid::new_v4().to_string();

    let request = actix_test::TestRequest::post()
        .uri("/loan")
        .insert_header(("x-user-id", "7"))
        .insert_header(("trace-id", trace_id.as_str()))
        .set_json(application("KTR-002"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("trace-id")
            .and_then(|value| value.to_str().ok()),
        Some(trace_id.as_str())
    );
    let calls = harness.gateway.calls();
    assert_eq!(calls.identity, vec![trace_id.clone()]);
    assert_eq!(calls.salary, vec![trace_id.clone()]);
    assert_eq!(calls.photo, vec![trace_id]);
}

#[rstest]
#[actix_rt::test]
async fn known_applicant_only_rechecks_outstanding_items() {
    let harness = Harness::with_gateway(ScriptedGateway::accepting());
    let mut record = UserRecord::new(UserId::new(7).expect("positive id"));
    record.national_id = Some("3171012345670001".to_owned());
    record.is_national_id_validated = true;
    record.is_salary_validated = true;
    harness.users.insert(record);
    let app = app_for!(harness);

    let request = actix_test::TestRequest::post()
        .uri("/loan")
        .insert_header(("x-user-id", "7"))
        .set_json(application("KTR-003"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let calls = harness.gateway.calls();
    assert!(calls.identity.is_empty());
    assert!(calls.salary.is_empty());
    assert_eq!(calls.photo.len(), 1);
    let stored = harness.users.get(7).expect("record kept");
    assert!(stored.is_photo_validated);
}

#[rstest]
#[actix_rt::test]
async fn gateway_outage_surfaces_internal_error_without_side_effects() {
    let harness = Harness::with_gateway(ScriptedGateway {
        fail: true,
        ..ScriptedGateway::accepting()
    });
    let app = app_for!(harness);

    let request = actix_test::TestRequest::post()
        .uri("/loan")
        .insert_header(("x-user-id", "7"))
        .set_json(application("KTR-004"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["message"], "oops! something went wrong");
    assert!(harness.users.get(7).is_none());
    assert!(harness.loans.loans().is_empty());
}

#[rstest]
#[case::negative_amount("amount", json!(-5))]
#[case::down_payment_above_otr("down_payment", json!(5000.0))]
#[case::blank_asset("asset_name", json!(""))]
#[actix_rt::test]
async fn invalid_loan_terms_skip_verification_and_persistence(
    harness: Harness,
    #[case] field: &str,
    #[case] value: Value,
) {
    let app = app_for!(harness);

    let mut payload = application("KTR-010");
    payload[field] = value;
    let request = actix_test::TestRequest::post()
        .uri("/loan")
        .insert_header(("x-user-id", "7"))
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let calls = harness.gateway.calls();
    assert!(calls.identity.is_empty());
    assert!(calls.salary.is_empty());
    assert!(calls.photo.is_empty());
    assert!(harness.users.get(7).is_none());
    assert!(harness.loans.loans().is_empty());
}

#[rstest]
#[actix_rt::test]
async fn salary_outside_band_is_recorded_as_unvalidated() {
    let harness = Harness::with_gateway(ScriptedGateway {
        salary_band: ("8000000", "9000000"),
        ..ScriptedGateway::accepting()
    });
    let app = app_for!(harness);

    let request = actix_test::TestRequest::post()
        .uri("/loan")
        .insert_header(("x-user-id", "7"))
        .set_json(application("KTR-005"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let record = harness.users.get(7).expect("applicant persisted");
    assert!(!record.is_salary_validated);
    assert!(record.salary.is_none());
}

#[rstest]
#[actix_rt::test]
async fn duplicate_contract_is_a_bad_request(harness: Harness) {
    let app = app_for!(harness);

    for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
        let request = actix_test::TestRequest::post()
            .uri("/loan")
            .insert_header(("x-user-id", "7"))
            .set_json(application("KTR-006"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), expected);
    }
    assert_eq!(harness.loans.loans().len(), 1);
}

#[rstest]
#[actix_rt::test]
async fn loans_are_scoped_to_their_owner(harness: Harness) {
    let app = app_for!(harness);

    let request = actix_test::TestRequest::post()
        .uri("/loan")
        .insert_header(("x-user-id", "7"))
        .set_json(application("KTR-007"))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, request).await.status(),
        StatusCode::OK
    );

    let request = actix_test::TestRequest::get()
        .uri("/loans/KTR-007")
        .insert_header(("x-user-id", "8"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "resource not found");
}

#[rstest]
#[actix_rt::test]
async fn payments_are_listed_oldest_first(harness: Harness) {
    let app = app_for!(harness);

    let request = actix_test::TestRequest::post()
        .uri("/loan")
        .insert_header(("x-user-id", "7"))
        .set_json(application("KTR-008"))
        .to_request();
    assert_eq!(
        actix_test::call_service(&app, request).await.status(),
        StatusCode::OK
    );

    for (amount, date) in [
        (200.0, "2024-04-01T00:00:00Z"),
        (100.0, "2024-03-01T00:00:00Z"),
    ] {
        let request = actix_test::TestRequest::post()
            .uri("/loan/KTR-008/payments")
            .insert_header(("x-user-id", "7"))
            .set_json(json!({ "amount": amount, "channel": "VA_BCA", "date": date }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let request = actix_test::TestRequest::get()
        .uri("/loan/KTR-008/payments")
        .insert_header(("x-user-id", "7"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let amounts: Vec<f64> = body["data"]
        .as_array()
        .expect("payments array")
        .iter()
        .filter_map(|payment| payment["amount"].as_f64())
        .collect();
    assert_eq!(amounts, vec![100.0, 200.0]);
}

#[rstest]
#[actix_rt::test]
async fn payment_for_unknown_contract_is_not_found(harness: Harness) {
    let app = app_for!(harness);

    let request = actix_test::TestRequest::post()
        .uri("/loan/NOPE/payments")
        .insert_header(("x-user-id", "7"))
        .set_json(json!({ "amount": 50.0, "channel": "VA_BCA" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
