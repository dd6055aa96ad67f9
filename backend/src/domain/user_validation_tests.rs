//! Tests for the applicant validation orchestrator.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockKycGateway, MockUserRepository};
use crate::domain::{
    ErrorCode, IdentityVerification, PhotoVerification, SalaryVerification, TraceId,
};

fn user_id() -> UserId {
    UserId::new(7).expect("fixture id is positive")
}

#[fixture]
fn request() -> ValidationRequest {
    ValidationRequest {
        national_id: "3171234567890001".to_owned(),
        full_name: Some("Budi Santoso".to_owned()),
        legal_name: "BUDI SANTOSO".to_owned(),
        birth_place: Some("Jakarta".to_owned()),
        birth_date: "1990-04-12".to_owned(),
        salary: "7500000".to_owned(),
        national_id_photo: vec![1, 2, 3],
        user_photo: vec![4, 5, 6],
    }
}

fn identity(confirmed: bool) -> IdentityVerification {
    IdentityVerification {
        national_id_matched: confirmed,
        name_matched: confirmed,
        birth_date_matched: confirmed,
        reference_id: "ref".to_owned(),
    }
}

fn salary_band(lower: &str, upper: &str) -> SalaryVerification {
    SalaryVerification {
        lower_bound: Some(lower.to_owned()),
        upper_bound: Some(upper.to_owned()),
        reference_id: "ref".to_owned(),
    }
}

fn photo(status: &str) -> PhotoVerification {
    PhotoVerification {
        status: status.to_owned(),
    }
}

fn known_record(identity_validated: bool, photo_validated: bool) -> UserRecord {
    let mut record = UserRecord::new(UserId::new(99).expect("positive id"));
    record.national_id = Some("3171234567890001".to_owned());
    record.is_national_id_validated = identity_validated;
    record.is_photo_validated = photo_validated;
    record
}

fn accepting_gateway() -> MockKycGateway {
    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity()
        .times(1)
        .return_once(|_| Ok(identity(true)));
    kyc.expect_verify_salary()
        .times(1)
        .return_once(|_| Ok(salary_band("5000000", "10000000")));
    kyc.expect_verify_photo()
        .times(1)
        .return_once(|_| Ok(photo("valid")));
    kyc
}

fn unknown_applicant() -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_national_id()
        .times(1)
        .return_once(|_| Ok(None));
    users
}

fn service(
    users: MockUserRepository,
    kyc: MockKycGateway,
) -> UserValidationService<MockUserRepository, MockKycGateway> {
    UserValidationService::new(Arc::new(users), Arc::new(kyc))
}

#[rstest]
#[tokio::test]
async fn first_time_applicant_is_fully_validated_and_persisted(request: ValidationRequest) {
    let mut users = unknown_applicant();
    users
        .expect_update_by_id()
        .times(1)
        .withf(|record: &UserRecord| {
            record.id.as_i64() == 7
                && record.is_national_id_validated
                && record.is_salary_validated
                && record.is_photo_validated
                && record.national_id.as_deref() == Some("3171234567890001")
                && record.legal_name.as_deref() == Some("BUDI SANTOSO")
                && record.birth_date == NaiveDate::from_ymd_opt(1990, 4, 12)
                && record.salary == Some(7_500_000.0)
                && record.user_photo.as_deref() == Some(&[4_u8, 5, 6][..])
                && record.updated_by.as_deref() == Some("7")
        })
        .return_once(|_| Ok(()));

    let valid = service(users, accepting_gateway())
        .validate_data(user_id(), request)
        .await
        .expect("validation succeeds");

    assert!(valid);
}

#[rstest]
#[tokio::test]
async fn salary_gateway_failure_aborts_without_writing(request: ValidationRequest) {
    let mut users = unknown_applicant();
    users.expect_update_by_id().times(0);

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity()
        .times(1)
        .return_once(|_| Ok(identity(true)));
    kyc.expect_verify_salary()
        .times(1)
        .return_once(|_| Err(KycGatewayError::unexpected_status(502_u16, "bad gateway")));
    kyc.expect_verify_photo().times(0);

    let error = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect_err("gateway failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert!(error.message().starts_with("salary check"));
}

#[rstest]
#[tokio::test]
async fn unparseable_declared_salary_is_a_bad_request(mut request: ValidationRequest) {
    request.salary = "seven million".to_owned();

    let mut users = unknown_applicant();
    users.expect_update_by_id().times(0);

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity()
        .times(1)
        .return_once(|_| Ok(identity(true)));
    kyc.expect_verify_salary().times(0);
    kyc.expect_verify_photo().times(0);

    let error = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect_err("salary must be numeric");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn unparseable_gateway_bounds_are_internal(request: ValidationRequest) {
    let mut users = unknown_applicant();
    users.expect_update_by_id().times(0);

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity()
        .times(1)
        .return_once(|_| Ok(identity(true)));
    kyc.expect_verify_salary()
        .times(1)
        .return_once(|_| Ok(salary_band("low", "10000000")));
    kyc.expect_verify_photo().times(0);

    let error = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect_err("upstream contract violation");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[case::at_lower_bound("7500000", "9000000", false)]
#[case::at_upper_bound("1000000", "7500000", false)]
#[case::strictly_inside("7499999.99", "7500000.01", true)]
#[tokio::test]
async fn salary_acceptance_is_strict(
    request: ValidationRequest,
    #[case] lower: &'static str,
    #[case] upper: &'static str,
    #[case] accepted: bool,
) {
    let mut users = unknown_applicant();
    users
        .expect_update_by_id()
        .times(1)
        .withf(move |record: &UserRecord| {
            record.is_salary_validated == accepted && record.salary.is_some() == accepted
        })
        .return_once(|_| Ok(()));

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity()
        .times(1)
        .return_once(|_| Ok(identity(true)));
    kyc.expect_verify_salary()
        .times(1)
        .return_once(move |_| Ok(salary_band(lower, upper)));
    kyc.expect_verify_photo()
        .times(1)
        .return_once(|_| Ok(photo("valid")));

    let valid = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect("rejection is not an error");

    assert!(valid);
}

#[rstest]
#[case("Valid")]
#[case("invalid")]
#[case("")]
#[tokio::test]
async fn photo_requires_exact_valid_status(request: ValidationRequest, #[case] status: &'static str) {
    let mut users = unknown_applicant();
    users
        .expect_update_by_id()
        .times(1)
        .withf(|record: &UserRecord| !record.is_photo_validated && record.user_photo.is_none())
        .return_once(|_| Ok(()));

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity()
        .times(1)
        .return_once(|_| Ok(identity(true)));
    kyc.expect_verify_salary()
        .times(1)
        .return_once(|_| Ok(salary_band("5000000", "10000000")));
    kyc.expect_verify_photo()
        .times(1)
        .return_once(move |_| Ok(photo(status)));

    let valid = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect("rejection is not an error");

    assert!(valid);
}

#[rstest]
#[tokio::test]
async fn unconfirmed_identity_leaves_identity_fields_unset(request: ValidationRequest) {
    let mut users = unknown_applicant();
    users
        .expect_update_by_id()
        .times(1)
        .withf(|record: &UserRecord| {
            !record.is_national_id_validated
                && record.national_id.is_none()
                && record.birth_date.is_none()
                && record.is_salary_validated
        })
        .return_once(|_| Ok(()));

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity()
        .times(1)
        .return_once(|_| Ok(identity(false)));
    kyc.expect_verify_salary()
        .times(1)
        .return_once(|_| Ok(salary_band("5000000", "10000000")));
    kyc.expect_verify_photo()
        .times(1)
        .return_once(|_| Ok(photo("valid")));

    let valid = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect("validation completes");

    assert!(valid);
}

#[rstest]
#[tokio::test]
async fn unparseable_birth_date_still_validates_identity(mut request: ValidationRequest) {
    request.birth_date = "12/04/1990".to_owned();

    let mut users = unknown_applicant();
    users
        .expect_update_by_id()
        .times(1)
        .withf(|record: &UserRecord| record.is_national_id_validated && record.birth_date.is_none())
        .return_once(|_| Ok(()));

    let valid = service(users, accepting_gateway())
        .validate_data(user_id(), request)
        .await
        .expect("validation completes");

    assert!(valid);
}

#[rstest]
#[tokio::test]
async fn known_applicant_with_identity_validated_only_rechecks_photo(request: ValidationRequest) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_national_id()
        .times(1)
        .return_once(|_| Ok(Some(known_record(true, false))));
    users
        .expect_update_by_id()
        .times(1)
        .withf(|record: &UserRecord| record.id.as_i64() == 99 && record.is_photo_validated)
        .return_once(|_| Ok(()));

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity().times(0);
    kyc.expect_verify_salary().times(0);
    kyc.expect_verify_photo()
        .times(1)
        .return_once(|_| Ok(photo("valid")));

    let valid = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect("revalidation succeeds");

    assert!(valid);
}

#[rstest]
#[tokio::test]
async fn known_applicant_without_identity_gets_salary_recheck(request: ValidationRequest) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_national_id()
        .times(1)
        .return_once(|_| Ok(Some(known_record(false, true))));
    users
        .expect_update_by_id()
        .times(1)
        .withf(|record: &UserRecord| record.is_salary_validated && !record.is_national_id_validated)
        .return_once(|_| Ok(()));

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity().times(0);
    kyc.expect_verify_salary()
        .times(1)
        .return_once(|_| Ok(salary_band("5000000", "10000000")));
    kyc.expect_verify_photo().times(0);

    let valid = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect("revalidation succeeds");

    assert!(valid);
}

#[rstest]
#[tokio::test]
async fn fully_validated_applicant_skips_gateway_and_store(request: ValidationRequest) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_national_id()
        .times(1)
        .return_once(|_| Ok(Some(known_record(true, true))));
    users.expect_update_by_id().times(0);

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity().times(0);
    kyc.expect_verify_salary().times(0);
    kyc.expect_verify_photo().times(0);

    let valid = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect("nothing to do");

    assert!(valid);
}

#[rstest]
#[tokio::test]
async fn lookup_failure_is_internal(request: ValidationRequest) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_national_id()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("refused")));
    users.expect_update_by_id().times(0);

    let mut kyc = MockKycGateway::new();
    kyc.expect_verify_identity().times(0);

    let error = service(users, kyc)
        .validate_data(user_id(), request)
        .await
        .expect_err("lookup failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn persistence_failure_is_internal(request: ValidationRequest) {
    let mut users = unknown_applicant();
    users
        .expect_update_by_id()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::query("deadlock")));

    let error = service(users, accepting_gateway())
        .validate_data(user_id(), request)
        .await
        .expect_err("write failure surfaces");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert!(error.message().contains("persist validated applicant"));
}

#[rstest]
#[tokio::test]
async fn blank_national_id_is_rejected_before_lookup(mut request: ValidationRequest) {
    request.national_id = "  ".to_owned();

    let mut users = MockUserRepository::new();
    users.expect_find_by_national_id().times(0);

    let error = service(users, MockKycGateway::new())
        .validate_data(user_id(), request)
        .await
        .expect_err("national id is required");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn gateway_calls_share_the_request_trace_id(request: ValidationRequest) {
    let trace_id = TraceId::generate();
    let expected = trace_id.to_string();

    let mut users = unknown_applicant();
    users.expect_update_by_id().times(1).return_once(|_| Ok(()));

    let mut kyc = MockKycGateway::new();
    let identity_ref = expected.clone();
    kyc.expect_verify_identity()
        .times(1)
        .withf(move |check: &IdentityCheck| check.reference_id.as_str() == identity_ref)
        .return_once(|_| Ok(identity(true)));
    let salary_ref = expected.clone();
    kyc.expect_verify_salary()
        .times(1)
        .withf(move |check: &SalaryCheck| check.reference_id.as_str() == salary_ref)
        .return_once(|_| Ok(salary_band("5000000", "10000000")));
    let photo_ref = expected;
    kyc.expect_verify_photo()
        .times(1)
        .withf(move |check: &PhotoCheck| {
            check.reference_id.as_str() == photo_ref && check.user_photo == vec![4, 5, 6]
        })
        .return_once(|_| Ok(photo("valid")));

    let svc = service(users, kyc);
    let valid = TraceId::scope(trace_id, async move {
        svc.validate_data(user_id(), request).await
    })
    .await
    .expect("validation succeeds");

    assert!(valid);
}
