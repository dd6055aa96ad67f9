//! Builders for HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use loan_origination::domain::ports::{
    FixtureLoanCommand, FixtureLoanQuery, FixtureUserValidation, LoanCommand, LoanQuery,
    UserValidation,
};
use loan_origination::domain::{LoanService, UserValidationService};
use loan_origination::inbound::http::state::HttpState;
use loan_origination::outbound::kyc::HttpKycGateway;
use loan_origination::outbound::persistence::{DbPool, DieselLoanRepository, DieselUserRepository};

use super::ServerConfig;

/// Build the validation orchestrator over the user table and the gateway.
fn build_validation(pool: &DbPool, gateway: Arc<HttpKycGateway>) -> Arc<dyn UserValidation> {
    Arc::new(UserValidationService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        gateway,
    ))
}

/// Build the loan command/query pair from a single service instance.
fn build_loan_pair(
    pool: &DbPool,
    clock: Arc<dyn Clock>,
) -> (Arc<dyn LoanCommand>, Arc<dyn LoanQuery>) {
    let service = Arc::new(LoanService::new(
        Arc::new(DieselLoanRepository::new(pool.clone())),
        clock,
    ));
    (
        service.clone() as Arc<dyn LoanCommand>,
        service as Arc<dyn LoanQuery>,
    )
}

/// Assemble HTTP state.
///
/// Uses the database-backed services when both a pool and a gateway are
/// configured, otherwise falls back to fixture ports.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match (&config.db_pool, &config.kyc_gateway) {
        (Some(pool), Some(gateway)) => {
            let (loans, loans_query) = build_loan_pair(pool, Arc::new(DefaultClock));
            HttpState::new(build_validation(pool, gateway.clone()), loans, loans_query)
        }
        _ => HttpState::new(
            Arc::new(FixtureUserValidation),
            Arc::new(FixtureLoanCommand),
            Arc::new(FixtureLoanQuery),
        ),
    };
    web::Data::new(state)
}
