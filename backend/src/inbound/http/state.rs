//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureLoanCommand, FixtureLoanQuery, FixtureUserValidation, LoanCommand, LoanQuery,
    UserValidation,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub validation: Arc<dyn UserValidation>,
    pub loans: Arc<dyn LoanCommand>,
    pub loans_query: Arc<dyn LoanQuery>,
}

impl HttpState {
    /// Construct state from the driving port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use loan_origination::domain::ports::{
    ///     FixtureLoanCommand, FixtureLoanQuery, FixtureUserValidation,
    /// };
    /// use loan_origination::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureUserValidation),
    ///     Arc::new(FixtureLoanCommand),
    ///     Arc::new(FixtureLoanQuery),
    /// );
    /// # let _ = state;
    /// ```
    pub fn new(
        validation: Arc<dyn UserValidation>,
        loans: Arc<dyn LoanCommand>,
        loans_query: Arc<dyn LoanQuery>,
    ) -> Self {
        Self {
            validation,
            loans,
            loans_query,
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureUserValidation),
            Arc::new(FixtureLoanCommand),
            Arc::new(FixtureLoanQuery),
        )
    }
}
