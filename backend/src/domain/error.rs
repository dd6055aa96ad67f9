//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses using the [`ErrorCode`] and never expose the diagnostic message.

use serde::{Deserialize, Serialize};

use crate::domain::TraceId;

/// Closed set of failure categories recognised by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed, unauthenticated, or fails validation.
    InvalidRequest,
    /// The requested resource does not exist.
    NotFound,
    /// A store, upstream, or otherwise unexpected failure.
    InternalError,
}

impl ErrorCode {
    /// Stable message returned to callers for this category.
    ///
    /// # Examples
    /// ```
    /// use loan_origination::domain::ErrorCode;
    ///
    /// assert_eq!(ErrorCode::NotFound.public_message(), "resource not found");
    /// ```
    pub fn public_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "bad request",
            Self::NotFound => "resource not found",
            Self::InternalError => "oops! something went wrong",
        }
    }
}

/// Domain error carrying a category, a diagnostic message, and the trace
/// identifier active when it was raised.
///
/// # Examples
/// ```
/// use loan_origination::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("loan C-1 missing").with_context("get loan");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "get loan: loan C-1 missing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
}

impl Error {
    /// Create a new error, capturing the current trace identifier if one is
    /// in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Diagnostic message. Logged, never returned to callers.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier captured at construction, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Stable message for callers, derived from the category.
    pub fn public_message(&self) -> &'static str {
        self.code.public_message()
    }

    /// Attach an explicit trace identifier.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Prepend context to the diagnostic message, keeping the category.
    pub fn with_context(mut self, context: impl std::fmt::Display) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
