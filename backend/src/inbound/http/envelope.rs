//! Uniform JSON envelope wrapping every response body.
//!
//! ```json
//! { "success": true, "message": "success", "data": { } }
//! ```

use serde::{Deserialize, Serialize};

/// Message carried by successful responses.
pub const SUCCESS_MESSAGE: &str = "success";

/// Response envelope `{success, message, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_owned(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Successful envelope with `null` data.
    pub fn empty() -> Self {
        Self {
            success: true,
            message: SUCCESS_MESSAGE.to_owned(),
            data: None,
        }
    }

    /// Failed envelope with `null` data.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
