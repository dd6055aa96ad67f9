//! OpenAPI schema definitions for the response envelope.
//!
//! [`ApiResponse`](super::envelope::ApiResponse) is generic, so each concrete
//! envelope shape is described here for the generated document.

use utoipa::ToSchema;

use super::loans::{LoanPaymentResponse, LoanResponse};

/// Failure envelope. `message` is the stable public message for the error
/// category.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    #[schema(example = false)]
    success: bool,
    #[schema(example = "bad request")]
    message: String,
    #[schema(value_type = Option<Object>)]
    data: Option<serde_json::Value>,
}

/// Success envelope without data.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EmptyEnvelopeSchema {
    #[schema(example = true)]
    success: bool,
    #[schema(example = "success")]
    message: String,
    #[schema(value_type = Option<Object>)]
    data: Option<serde_json::Value>,
}

/// Success envelope carrying a loan.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct LoanEnvelopeSchema {
    success: bool,
    message: String,
    data: LoanResponse,
}

/// Success envelope carrying a list of payments.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaymentsEnvelopeSchema {
    success: bool,
    message: String,
    data: Vec<LoanPaymentResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_envelope_schema_lists_envelope_fields() {
        let schema_json = schema_to_json::<ErrorEnvelopeSchema>();

        for field in ["success", "message", "data"] {
            assert!(schema_json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn loan_envelope_schema_references_loan() {
        let schema_json = schema_to_json::<LoanEnvelopeSchema>();

        assert!(schema_json.contains("LoanResponse"));
    }
}
