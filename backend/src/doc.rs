//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the loan and health endpoints together with the
//! response envelope shapes. The caller identity travels in the `x-user-id`
//! header set by the upstream auth proxy, declared here as an API key scheme.
//!
//! The document backs Swagger UI (debug builds) and the `openapi-dump` binary.

use crate::inbound::http::auth::USER_ID_HEADER;
use crate::inbound::http::loans::{
    CreateLoanBody, CreatePaymentBody, LimitTypeResponse, LoanPaymentResponse, LoanResponse,
    LoanTypeResponse,
};
use crate::inbound::http::schemas::{
    EmptyEnvelopeSchema, ErrorEnvelopeSchema, LoanEnvelopeSchema, PaymentsEnvelopeSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the user id header scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "UserIdHeader",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                USER_ID_HEADER,
                "Authenticated user id injected by the upstream auth proxy.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Loan origination API",
        description = "Applicant verification, loan origination, and repayment history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("UserIdHeader" = [])),
    paths(
        crate::inbound::http::loans::create_loan,
        crate::inbound::http::loans::get_loan,
        crate::inbound::http::loans::list_payments,
        crate::inbound::http::loans::create_payment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateLoanBody,
        CreatePaymentBody,
        LoanResponse,
        LoanTypeResponse,
        LimitTypeResponse,
        LoanPaymentResponse,
        ErrorEnvelopeSchema,
        EmptyEnvelopeSchema,
        LoanEnvelopeSchema,
        PaymentsEnvelopeSchema
    )),
    tags(
        (name = "loans", description = "Loan origination and repayments"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/loan")]
    #[case("/loans/{contract_number}")]
    #[case("/loan/{contract_number}/payments")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn document_lists_every_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn envelope_schemas_expose_success_message_and_data() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let envelope = schemas
            .get("ErrorEnvelopeSchema")
            .expect("error envelope schema");

        for field in ["success", "message", "data"] {
            assert_object_schema_has_field(envelope, field);
        }
    }

    #[rstest]
    fn user_id_header_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("UserIdHeader"));
    }
}
