//! Reqwest-backed verification gateway adapter.
//!
//! This adapter owns transport details only: request serialisation, the
//! authentication headers, status mapping, and JSON decoding into domain
//! verdicts. Acceptance rules stay in the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    GatewayResponseDto, IdentityRequestDto, PhotoDataDto, PhotoRequestDto, SalaryRequestDto,
    VerificationDataDto,
};
use crate::domain::ports::{KycGateway, KycGatewayError};
use crate::domain::{
    IdentityCheck, IdentityVerification, PhotoCheck, PhotoVerification, SalaryCheck,
    SalaryVerification,
};

const IDENTITY_PATH: &str = "veryfi/national-id";
const SALARY_PATH: &str = "veryfi/salary";
const PHOTO_PATH: &str = "veryfi/photo";
const API_KEY_HEADER: &str = "x-api-key";
const APP_ID_HEADER: &str = "x-app-id";

/// Default application id sent in `x-app-id`.
pub const DEFAULT_KYC_APP_ID: &str = "xyz";

/// Credentials presented to the gateway on every call.
#[derive(Debug, Clone)]
pub struct KycCredentials {
    /// Value of the `x-api-key` header.
    pub api_key: String,
    /// Value of the `x-app-id` header.
    pub app_id: String,
}

impl KycCredentials {
    /// Credentials with the default application id.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            app_id: DEFAULT_KYC_APP_ID.to_owned(),
        }
    }
}

/// Errors raised while constructing the adapter.
#[derive(Debug, thiserror::Error)]
pub enum KycClientBuildError {
    /// The reqwest client could not be built.
    #[error("failed to build kyc http client: {0}")]
    Client(#[from] reqwest::Error),
    /// An endpoint could not be derived from the base URL.
    #[error("invalid kyc endpoint {path}: {message}")]
    Endpoint { path: &'static str, message: String },
}

#[derive(Debug, Clone)]
struct Endpoints {
    identity: Url,
    salary: Url,
    photo: Url,
}

impl Endpoints {
    fn resolve(base_url: &Url) -> Result<Self, KycClientBuildError> {
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let join = |path: &'static str| {
            base.join(path)
                .map_err(|error| KycClientBuildError::Endpoint {
                    path,
                    message: error.to_string(),
                })
        };
        Ok(Self {
            identity: join(IDENTITY_PATH)?,
            salary: join(SALARY_PATH)?,
            photo: join(PHOTO_PATH)?,
        })
    }
}

/// Verification gateway adapter performing one JSON POST per check.
#[derive(Debug, Clone)]
pub struct HttpKycGateway {
    client: Client,
    endpoints: Endpoints,
    credentials: KycCredentials,
}

impl HttpKycGateway {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// check endpoints cannot be derived from `base_url`.
    pub fn new(
        base_url: Url,
        credentials: KycCredentials,
        timeout: Duration,
    ) -> Result<Self, KycClientBuildError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoints: Endpoints::resolve(&base_url)?,
            credentials,
        })
    }

    async fn post<B, T>(&self, endpoint: &Url, body: &B) -> Result<T, KycGatewayError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(endpoint.clone())
            .header(API_KEY_HEADER, self.credentials.api_key.as_str())
            .header(APP_ID_HEADER, self.credentials.app_id.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        if status != StatusCode::OK {
            return Err(map_status_error(status, bytes.as_ref()));
        }

        let decoded: GatewayResponseDto<T> = parse_body(bytes.as_ref())?;
        debug!(
            endpoint = endpoint.path(),
            message = %decoded.message,
            "kyc gateway answered"
        );
        Ok(decoded.data)
    }
}

#[async_trait]
impl KycGateway for HttpKycGateway {
    async fn verify_identity(
        &self,
        check: &IdentityCheck,
    ) -> Result<IdentityVerification, KycGatewayError> {
        let data: VerificationDataDto = self
            .post(&self.endpoints.identity, &IdentityRequestDto::from(check))
            .await?;
        Ok(data.into())
    }

    async fn verify_salary(
        &self,
        check: &SalaryCheck,
    ) -> Result<SalaryVerification, KycGatewayError> {
        let data: VerificationDataDto = self
            .post(&self.endpoints.salary, &SalaryRequestDto::from(check))
            .await?;
        Ok(data.into())
    }

    async fn verify_photo(&self, check: &PhotoCheck) -> Result<PhotoVerification, KycGatewayError> {
        let data: PhotoDataDto = self
            .post(&self.endpoints.photo, &PhotoRequestDto::from(check))
            .await?;
        Ok(data.into())
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<GatewayResponseDto<T>, KycGatewayError> {
    serde_json::from_slice(body).map_err(|error| {
        KycGatewayError::decode(format!(
            "invalid gateway JSON payload: {error}; body: {}",
            body_preview(body)
        ))
    })
}

fn map_transport_error(error: reqwest::Error) -> KycGatewayError {
    if error.is_timeout() {
        KycGatewayError::transport(format!("request timed out: {error}"))
    } else {
        KycGatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> KycGatewayError {
    KycGatewayError::unexpected_status(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
#[path = "http_gateway_tests.rs"]
mod tests;
