//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `LOAN_*` environment variables, CLI flags, or a config
//! file. Settings are loaded once in `main` and handed to constructors.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 9000;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;
const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_MIN_IDLE: u32 = 2;
const DEFAULT_DB_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_KYC_TIMEOUT_SECS: u64 = 10;

/// Runtime settings for the loan-origination service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOAN")]
pub struct AppSettings {
    /// Interface the HTTP server binds to.
    pub host: Option<String>,
    /// TCP port the HTTP server binds to.
    pub port: Option<u16>,
    /// Seconds allowed for a client to send request headers.
    pub read_timeout_secs: Option<u64>,
    /// Seconds allowed for a client to acknowledge connection shutdown.
    pub write_timeout_secs: Option<u64>,
    /// Seconds granted to in-flight requests on graceful shutdown.
    pub shutdown_timeout_secs: Option<u64>,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Minimum idle database connections kept warm.
    pub db_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connection_timeout_secs: Option<u64>,
    /// Base URL of the verification gateway.
    pub kyc_base_url: String,
    /// API key sent to the verification gateway.
    pub kyc_api_key: String,
    /// Application id sent to the verification gateway.
    pub kyc_app_id: Option<String>,
    /// Per-request timeout for verification gateway calls, in seconds.
    pub kyc_timeout_secs: Option<u64>,
}

impl AppSettings {
    /// Return the bind host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the bind port.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the client request timeout.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs.unwrap_or(DEFAULT_READ_TIMEOUT_SECS))
    }

    /// Return the client disconnect timeout.
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs.unwrap_or(DEFAULT_WRITE_TIMEOUT_SECS))
    }

    /// Return the graceful shutdown window.
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs.unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS))
    }

    /// Return the pool's maximum connection count.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Return the pool's minimum idle connection count.
    pub fn db_min_idle(&self) -> u32 {
        self.db_min_idle.unwrap_or(DEFAULT_DB_MIN_IDLE)
    }

    /// Return the pool checkout timeout.
    pub fn db_connection_timeout(&self) -> Duration {
        Duration::from_secs(
            self.db_connection_timeout_secs
                .unwrap_or(DEFAULT_DB_CONNECTION_TIMEOUT_SECS),
        )
    }

    /// Return the gateway application id.
    pub fn kyc_app_id(&self) -> &str {
        self.kyc_app_id
            .as_deref()
            .unwrap_or(crate::outbound::kyc::DEFAULT_KYC_APP_ID)
    }

    /// Return the gateway request timeout.
    pub fn kyc_timeout(&self) -> Duration {
        Duration::from_secs(self.kyc_timeout_secs.unwrap_or(DEFAULT_KYC_TIMEOUT_SECS))
    }
}
