//! HTTP server configuration object and helpers.

use std::sync::Arc;
use std::time::Duration;

use loan_origination::AppSettings;
use loan_origination::outbound::kyc::HttpKycGateway;
use loan_origination::outbound::persistence::DbPool;

/// Socket-level timeouts applied to the actix server.
#[derive(Debug, Clone, Copy)]
pub struct ServerTimeouts {
    pub(crate) client_request: Duration,
    pub(crate) client_disconnect: Duration,
    pub(crate) shutdown: Duration,
}

impl ServerTimeouts {
    /// Take the read, write, and shutdown windows from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            client_request: settings.read_timeout(),
            client_disconnect: settings.write_timeout(),
            shutdown: settings.shutdown_timeout(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) timeouts: ServerTimeouts,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) kyc_gateway: Option<Arc<HttpKycGateway>>,
}

impl ServerConfig {
    /// Construct a server configuration for the given listener address.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16, timeouts: ServerTimeouts) -> Self {
        Self {
            host: host.into(),
            port,
            timeouts,
            db_pool: None,
            kyc_gateway: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Together with a gateway, this switches the HTTP state from fixture
    /// ports to the database-backed services.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the verification gateway adapter.
    #[must_use]
    pub fn with_kyc_gateway(mut self, gateway: HttpKycGateway) -> Self {
        self.kyc_gateway = Some(Arc::new(gateway));
        self
    }

    /// Return the `host:port` pair the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
