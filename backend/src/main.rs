//! Service entry-point: loads settings, applies migrations, wires adapters,
//! and serves the loan API.

mod server;

use std::ffi::OsString;
use std::io;

use actix_web::web;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use loan_origination::AppSettings;
use loan_origination::inbound::http::health::HealthState;
use loan_origination::outbound::kyc::{HttpKycGateway, KycCredentials};
use loan_origination::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use ortho_config::OrthoConfig;
use server::{ServerConfig, ServerTimeouts, create_server};

fn startup_error(context: &str, error: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{context}: {error}"))
}

fn load_settings<I>(args: I) -> io::Result<AppSettings>
where
    I: IntoIterator<Item = OsString>,
{
    AppSettings::load_from_iter(args).map_err(|err| startup_error("failed to load settings", err))
}

async fn apply_migrations(database_url: String) -> io::Result<()> {
    let applied = web::block(move || run_pending_migrations(&database_url))
        .await
        .map_err(|err| startup_error("migration task failed", err))?
        .map_err(|err| startup_error("database migrations failed", err))?;
    info!(applied, "database migrations applied");
    Ok(())
}

fn build_kyc_gateway(settings: &AppSettings) -> io::Result<HttpKycGateway> {
    let base_url = Url::parse(&settings.kyc_base_url)
        .map_err(|err| startup_error("invalid kyc base url", err))?;
    let credentials = KycCredentials {
        app_id: settings.kyc_app_id().to_owned(),
        ..KycCredentials::new(settings.kyc_api_key.clone())
    };
    HttpKycGateway::new(base_url, credentials, settings.kyc_timeout())
        .map_err(|err| startup_error("kyc gateway setup failed", err))
}

async fn build_db_pool(settings: &AppSettings) -> io::Result<DbPool> {
    let config = PoolConfig::new(settings.database_url.clone())
        .with_max_size(settings.db_max_connections())
        .with_min_idle(Some(settings.db_min_idle()))
        .with_connection_timeout(settings.db_connection_timeout());
    DbPool::new(config)
        .await
        .map_err(|err| startup_error("database pool setup failed", err))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;

    apply_migrations(settings.database_url.clone()).await?;
    let pool = build_db_pool(&settings).await?;
    let gateway = build_kyc_gateway(&settings)?;

    let config = ServerConfig::new(
        settings.host(),
        settings.port(),
        ServerTimeouts::from_settings(&settings),
    )
    .with_db_pool(pool)
    .with_kyc_gateway(gateway);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(host = settings.host(), port = settings.port(), "listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}
