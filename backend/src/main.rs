//! Backend entry-point: loads configuration, prepares storage and serves the
//! REST API with its OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use backend::outbound::security::{BuildMode, token_settings_from_env};
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let tokens = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid token configuration")?;
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;

    let mut config = ServerConfig::new(bind_addr, tokens, settings.google());
    let mut health_state = HealthState::new();
    if let Some(database_url) = settings.database_url() {
        run_migrations(database_url)
            .await
            .wrap_err("database migrations failed")?;
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .wrap_err("failed to build database pool")?;
        health_state = health_state.with_dependency(Arc::new(pool.clone()));
        config = config.with_db_pool(pool);
    }

    let server = create_server(web::Data::new(health_state), config)
        .wrap_err("failed to start HTTP server")?;
    server.await.wrap_err("HTTP server failed")?;
    Ok(())
}
