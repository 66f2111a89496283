//! Backend entry-point: loads settings, prepares the store, and serves the
//! REST API with its OpenAPI docs.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server, drain_on, shutdown_signal};
use teahouse::inbound::http::health::HealthState;
use teahouse::outbound::persistence::{
    DbPool, DieselTeaRepository, DieselUserRepository, run_migrations,
};
use teahouse::settings::{ServerSettings, prepare_store};

fn resolve_bind_addr(settings: &ServerSettings) -> io::Result<SocketAddr> {
    (settings.host(), settings.port())
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "no address resolved for {}:{}",
                    settings.host(),
                    settings.port()
                ),
            )
        })
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

    let settings = ServerSettings::load()
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let bind_addr = resolve_bind_addr(&settings)?;
    info!(
        %bind_addr,
        reconcile_on_startup = settings.reconcile_on_startup(),
        seed_on_empty = settings.seed_on_empty(),
        allowed_origin = settings.allowed_origin.as_deref().unwrap_or("*"),
        "settings loaded"
    );

    let database_url = settings
        .database_url()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    run_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
    let pool = DbPool::new(settings.pool_config(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    prepare_store(
        &settings,
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselTeaRepository::new(pool.clone())),
    )
    .await
    .map_err(io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, pool).with_allowed_origin(settings.allowed_origin);
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(drain_on(health_state, server.handle(), shutdown_signal()));
    info!(%bind_addr, "server listening");
    server.await
}
