#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process::ExitCode;

use anyhow::Context;
use axum::Router;
use letteravatar_reqwest::ReqwestProbe;
use letteravatar_server::handler::routes;
use letteravatar_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
};
use letteravatar_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};

pub const TRACING_TARGET_SERVER_STARTUP: &str = "letteravatar_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "letteravatar_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "letteravatar_cli::config";

#[tokio::main]
async fn main() -> ExitCode {
    let Err(error) = run().await else {
        return ExitCode::SUCCESS;
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "letteravatar exited with an error"
        );
    } else {
        eprintln!("letteravatar: {error:#}");
    }

    ExitCode::FAILURE
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    cli.init_tracing();

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "Starting letteravatar"
    );

    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli)?;
    let router = create_router(state, &cli.middleware);
    server::serve(router, &cli.server).await?;

    Ok(())
}

fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let probe =
        ReqwestProbe::new(cli.probe.clone()).context("failed to create remote avatar probe")?;

    ServiceState::from_config(&cli.service, probe.into_checker())
        .context("failed to create service state")
}

/// Wraps the routes so that recovery sees every request first and the
/// security layer sits closest to the handlers.
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_state(state)
        .with_security(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
