//! Stop signals and start/stop logging around a running listener.

use std::future::Future;
use std::io;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::server::{ServerError, ServerResult};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Resolves when the process receives Ctrl+C or, on Unix, SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
pub async fn stop_requested() {
    let signal = tokio::select! {
        () = interrupt() => "SIGINT",
        () = terminate() => "SIGTERM",
    };

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal,
        "Stop requested, draining connections"
    );
}

async fn interrupt() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "Cannot listen for Ctrl+C"
        );
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %error,
                "Cannot listen for SIGTERM"
            );
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Awaits `server`, logging when it starts accepting and how it ended.
pub async fn run<F>(config: &ServerConfig, server: F) -> ServerResult<()>
where
    F: Future<Output = io::Result<()>>,
{
    if config.is_public() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            host = %config.host,
            "Listening on every interface"
        );
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %config.server_addr(),
        tls = config.is_tls_enabled(),
        "Accepting connections"
    );

    let started_at = Instant::now();
    let result = server.await;
    let uptime_secs = started_at.elapsed().as_secs();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs,
                "Server stopped"
            );
            Ok(())
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %error,
                kind = ?error.kind(),
                uptime_secs,
                "Server failed"
            );
            Err(ServerError::Serve(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_exit_is_ok() {
        let config = ServerConfig::default();
        assert!(run(&config, async { Ok(()) }).await.is_ok());
    }

    #[tokio::test]
    async fn io_failure_is_reported() {
        let config = ServerConfig::default();
        let result = run(&config, async {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        })
        .await;

        match result {
            Err(ServerError::Serve(error)) => {
                assert_eq!(error.kind(), io::ErrorKind::ConnectionReset)
            }
            other => panic!("expected a serve error, got {other:?}"),
        }
    }
}
