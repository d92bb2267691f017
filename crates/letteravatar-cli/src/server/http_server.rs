//! Plain HTTP listener.

use std::future::Future;
use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;
use crate::config::ServerConfig;
use crate::server::lifecycle::{run, stop_requested};
use crate::server::{ServerError, ServerResult};

/// Binds the configured address and serves `app` over HTTP.
pub async fn serve_http(app: Router, config: &ServerConfig) -> ServerResult<()> {
    let addr = config.server_addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let (stopping_tx, stopping_rx) = watch::channel(false);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            stop_requested().await;
            stopping_tx.send_replace(true);
        })
        .into_future();

    run(config, drain_within(server, stopping_rx, config.shutdown_timeout())).await
}

/// Lets `server` drain after a stop, but no longer than `timeout`.
async fn drain_within<F>(
    server: F,
    mut stopping: watch::Receiver<bool>,
    timeout: Duration,
) -> io::Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    let deadline = async move {
        let stopped = stopping.wait_for(|stopping| *stopping).await.is_ok();
        if stopped {
            tokio::time::sleep(timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result,
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                timeout_secs = timeout.as_secs(),
                "Drain timeout elapsed, dropping open connections"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;

    #[tokio::test]
    async fn occupied_port_is_a_bind_error() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = occupied.local_addr().unwrap().port();

        let config = ServerConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port,
            ..ServerConfig::default()
        };

        let result = serve_http(Router::new(), &config).await;
        assert!(matches!(result, Err(ServerError::Bind { addr, .. }) if addr.port() == port));
    }

    #[tokio::test]
    async fn stalled_drain_is_cut_off() {
        let (stopping_tx, stopping_rx) = watch::channel(false);
        stopping_tx.send_replace(true);

        let stalled = std::future::pending::<io::Result<()>>();
        let result = drain_within(stalled, stopping_rx, Duration::from_millis(10)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn finished_server_result_is_kept() {
        let (_stopping_tx, stopping_rx) = watch::channel(false);

        let failed = async { Err(io::Error::other("accept failed")) };
        let result = drain_within(failed, stopping_rx, Duration::from_secs(30)).await;
        assert!(result.is_err());
    }
}
