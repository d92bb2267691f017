//! HTTPS listener on rustls.

use std::path::Path;

use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;

use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;
use crate::server::lifecycle::{run, stop_requested};
use crate::server::{ServerError, ServerResult};

/// Loads the PEM pair and serves `app` over HTTPS.
pub async fn serve_https(
    app: Router,
    config: &ServerConfig,
    cert: &Path,
    key: &Path,
) -> ServerResult<()> {
    let tls = load_pem_pair(cert, key).await?;

    let handle = Handle::new();
    let drain = config.shutdown_timeout();
    tokio::spawn({
        let handle = handle.clone();
        async move {
            stop_requested().await;
            handle.graceful_shutdown(Some(drain));
        }
    });

    let server = axum_server::bind_rustls(config.server_addr(), tls)
        .handle(handle)
        .serve(app.into_make_service());

    run(config, server).await
}

async fn load_pem_pair(cert: &Path, key: &Path) -> ServerResult<RustlsConfig> {
    for (label, path) in [("certificate", cert), ("private key", key)] {
        let metadata = std::fs::metadata(path).map_err(|error| {
            ServerError::Tls(format!("cannot read {label} {}: {error}", path.display()))
        })?;

        if !metadata.is_file() || metadata.len() == 0 {
            return Err(ServerError::Tls(format!(
                "{label} {} is not a non-empty file",
                path.display()
            )));
        }
    }

    let tls = RustlsConfig::from_pem_file(cert, key)
        .await
        .map_err(|error| ServerError::Tls(format!("cannot parse PEM pair: {error}")))?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        cert = %cert.display(),
        "TLS certificate loaded"
    );

    Ok(tls)
}
