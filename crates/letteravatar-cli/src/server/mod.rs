//! Listener setup and the serve loop.
//!
//! HTTPS is used when the `tls` feature is on and both PEM paths are set.

mod http_server;
#[cfg(feature = "tls")]
mod https_server;
mod lifecycle;

use std::io;
use std::net::SocketAddr;

use axum::Router;
use thiserror::Error;

use crate::config::ServerConfig;

/// Result of running the server.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Why the server could not start or stopped abnormally.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be opened.
    #[error("cannot listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The accept loop ended with an I/O error.
    #[error("server stopped unexpectedly: {0}")]
    Serve(#[source] io::Error),

    /// The certificate or key is missing or unreadable.
    #[cfg_attr(not(feature = "tls"), allow(dead_code))]
    #[error("unusable TLS material: {0}")]
    Tls(String),
}

/// Serves `app` until a stop signal arrives and open connections drain.
pub async fn serve(app: Router, config: &ServerConfig) -> ServerResult<()> {
    #[cfg(feature = "tls")]
    if let Some((cert, key)) = config.tls_paths() {
        return https_server::serve_https(app, config, cert, key).await;
    }

    http_server::serve_http(app, config).await
}
