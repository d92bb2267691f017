//! Test doubles for the remote avatar service.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::remote::AvatarProbe;
use crate::{Error, Result};

/// Probe that answers with a fixed status and records every request.
#[derive(Debug, Default)]
pub struct MockProbe {
    status: Option<u16>,
    calls: AtomicUsize,
    last_url: Mutex<Option<String>>,
}

impl MockProbe {
    /// Probe answering every request with `status`.
    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Probe failing every request at the transport level.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Number of requests issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URL of the most recent request.
    pub fn last_url(&self) -> Option<String> {
        self.last_url.lock().ok().and_then(|url| url.clone())
    }
}

#[async_trait]
impl AvatarProbe for MockProbe {
    async fn head(&self, url: &str) -> Result<u16> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last_url) = self.last_url.lock() {
            *last_url = Some(url.to_owned());
        }

        self.status
            .ok_or_else(|| Error::network_error().with_message("connection refused"))
    }
}
