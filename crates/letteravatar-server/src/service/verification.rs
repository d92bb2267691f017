//! Anti-forgery tokens for the browser verification callback.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Domain separator mixed into every token.
const TOKEN_CONTEXT: &[u8] = b"letteravatar:verify:";

/// Issues and checks per-session verification tokens.
///
/// A token is the hex encoded HMAC-SHA256 of the session identifier, so it
/// needs no server-side storage and stays valid for the whole session.
#[derive(Clone)]
pub struct VerificationGuard {
    mac: HmacSha256,
}

impl VerificationGuard {
    /// Creates a guard keyed with `secret`.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .map_err(|_| Error::config("verification secret cannot key HMAC-SHA256"))?;
        Ok(Self { mac })
    }

    /// Token for `session`.
    pub fn issue(&self, session: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(TOKEN_CONTEXT);
        mac.update(session.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Whether `token` was issued for `session`.
    pub fn verify(&self, session: &str, token: &str) -> bool {
        let Ok(tag) = hex::decode(token.trim()) else {
            return false;
        };

        let mut mac = self.mac.clone();
        mac.update(TOKEN_CONTEXT);
        mac.update(session.as_bytes());
        mac.verify_slice(&tag).is_ok()
    }
}

impl fmt::Debug for VerificationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationGuard").finish_non_exhaustive()
    }
}
