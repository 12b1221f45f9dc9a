//! Encrypted continuation token carried through the OAuth redirect
//!
//! The form render and the OAuth callback are independent stateless
//! invocations; the `state` query parameter is the only channel between
//! them. The codec seals the callback URL (plus any session data) with
//! AES-256-GCM and emits a URL-safe token, so the third party relaying it
//! can neither read nor alter the payload.

use acthub_core::HubError;
use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const NONCE_LEN: usize = 12;

/// Logical content of a continuation token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatePayload {
    /// The hub client's callback URL; doubles as the session store key.
    pub state_url: String,
    /// Arbitrary session data to restore after the redirect.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub session: Map<String, Value>,
}

impl StatePayload {
    pub fn new(state_url: impl Into<String>) -> Self {
        Self { state_url: state_url.into(), session: Map::new() }
    }

    pub fn with_session(mut self, session: Map<String, Value>) -> Self {
        self.session = session;
        self
    }
}

/// Opaque decode failure. Malformed input, truncation, a failed
/// authentication tag and a wrong key are indistinguishable from the
/// outside; callers re-issue the login link.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid state token")]
pub struct StateTokenError;

impl From<StateTokenError> for HubError {
    fn from(_: StateTokenError) -> Self {
        HubError::Token
    }
}

/// Authenticated-encryption codec keyed by a process-wide secret.
#[derive(Clone)]
pub struct StateTokenCodec {
    key: [u8; 32],
}

impl StateTokenCodec {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Load the key from 64 hex characters (`ACTHUB_STATE_KEY`).
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key = hex::decode(key_hex)
            .map_err(|_| anyhow!("Invalid state key format, expected hex string"))?;
        if key.len() != 32 {
            return Err(anyhow!("State key must be 32 bytes (64 hex characters)"));
        }
        let mut key_array = [0u8; 32];
        key_array.copy_from_slice(&key);
        Ok(Self::new(key_array))
    }

    /// Seal a payload into a URL-safe token: base64url-no-pad of
    /// `nonce || ciphertext`. Safe to embed in a query parameter as-is.
    pub fn encode(&self, payload: &StatePayload) -> Result<String, StateTokenError> {
        let plaintext = serde_json::to_vec(payload).map_err(|_| StateTokenError)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(&self.key).map_err(|_| StateTokenError)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_slice())
            .map_err(|_| StateTokenError)?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce_bytes);
        raw.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    /// Open a token produced by [`encode`]. Fails closed on any
    /// corruption or key mismatch.
    ///
    /// [`encode`]: StateTokenCodec::encode
    pub fn decode(&self, token: &str) -> Result<StatePayload, StateTokenError> {
        let raw = URL_SAFE_NO_PAD.decode(token).map_err(|_| StateTokenError)?;
        if raw.len() <= NONCE_LEN {
            return Err(StateTokenError);
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);

        let cipher = Aes256Gcm::new_from_slice(&self.key).map_err(|_| StateTokenError)?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| StateTokenError)?;

        serde_json::from_slice(&plaintext).map_err(|_| StateTokenError)
    }
}

impl std::fmt::Debug for StateTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateTokenCodec").finish_non_exhaustive()
    }
}
