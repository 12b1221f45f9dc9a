//! At-rest encryption for stored access tokens
//!
//! AES-256-GCM over the token column. Key rotation is out of scope for
//! this service; the key is fixed for the process lifetime.

use aes_gcm::{aead::Aead, Aes256Gcm, KeyInit, Nonce};
use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

/// Encrypted column pair as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncryptedField {
    /// Base64 encoded ciphertext
    pub data: String,
    /// Base64 encoded nonce
    pub nonce: String,
}

/// Field encryption service keyed by a process-wide 32-byte secret.
#[derive(Clone)]
pub struct FieldEncryption {
    key: [u8; 32],
}

impl FieldEncryption {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Load the key from `ACTHUB_ENCRYPTION_KEY` (64 hex characters).
    pub fn from_env() -> Result<Self> {
        let key_hex = std::env::var("ACTHUB_ENCRYPTION_KEY")
            .map_err(|_| anyhow!("ACTHUB_ENCRYPTION_KEY environment variable not set"))?;
        Self::from_hex(&key_hex)
    }

    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let key = hex::decode(key_hex)
            .map_err(|_| anyhow!("Invalid encryption key format, expected hex string"))?;
        if key.len() != 32 {
            return Err(anyhow!("Encryption key must be 32 bytes (64 hex characters)"));
        }
        let mut key_array = [0u8; 32];
        key_array.copy_from_slice(&key);
        Ok(Self::new(key_array))
    }

    pub fn encrypt_field(&self, plaintext: &str) -> Result<EncryptedField> {
        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;
        let ciphertext = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| anyhow!("Encryption failed: {}", e))?;

        Ok(EncryptedField {
            data: STANDARD.encode(&ciphertext),
            nonce: STANDARD.encode(nonce_bytes),
        })
    }

    pub fn decrypt_field(&self, encrypted: &EncryptedField) -> Result<String> {
        let nonce_bytes = STANDARD
            .decode(&encrypted.nonce)
            .map_err(|e| anyhow!("Failed to decode nonce: {}", e))?;
        if nonce_bytes.len() != 12 {
            return Err(anyhow!(
                "Invalid nonce length: expected 12 bytes, got {}",
                nonce_bytes.len()
            ));
        }
        let ciphertext = STANDARD
            .decode(&encrypted.data)
            .map_err(|e| anyhow!("Failed to decode ciphertext: {}", e))?;

        let cipher = Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| anyhow!("Failed to create cipher: {}", e))?;
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
            .map_err(|e| anyhow!("Decryption failed: {}", e))?;

        String::from_utf8(plaintext).map_err(|e| anyhow!("Invalid UTF-8 in decrypted data: {}", e))
    }

    /// Generate a fresh random key (provisioning helper).
    pub fn generate_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        key
    }

    pub fn generate_key_hex() -> String {
        hex::encode(Self::generate_key())
    }
}

impl std::fmt::Debug for FieldEncryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("FieldEncryption").finish_non_exhaustive()
    }
}
