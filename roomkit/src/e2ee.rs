//! End-to-end encryption key management.
//!
//! The crate derives and holds key material; the media cipher itself lives
//! in the engine behind the backend seam.

use crate::error::{Result, RoomError};
use hkdf::Hkdf;
use sha2::Sha256;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Domain separation string mixed into every derived media key.
const KEY_INFO: &[u8] = b"meetrtc-e2ee-media-key";

/// Derived key size in bytes (AES-256 class material).
const KEY_LEN: usize = 32;

/// Tuning for the key provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyProviderOptions {
    /// Salt mixed into the derivation, fixed per deployment.
    pub ratchet_salt: String,
}

impl Default for KeyProviderOptions {
    fn default() -> Self {
        Self {
            ratchet_salt: "meetrtc-ratchet".to_string(),
        }
    }
}

/// Holds key material derived from a user passphrase.
///
/// `set_key` must complete before the room enables encryption; the
/// bootstrap treats it as the first half of the encryption-readiness
/// gate.
pub struct ExternalKeyProvider {
    options: KeyProviderOptions,
    key: Mutex<Option<Vec<u8>>>,
}

impl ExternalKeyProvider {
    pub fn new() -> Self {
        Self::with_options(KeyProviderOptions::default())
    }

    pub fn with_options(options: KeyProviderOptions) -> Self {
        Self {
            options,
            key: Mutex::new(None),
        }
    }

    /// Derives key material from the passphrase and installs it.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::Encryption`] when the passphrase is empty or
    /// the derivation fails.
    pub fn set_key(&self, passphrase: &str) -> Result<()> {
        if passphrase.is_empty() {
            return Err(RoomError::Encryption("empty passphrase".to_string()));
        }
        let derived = derive_key(passphrase, &self.options.ratchet_salt)?;
        let mut guard = self.key.lock().map_err(|_| RoomError::LockPoisoned)?;
        *guard = Some(derived);
        Ok(())
    }

    /// Whether key material is installed.
    pub fn has_key(&self) -> bool {
        self.key
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Copy of the installed key material, if any.
    pub fn key_material(&self) -> Option<Vec<u8>> {
        self.key.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Default for ExternalKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExternalKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalKeyProvider")
            .field("ratchet_salt", &self.options.ratchet_salt)
            .field("key_installed", &self.has_key())
            .finish()
    }
}

fn derive_key(passphrase: &str, salt: &str) -> Result<Vec<u8>> {
    let hk = Hkdf::<Sha256>::new(Some(salt.as_bytes()), passphrase.as_bytes());
    let mut okm = vec![0u8; KEY_LEN];
    hk.expand(KEY_INFO, &mut okm)
        .map_err(|_| RoomError::Encryption("key derivation failed".to_string()))?;
    Ok(okm)
}

/// E2EE configuration carried inside [`RoomOptions`](crate::RoomOptions).
#[derive(Debug, Clone)]
pub struct E2eeOptions {
    pub key_provider: Arc<ExternalKeyProvider>,
}

impl E2eeOptions {
    pub fn new(key_provider: Arc<ExternalKeyProvider>) -> Self {
        Self { key_provider }
    }
}
