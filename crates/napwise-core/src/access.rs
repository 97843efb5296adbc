//! Shared household passphrase gate.

use sha2::{Digest, Sha256};

use crate::error::ValidationError;
use crate::storage::AccessConfig;

/// Hex-encoded SHA-256 of a passphrase.
pub fn hash_passphrase(passphrase: &str) -> String {
    hex::encode(Sha256::digest(passphrase.as_bytes()))
}

/// Checks a passphrase against the configured digest.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    digest: Option<String>,
}

impl AccessGate {
    pub fn from_config(config: &AccessConfig) -> Self {
        let digest = config.passphrase_sha256.trim();
        Self {
            digest: (!digest.is_empty()).then(|| digest.to_ascii_lowercase()),
        }
    }

    /// Gate with no passphrase set.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.digest.is_some()
    }

    pub fn verify(&self, passphrase: Option<&str>) -> bool {
        match &self.digest {
            None => true,
            Some(digest) => passphrase.is_some_and(|p| hash_passphrase(p) == *digest),
        }
    }

    pub fn check(&self, passphrase: Option<&str>) -> Result<(), ValidationError> {
        if self.verify(passphrase) {
            Ok(())
        } else {
            Err(ValidationError::AccessDenied)
        }
    }
}
