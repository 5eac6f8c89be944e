//! Verifier oracle seam.
//!
//! The search engine never derives keys itself. It hands every candidate to a
//! [`Verifier`], which answers with key material when the candidate unlocks the
//! target credential and `None` otherwise.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Failure of the oracle itself, as opposed to a plain non-match.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("malformed target '{target}': {reason}")]
    MalformedTarget { target: String, reason: String },

    #[error("{0}")]
    Backend(String),
}

/// Key material released by a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Decides whether a candidate passphrase unlocks a credential.
pub trait Verifier: Send + Sync {
    /// Reject a target that can never be unlocked, before any worker starts.
    fn check_target(&self, _target: &str) -> Result<(), OracleError> {
        Ok(())
    }

    /// `Ok(None)` means the candidate does not unlock `target`.
    fn verify(&self, target: &str, candidate: &str) -> Result<Option<KeyMaterial>, OracleError>;
}

impl<F> Verifier for F
where
    F: Fn(&str, &str) -> Result<Option<KeyMaterial>, OracleError> + Send + Sync,
{
    fn verify(&self, target: &str, candidate: &str) -> Result<Option<KeyMaterial>, OracleError> {
        self(target, candidate)
    }
}

/// Oracle whose target identifier is the hex SHA-256 digest of the passphrase.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigestVerifier;

impl DigestVerifier {
    /// Target identifier this oracle expects for `passphrase`.
    pub fn identifier_for(passphrase: &str) -> String {
        hex::encode(Sha256::digest(passphrase.as_bytes()))
    }

    fn decode_target(target: &str) -> Result<[u8; 32], OracleError> {
        let malformed = |reason: String| OracleError::MalformedTarget {
            target: target.to_string(),
            reason,
        };
        let bytes = hex::decode(target.trim()).map_err(|e| malformed(e.to_string()))?;
        bytes
            .try_into()
            .map_err(|b: Vec<u8>| malformed(format!("expected 32 bytes, got {}", b.len())))
    }
}

impl Verifier for DigestVerifier {
    fn check_target(&self, target: &str) -> Result<(), OracleError> {
        Self::decode_target(target).map(|_| ())
    }

    fn verify(&self, target: &str, candidate: &str) -> Result<Option<KeyMaterial>, OracleError> {
        let expected = Self::decode_target(target)?;
        let digest = Sha256::digest(candidate.as_bytes());
        if digest.as_slice() == expected {
            Ok(Some(KeyMaterial::new(digest.to_vec())))
        } else {
            Ok(None)
        }
    }
}
