//! SPKI SHA-256 fingerprints.
//!
//! A fingerprint is `base64(sha256(prefix || raw_key))`, where `prefix` is the
//! DER header from [`crate::prefix`] and `raw_key` is the handle's exported key.
//! For every supported key type this is the SHA-256 of the key's DER
//! SubjectPublicKeyInfo, the same value `openssl pkey -pubin -outform der |
//! openssl dgst -sha256 -binary | base64` prints.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::{Error, FingerprintError};
use crate::key::PublicKeyHandle;
use crate::prefix;

/// Length of a SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// SHA-256 digest of a key's SubjectPublicKeyInfo.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; DIGEST_LEN]);

impl Fingerprint {
    pub fn new(digest: [u8; DIGEST_LEN]) -> Self {
        Fingerprint(digest)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Standard base64 with padding, the form pins are configured in.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.0)
    }

    /// Hex digest prefixed with `sha256:`.
    pub fn to_key_id(&self) -> String {
        format!("sha256:{}", hex::encode(self.0))
    }

    /// Parse a padded standard base64 digest.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not base64 or does not decode to
    /// exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, Error> {
        let bytes = general_purpose::STANDARD.decode(encoded.trim())?;
        let digest: [u8; DIGEST_LEN] = bytes.as_slice().try_into().map_err(|_| {
            Error::InvalidFingerprint(format!(
                "expected {} bytes, got {}",
                DIGEST_LEN,
                bytes.len()
            ))
        })?;
        Ok(Fingerprint(digest))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fingerprint").field(&self.to_base64()).finish()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl FromStr for Fingerprint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Assemble the SubjectPublicKeyInfo bytes of `key`: the static DER prefix for
/// its key type followed by its raw exported bytes.
///
/// # Errors
///
/// - [`FingerprintError::KeyExportFailed`] if the handle refuses to export.
/// - [`FingerprintError::UnsupportedKeyType`] if no prefix fits the key.
pub fn spki_bytes<K: PublicKeyHandle + ?Sized>(key: &K) -> Result<Vec<u8>, FingerprintError> {
    let raw = key.export_raw().map_err(|e| {
        tracing::debug!(error = %e, "public key export failed");
        e
    })?;
    let attributes = key.attributes();
    let prefix = prefix::resolve(&attributes, raw.len())?;

    let mut spki = Vec::with_capacity(prefix.header.len() + raw.len());
    spki.extend_from_slice(prefix.header);
    spki.extend_from_slice(&raw);

    tracing::debug!(
        key_type = %prefix.key_type,
        spki_len = spki.len(),
        "assembled SubjectPublicKeyInfo"
    );
    Ok(spki)
}

/// Compute the SHA-256 SPKI digest of `key`.
pub fn compute_digest<K: PublicKeyHandle + ?Sized>(
    key: &K,
) -> Result<Fingerprint, FingerprintError> {
    let spki = spki_bytes(key)?;

    let mut hasher = Sha256::new();
    hasher.update(&spki);
    let hash = hasher.finalize();

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&hash);
    Ok(Fingerprint(digest))
}

/// Compute the pinning fingerprint of `key` as padded standard base64.
///
/// # Arguments
///
/// * `key` - The public key handle, borrowed for the duration of the call
///
/// # Returns
///
/// A 44-character base64 string encoding the 32-byte SHA-256 digest of the
/// key's SubjectPublicKeyInfo.
///
/// # Errors
///
/// Returns [`FingerprintError::KeyExportFailed`] if the key cannot be exported
/// and [`FingerprintError::UnsupportedKeyType`] if its algorithm and size are
/// not in the prefix table.
pub fn compute_fingerprint<K: PublicKeyHandle + ?Sized>(
    key: &K,
) -> Result<String, FingerprintError> {
    Ok(compute_digest(key)?.to_base64())
}
