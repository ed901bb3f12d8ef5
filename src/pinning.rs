use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorCode, FingerprintError};
use crate::fingerprint::{compute_digest, Fingerprint};
use crate::key::PublicKeyHandle;
use crate::types::pinning::PinnedFingerprint;

/// Result of checking a key against a pin set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinningResult {
    /// The key's fingerprint is pinned.
    Matched(Fingerprint),
    /// The key was fingerprinted but matches no pin.
    Mismatch(Fingerprint),
    /// The key could not be fingerprinted at all.
    Unpinnable(FingerprintError),
}

impl PinningResult {
    pub fn is_match(&self) -> bool {
        matches!(self, PinningResult::Matched(_))
    }
}

/// Trusted SPKI fingerprints, loaded from configuration.
///
/// ```json
/// {
///   "pins": [
///     { "fingerprint": "pBFMLdJPHlDAMeMLz1oVJqseO92HqTu456/X+TGJqOU=", "label": "api" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinSet {
    #[serde(default)]
    pins: Vec<PinnedFingerprint>,
}

impl PinSet {
    pub fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Add a pin. A fingerprint that is already pinned is left as is.
    pub fn add(&mut self, pin: PinnedFingerprint) {
        if !self.contains(&pin.fingerprint) {
            self.pins.push(pin);
        }
    }

    pub fn add_fingerprint(&mut self, fingerprint: Fingerprint) {
        self.add(PinnedFingerprint::new(fingerprint));
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.pins.iter().any(|p| p.fingerprint == *fingerprint)
    }

    pub fn pins(&self) -> &[PinnedFingerprint] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Fingerprint `key` and compare it against the pins. An empty set matches
    /// nothing.
    pub fn check_key<K: PublicKeyHandle + ?Sized>(&self, key: &K) -> PinningResult {
        match compute_digest(key) {
            Ok(fingerprint) if self.contains(&fingerprint) => {
                tracing::debug!(%fingerprint, "public key matches pin");
                PinningResult::Matched(fingerprint)
            }
            Ok(fingerprint) => {
                tracing::warn!(%fingerprint, pins = self.len(), "public key matches no pin");
                PinningResult::Mismatch(fingerprint)
            }
            Err(e) => {
                tracing::warn!(error = %e, "public key cannot be fingerprinted");
                PinningResult::Unpinnable(e)
            }
        }
    }

    /// Fail-closed form of [`PinSet::check_key`]: anything but a match is an
    /// error.
    pub fn verify_key<K: PublicKeyHandle + ?Sized>(&self, key: &K) -> Result<Fingerprint, Error> {
        match self.check_key(key) {
            PinningResult::Matched(fingerprint) => Ok(fingerprint),
            PinningResult::Mismatch(fingerprint) => Err(Error::Verification {
                code: ErrorCode::KeyPinMismatch,
                message: format!(
                    "Public key fingerprint '{}' matches none of {} pins",
                    fingerprint,
                    self.len()
                ),
            }),
            PinningResult::Unpinnable(e) => Err(Error::Verification {
                code: e.code(),
                message: e.to_string(),
            }),
        }
    }

    /// Serialize the pin set to JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a pin set from JSON. Every pin must be a padded base64
    /// SHA-256 digest.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let parsed: PinSet = serde_json::from_str(json)?;
        let mut set = PinSet::new();
        for pin in parsed.pins {
            set.add(pin);
        }
        Ok(set)
    }

    /// Load a pin set from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let set = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), pins = set.len(), "loaded pin set");
        Ok(set)
    }
}

impl FromIterator<Fingerprint> for PinSet {
    fn from_iter<I: IntoIterator<Item = Fingerprint>>(iter: I) -> Self {
        let mut set = PinSet::new();
        for fingerprint in iter {
            set.add_fingerprint(fingerprint);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::compute_fingerprint;
    use crate::key::PublicKey;
    use crate::types::key::{EcCurve, KeyAttributes};
    use std::io::Write;

    struct LockedKey;

    impl PublicKeyHandle for LockedKey {
        fn attributes(&self) -> KeyAttributes {
            KeyAttributes::ec(EcCurve::NistP256)
        }

        fn export_raw(&self) -> Result<Vec<u8>, FingerprintError> {
            Err(FingerprintError::KeyExportFailed("handle released".to_string()))
        }
    }

    fn random_key() -> p256::PublicKey {
        p256::SecretKey::random(&mut rand::rngs::OsRng).public_key()
    }

    #[test]
    fn test_pinned_key_matches() {
        let key = random_key();
        let mut pins = PinSet::new();
        pins.add_fingerprint(compute_digest(&key).unwrap());

        assert!(pins.check_key(&key).is_match());
        let fingerprint = pins.verify_key(&key).unwrap();
        assert_eq!(fingerprint.to_base64(), compute_fingerprint(&key).unwrap());
    }

    #[test]
    fn test_unpinned_key_is_rejected() {
        let pinned = random_key();
        let stranger = random_key();
        let pins: PinSet = [compute_digest(&pinned).unwrap()].into_iter().collect();

        assert_eq!(
            pins.check_key(&stranger),
            PinningResult::Mismatch(compute_digest(&stranger).unwrap())
        );
        match pins.verify_key(&stranger) {
            Err(Error::Verification { code, .. }) => assert_eq!(code, ErrorCode::KeyPinMismatch),
            other => panic!("expected pin mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let pins = PinSet::new();
        assert!(pins.is_empty());
        assert!(matches!(
            pins.check_key(&random_key()),
            PinningResult::Mismatch(_)
        ));
    }

    #[test]
    fn test_unpinnable_key_fails_closed() {
        let pins: PinSet = [compute_digest(&random_key()).unwrap()].into_iter().collect();

        assert!(matches!(
            pins.check_key(&LockedKey),
            PinningResult::Unpinnable(FingerprintError::KeyExportFailed(_))
        ));
        match pins.verify_key(&LockedKey) {
            Err(Error::Verification { code, .. }) => assert_eq!(code, ErrorCode::KeyExportFailed),
            other => panic!("expected export failure, got {:?}", other),
        }

        let secp256k1 = PublicKey::from_ec_point(
            EcCurve::Other("1.3.132.0.10".to_string()),
            &random_key().export_raw().unwrap(),
        );
        match pins.verify_key(&secp256k1) {
            Err(Error::Verification { code, .. }) => {
                assert_eq!(code, ErrorCode::UnsupportedKeyType)
            }
            other => panic!("expected unsupported key type, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_pins_collapse() {
        let fingerprint = compute_digest(&random_key()).unwrap();
        let mut pins = PinSet::new();
        pins.add_fingerprint(fingerprint);
        pins.add(PinnedFingerprint::with_label(fingerprint, "backup"));
        assert_eq!(pins.len(), 1);
        assert!(pins.pins()[0].label.is_none());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut pins = PinSet::new();
        pins.add(PinnedFingerprint::with_label(
            compute_digest(&random_key()).unwrap(),
            "primary",
        ));
        pins.add_fingerprint(compute_digest(&random_key()).unwrap());

        let json = pins.to_json().unwrap();
        let pins2 = PinSet::from_json(&json).unwrap();
        assert_eq!(pins, pins2);
    }

    #[test]
    fn test_from_json_rejects_malformed_pin() {
        let result = PinSet::from_json(r#"{"pins":[{"fingerprint":"c2hvcnQ="}]}"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_from_json_defaults_to_empty() {
        assert!(PinSet::from_json("{}").unwrap().is_empty());
    }

    #[test]
    fn test_from_file() {
        let key = random_key();
        let json = format!(
            r#"{{"pins":[{{"fingerprint":"{}","label":"api.example.com"}}]}}"#,
            compute_fingerprint(&key).unwrap()
        );
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let pins = PinSet::from_file(file.path()).unwrap();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins.pins()[0].label.as_deref(), Some("api.example.com"));
        assert!(pins.check_key(&key).is_match());
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = PinSet::from_file(dir.path().join("pins.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
