//! # spkipin
//!
//! SPKI fingerprints for certificate and public-key pinning.
//!
//! Given a public key, spkipin rebuilds its X.509 SubjectPublicKeyInfo from a
//! static table of DER headers, hashes it with SHA-256 and encodes the digest as
//! padded standard base64. That string is what pinning configurations (HPKP
//! `pin-sha256`, mobile pinning plists, `curl --pinnedpubkey`) compare against.
//!
//! ## Supported keys
//!
//! RSA-1024, RSA-2048, RSA-3072 and RSA-4096 with public exponent 65537, and EC
//! keys on P-256, P-384 and P-521. Anything else is reported as
//! [`FingerprintError::UnsupportedKeyType`].
//!
//! ## Quick Start
//!
//! ```rust
//! use spkipin::{compute_fingerprint, PinSet, PublicKey};
//!
//! let pem = "-----BEGIN PUBLIC KEY-----
//! MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE0OARk7T+2onkeuqwu/OgaPfHD7uB
//! ygQQli31dfo8mLTEIyPXzJZ3y2VCU0fiPMhmHowsHZtYYACgmcwxv5ZnBQ==
//! -----END PUBLIC KEY-----";
//!
//! let key = PublicKey::from_public_key_pem(pem).unwrap();
//! let fingerprint = compute_fingerprint(&key).unwrap();
//! assert_eq!(fingerprint, "ILIpy3lvZ0pknjfi6yrDTAW9hEGwjk6FXlRmNe7Xd0E=");
//!
//! let pins = PinSet::from_json(r#"{"pins":[{"fingerprint":"ILIpy3lvZ0pknjfi6yrDTAW9hEGwjk6FXlRmNe7Xd0E="}]}"#).unwrap();
//! assert!(pins.verify_key(&key).is_ok());
//! ```
//!
//! ## Key handles
//!
//! The fingerprinter only needs a key's attributes and its raw exported bytes,
//! through the [`PublicKeyHandle`] trait. Implement it for a platform key type
//! to fingerprint keys that never leave a keystore as SPKI documents.
//!
//! ## Error Handling
//!
//! Fingerprinting returns [`FingerprintError`]; everything else (parsing keys,
//! loading pins, fail-closed verification) returns [`Error`].

pub mod error;
pub mod fingerprint;
pub mod key;
pub mod pinning;
pub mod prefix;
pub mod types;

pub use error::{Error, ErrorCode, FingerprintError};
pub use fingerprint::{compute_digest, compute_fingerprint, spki_bytes, Fingerprint};
pub use key::{PublicKey, PublicKeyHandle};
pub use pinning::{PinSet, PinningResult};
pub use types::key::{EcCurve, KeyAlgorithm, KeyAttributes, KeyType};
pub use types::pinning::PinnedFingerprint;
