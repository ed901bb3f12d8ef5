//! Static DER headers that turn a raw exported key into a SubjectPublicKeyInfo.
//!
//! Each header is the SPKI `SEQUENCE` header, the complete `AlgorithmIdentifier`
//! and the `BIT STRING` header (including the zero unused-bits octet). The
//! length fields are fixed, so a header only fits raw keys of exactly
//! [`SpkiPrefix::key_len`] bytes. RSA entries assume the PKCS#1 encoding of a
//! full-width modulus with public exponent 65537.

use crate::error::FingerprintError;
use crate::types::key::{KeyAlgorithm, KeyAttributes, KeyType};

/// One row of the prefix table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpkiPrefix {
    pub key_type: KeyType,
    pub header: &'static [u8],
    /// Length in bytes of the raw key the header's length fields account for.
    pub key_len: usize,
}

const RSA_1024_HEADER: [u8; 22] = [
    0x30, 0x81, 0x9f, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01,
    0x01, 0x05, 0x00, 0x03, 0x81, 0x8d, 0x00,
];

const RSA_2048_HEADER: [u8; 24] = [
    0x30, 0x82, 0x01, 0x22, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01,
    0x01, 0x01, 0x05, 0x00, 0x03, 0x82, 0x01, 0x0f, 0x00,
];

const RSA_3072_HEADER: [u8; 24] = [
    0x30, 0x82, 0x01, 0xa2, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01,
    0x01, 0x01, 0x05, 0x00, 0x03, 0x82, 0x01, 0x8f, 0x00,
];

const RSA_4096_HEADER: [u8; 24] = [
    0x30, 0x82, 0x02, 0x22, 0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01,
    0x01, 0x01, 0x05, 0x00, 0x03, 0x82, 0x02, 0x0f, 0x00,
];

const EC_P256_HEADER: [u8; 26] = [
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x08,
    0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x03, 0x42, 0x00,
];

const EC_P384_HEADER: [u8; 23] = [
    0x30, 0x76, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06, 0x05,
    0x2b, 0x81, 0x04, 0x00, 0x22, 0x03, 0x62, 0x00,
];

const EC_P521_HEADER: [u8; 25] = [
    0x30, 0x81, 0x9b, 0x30, 0x10, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01, 0x06,
    0x05, 0x2b, 0x81, 0x04, 0x00, 0x23, 0x03, 0x81, 0x86, 0x00,
];

/// Every supported key type, in [`KeyType::ALL`] order.
pub static SPKI_PREFIXES: [SpkiPrefix; 7] = [
    SpkiPrefix {
        key_type: KeyType::Rsa1024,
        header: &RSA_1024_HEADER,
        key_len: 140,
    },
    SpkiPrefix {
        key_type: KeyType::Rsa2048,
        header: &RSA_2048_HEADER,
        key_len: 270,
    },
    SpkiPrefix {
        key_type: KeyType::Rsa3072,
        header: &RSA_3072_HEADER,
        key_len: 398,
    },
    SpkiPrefix {
        key_type: KeyType::Rsa4096,
        header: &RSA_4096_HEADER,
        key_len: 526,
    },
    SpkiPrefix {
        key_type: KeyType::EcP256,
        header: &EC_P256_HEADER,
        key_len: 65,
    },
    SpkiPrefix {
        key_type: KeyType::EcP384,
        header: &EC_P384_HEADER,
        key_len: 97,
    },
    SpkiPrefix {
        key_type: KeyType::EcP521,
        header: &EC_P521_HEADER,
        key_len: 133,
    },
];

/// Table entry for a key type.
pub fn lookup(key_type: KeyType) -> &'static SpkiPrefix {
    &SPKI_PREFIXES[key_type as usize]
}

/// Select the table entry for a key described by `attributes` whose exported
/// form is `raw_len` bytes long.
///
/// RSA keys without a reported size are matched on `raw_len` alone. EC keys are
/// always selected by curve; a point length never picks a curve.
pub fn resolve(
    attributes: &KeyAttributes,
    raw_len: usize,
) -> Result<&'static SpkiPrefix, FingerprintError> {
    let unsupported = || FingerprintError::UnsupportedKeyType {
        algorithm: attributes.algorithm.to_string(),
        bits: attributes.bits,
    };

    let entry = match (&attributes.algorithm, attributes.bits) {
        (KeyAlgorithm::Rsa, Some(bits)) => SPKI_PREFIXES
            .iter()
            .find(|p| p.key_type.is_rsa() && p.key_type.bits() == bits),
        (KeyAlgorithm::Rsa, None) => SPKI_PREFIXES
            .iter()
            .find(|p| p.key_type.is_rsa() && p.key_len == raw_len),
        (KeyAlgorithm::Ec(curve), bits) => match curve.bits() {
            Some(curve_bits) if bits.map_or(true, |b| b == curve_bits) => SPKI_PREFIXES
                .iter()
                .find(|p| !p.key_type.is_rsa() && p.key_type.bits() == curve_bits),
            _ => None,
        },
        (KeyAlgorithm::Other(_), _) => None,
    }
    .ok_or_else(unsupported)?;

    if entry.key_len != raw_len {
        tracing::debug!(
            key_type = %entry.key_type,
            expected = entry.key_len,
            actual = raw_len,
            "exported key length does not fit the SPKI prefix"
        );
        return Err(unsupported());
    }

    Ok(entry)
}
