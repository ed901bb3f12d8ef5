use std::fmt;

use serde::{Deserialize, Serialize};

/// Named elliptic curve of an EC public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcCurve {
    /// secp256r1 / prime256v1
    NistP256,
    /// secp384r1
    NistP384,
    /// secp521r1
    NistP521,
    /// Any other named curve, identified by its dotted OID.
    Other(String),
}

impl EcCurve {
    /// Field size of the curve in bits, if it is one of the NIST prime curves.
    pub fn bits(&self) -> Option<usize> {
        match self {
            EcCurve::NistP256 => Some(256),
            EcCurve::NistP384 => Some(384),
            EcCurve::NistP521 => Some(521),
            EcCurve::Other(_) => None,
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcCurve::NistP256 => write!(f, "P-256"),
            EcCurve::NistP384 => write!(f, "P-384"),
            EcCurve::NistP521 => write!(f, "P-521"),
            EcCurve::Other(oid) => write!(f, "curve {}", oid),
        }
    }
}

/// Algorithm family reported by a key handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAlgorithm {
    Rsa,
    Ec(EcCurve),
    /// An algorithm outside the RSA and EC families, identified by its dotted OID.
    Other(String),
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::Rsa => write!(f, "RSA"),
            KeyAlgorithm::Ec(curve) => write!(f, "EC {}", curve),
            KeyAlgorithm::Other(oid) => write!(f, "algorithm {}", oid),
        }
    }
}

/// Metadata a key handle reports alongside its exported bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAttributes {
    pub algorithm: KeyAlgorithm,
    /// Key size in bits. `None` when the handle does not know it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bits: Option<usize>,
}

impl KeyAttributes {
    pub fn rsa(bits: Option<usize>) -> Self {
        Self {
            algorithm: KeyAlgorithm::Rsa,
            bits,
        }
    }

    pub fn ec(curve: EcCurve) -> Self {
        let bits = curve.bits();
        Self {
            algorithm: KeyAlgorithm::Ec(curve),
            bits,
        }
    }
}

/// The key types the SPKI prefix table knows how to wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    #[serde(rename = "RSA-1024")]
    Rsa1024,
    #[serde(rename = "RSA-2048")]
    Rsa2048,
    #[serde(rename = "RSA-3072")]
    Rsa3072,
    #[serde(rename = "RSA-4096")]
    Rsa4096,
    #[serde(rename = "EC-P256")]
    EcP256,
    #[serde(rename = "EC-P384")]
    EcP384,
    #[serde(rename = "EC-P521")]
    EcP521,
}

impl KeyType {
    pub const ALL: [KeyType; 7] = [
        KeyType::Rsa1024,
        KeyType::Rsa2048,
        KeyType::Rsa3072,
        KeyType::Rsa4096,
        KeyType::EcP256,
        KeyType::EcP384,
        KeyType::EcP521,
    ];

    pub fn is_rsa(self) -> bool {
        matches!(
            self,
            KeyType::Rsa1024 | KeyType::Rsa2048 | KeyType::Rsa3072 | KeyType::Rsa4096
        )
    }

    /// Nominal key size in bits.
    pub fn bits(self) -> usize {
        match self {
            KeyType::Rsa1024 => 1024,
            KeyType::Rsa2048 => 2048,
            KeyType::Rsa3072 => 3072,
            KeyType::Rsa4096 => 4096,
            KeyType::EcP256 => 256,
            KeyType::EcP384 => 384,
            KeyType::EcP521 => 521,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeyType::Rsa1024 => "RSA-1024",
            KeyType::Rsa2048 => "RSA-2048",
            KeyType::Rsa3072 => "RSA-3072",
            KeyType::Rsa4096 => "RSA-4096",
            KeyType::EcP256 => "EC-P256",
            KeyType::EcP384 => "EC-P384",
            KeyType::EcP521 => "EC-P521",
        };
        write!(f, "{}", s)
    }
}
