//! Public key handles.
//!
//! The fingerprinter never looks inside a key beyond two questions: what kind of
//! key is this, and what are its raw exported bytes. [`PublicKeyHandle`] is that
//! seam. [`PublicKey`] is the crate's own handle, built from an SPKI document or
//! from raw key material; the trait is also implemented for `p256::PublicKey`
//! and `rsa::RsaPublicKey` so those can be fingerprinted in place.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::spki::{
    self,
    der::{asn1::UintRef, Decode, Encode, Tag},
    DecodePublicKey, ObjectIdentifier, SubjectPublicKeyInfoRef,
};
use rsa::pkcs1::{EncodeRsaPublicKey, RsaPublicKey as Pkcs1PublicKey};
use rsa::traits::PublicKeyParts;

use crate::error::{Error, FingerprintError};
use crate::types::key::{EcCurve, KeyAlgorithm, KeyAttributes};

const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const SECP521R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");

/// A borrowed view of an asymmetric public key.
///
/// Implementations report the key's algorithm and export its raw bytes in the
/// platform-native representation:
///
/// - RSA: the PKCS#1 `RSAPublicKey` DER (modulus and exponent)
/// - EC: the uncompressed SEC1 point `04 || X || Y`
pub trait PublicKeyHandle {
    fn attributes(&self) -> KeyAttributes;

    /// Export the raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::KeyExportFailed`] if the key cannot be
    /// exported in the representation above.
    fn export_raw(&self) -> Result<Vec<u8>, FingerprintError>;
}

impl<K: PublicKeyHandle + ?Sized> PublicKeyHandle for &K {
    fn attributes(&self) -> KeyAttributes {
        (**self).attributes()
    }

    fn export_raw(&self) -> Result<Vec<u8>, FingerprintError> {
        (**self).export_raw()
    }
}

/// Owned public key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    Rsa {
        /// PKCS#1 `RSAPublicKey` DER.
        pkcs1: Vec<u8>,
        /// Modulus size in bits.
        bits: usize,
    },
    Ec {
        curve: EcCurve,
        /// SEC1 encoded point, compressed or uncompressed.
        point: Vec<u8>,
    },
    /// A key whose algorithm is neither RSA nor EC. It can be exported but
    /// never fingerprinted.
    Other {
        /// Dotted algorithm OID.
        algorithm: String,
        key: Vec<u8>,
    },
}

impl PublicKey {
    /// Parse a PEM-encoded SubjectPublicKeyInfo (`-----BEGIN PUBLIC KEY-----`).
    pub fn from_public_key_pem(pem: &str) -> Result<Self, Error> {
        Ok(<Self as DecodePublicKey>::from_public_key_pem(pem)?)
    }

    /// Parse a DER-encoded SubjectPublicKeyInfo.
    pub fn from_public_key_der(der: &[u8]) -> Result<Self, Error> {
        Ok(<Self as DecodePublicKey>::from_public_key_der(der)?)
    }

    /// Build an RSA key from its big-endian modulus and public exponent.
    pub fn from_rsa_components(modulus: &[u8], exponent: &[u8]) -> Result<Self, Error> {
        let bits = bit_length(modulus);
        if bits == 0 || bit_length(exponent) == 0 {
            return Err(Error::InvalidKeyFormat(
                "RSA modulus and exponent must be non-zero".to_string(),
            ));
        }

        let pkcs1 = Pkcs1PublicKey {
            modulus: UintRef::new(modulus)?,
            public_exponent: UintRef::new(exponent)?,
        }
        .to_der()?;

        Ok(PublicKey::Rsa { pkcs1, bits })
    }

    /// Wrap a SEC1 encoded point on `curve`. The point is checked on export.
    pub fn from_ec_point(curve: EcCurve, point: &[u8]) -> Self {
        PublicKey::Ec {
            curve,
            point: point.to_vec(),
        }
    }
}

impl TryFrom<SubjectPublicKeyInfoRef<'_>> for PublicKey {
    type Error = spki::Error;

    fn try_from(spki: SubjectPublicKeyInfoRef<'_>) -> spki::Result<Self> {
        let key = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| Tag::BitString.value_error())?;
        let oid = spki.algorithm.oid;

        if oid == RSA_ENCRYPTION {
            let parsed = Pkcs1PublicKey::from_der(key)?;
            Ok(PublicKey::Rsa {
                pkcs1: key.to_vec(),
                bits: bit_length(parsed.modulus.as_bytes()),
            })
        } else if oid == EC_PUBLIC_KEY {
            let curve = match spki.algorithm.parameters_oid()? {
                c if c == SECP256R1 => EcCurve::NistP256,
                c if c == SECP384R1 => EcCurve::NistP384,
                c if c == SECP521R1 => EcCurve::NistP521,
                c => EcCurve::Other(c.to_string()),
            };
            Ok(PublicKey::Ec {
                curve,
                point: key.to_vec(),
            })
        } else {
            Ok(PublicKey::Other {
                algorithm: oid.to_string(),
                key: key.to_vec(),
            })
        }
    }
}

impl PublicKeyHandle for PublicKey {
    fn attributes(&self) -> KeyAttributes {
        match self {
            PublicKey::Rsa { bits, .. } => KeyAttributes::rsa(Some(*bits)),
            PublicKey::Ec { curve, .. } => KeyAttributes::ec(curve.clone()),
            PublicKey::Other { algorithm, .. } => KeyAttributes {
                algorithm: KeyAlgorithm::Other(algorithm.clone()),
                bits: None,
            },
        }
    }

    fn export_raw(&self) -> Result<Vec<u8>, FingerprintError> {
        match self {
            PublicKey::Rsa { pkcs1, .. } => Ok(pkcs1.clone()),
            PublicKey::Ec { curve, point } => uncompressed_point(curve, point),
            PublicKey::Other { key, .. } => Ok(key.clone()),
        }
    }
}

impl PublicKeyHandle for p256::PublicKey {
    fn attributes(&self) -> KeyAttributes {
        KeyAttributes::ec(EcCurve::NistP256)
    }

    fn export_raw(&self) -> Result<Vec<u8>, FingerprintError> {
        Ok(self.to_encoded_point(false).as_bytes().to_vec())
    }
}

impl PublicKeyHandle for rsa::RsaPublicKey {
    fn attributes(&self) -> KeyAttributes {
        KeyAttributes::rsa(Some(self.n().bits()))
    }

    fn export_raw(&self) -> Result<Vec<u8>, FingerprintError> {
        let der = self
            .to_pkcs1_der()
            .map_err(|e| FingerprintError::KeyExportFailed(e.to_string()))?;
        Ok(der.as_bytes().to_vec())
    }
}

/// Expand a SEC1 point to its uncompressed form.
///
/// P-256 points are decoded and checked to lie on the curve. Uncompressed
/// points on the other named curves must have the curve's exact length.
fn uncompressed_point(curve: &EcCurve, point: &[u8]) -> Result<Vec<u8>, FingerprintError> {
    if *curve == EcCurve::NistP256 {
        let key = p256::PublicKey::from_sec1_bytes(point).map_err(|_| {
            FingerprintError::KeyExportFailed("invalid P-256 point".to_string())
        })?;
        return Ok(key.to_encoded_point(false).as_bytes().to_vec());
    }

    match point.first() {
        Some(0x04) => match curve.bits() {
            Some(bits) if point.len() != 1 + 2 * ((bits + 7) / 8) => {
                Err(FingerprintError::KeyExportFailed(format!(
                    "uncompressed {} point must be {} bytes, got {}",
                    curve,
                    1 + 2 * ((bits + 7) / 8),
                    point.len()
                )))
            }
            _ => Ok(point.to_vec()),
        },
        Some(0x02) | Some(0x03) => Err(FingerprintError::KeyExportFailed(format!(
            "compressed {} points cannot be expanded",
            curve
        ))),
        Some(0x00) => Err(FingerprintError::KeyExportFailed(
            "the point at infinity is not a public key".to_string(),
        )),
        _ => Err(FingerprintError::KeyExportFailed(
            "unrecognized SEC1 point encoding".to_string(),
        )),
    }
}

/// Number of significant bits in a big-endian unsigned integer.
fn bit_length(bytes: &[u8]) -> usize {
    let significant = match bytes.iter().position(|b| *b != 0) {
        Some(start) => &bytes[start..],
        None => return 0,
    };
    significant.len() * 8 - significant[0].leading_zeros() as usize
}
