//! Known-answer tests. Expected values were produced with
//! `openssl pkey -pubin -outform der | openssl dgst -sha256 -binary | base64`.

use std::collections::HashSet;

use base64::{engine::general_purpose, Engine as _};
use rsa::pkcs8::DecodePublicKey;
use spkipin::{
    compute_fingerprint, spki_bytes, EcCurve, KeyAttributes, KeyType, PublicKey, PublicKeyHandle,
};

const RSA_1024: &str = include_str!("fixtures/rsa1024.pem");
const RSA_2048: &str = include_str!("fixtures/rsa2048.pem");
const RSA_3072: &str = include_str!("fixtures/rsa3072.pem");
const RSA_4096: &str = include_str!("fixtures/rsa4096.pem");
const EC_P256: &str = include_str!("fixtures/ec_p256.pem");
const EC_P384: &str = include_str!("fixtures/ec_p384.pem");
const EC_P521: &str = include_str!("fixtures/ec_p521.pem");

const VECTORS: [(KeyType, &str, &str); 7] = [
    (
        KeyType::Rsa1024,
        RSA_1024,
        "olA70G1hOHR2xYM2liAf5R5oXy6vsRmv6AcPsNBsT1w=",
    ),
    (
        KeyType::Rsa2048,
        RSA_2048,
        "2ok4GZLOfvdjjRP0n8Jv0Rl0iRJ7w+5nK1JUg/Xy89E=",
    ),
    (
        KeyType::Rsa3072,
        RSA_3072,
        "tsYxQeHmX2YVjtvYUuwF2P//6gNCXBSSokkAmGfyYl8=",
    ),
    (
        KeyType::Rsa4096,
        RSA_4096,
        "M0pvSuTYHP9daFT3vQ3N5Uu9PEnki99wjKA7425Qukg=",
    ),
    (
        KeyType::EcP256,
        EC_P256,
        "ILIpy3lvZ0pknjfi6yrDTAW9hEGwjk6FXlRmNe7Xd0E=",
    ),
    (
        KeyType::EcP384,
        EC_P384,
        "YzzswmVzNQNdLG++pNAP7DOhgFivlZsImPhghUZk6rc=",
    ),
    (
        KeyType::EcP521,
        EC_P521,
        "bIWtS8pjU7e74623FupSc4kwLTFfYKReJ7oUEIMg9OI=",
    ),
];

const RSA_2048_MODULUS: &str = "d2a0f6a3950ab69aee61c780be10bae7abf3c79898f27e7685341d7fe788e6f8aa7408145f30fbab878d7fa62ba35e475e36196ccee829a9bb7f1d0e1b0b5cdcc09edafedfbdcb2d45e3e7a0d587d70fed6581c7a075c55b3b2aeedcabb79b2bebf2918c9e3a326ca48efb043d3afa01977eacc0044b03d65d6a1b72bb4a67100fdf7c62366f312cbf2693b730fdbb7b2f4567737746e0aafb13ea4662f2c4c6418708ae2d352ceca2f43ad3773a9a93ae95595015cc61f5d003513fd2eecc0ec7e0126391e16d8bbfa2bbf137c5962f9a8944ff79bc23c7347d68f061f73e4da830ea59f67f3e64a308c054cb71a007edb563f8d539abf6437f74d8218d0ac3";

const EC_P384_POINT: &str = "0422ac8d0ea599abd85358d4036ee3ded35113b643395b8d6a00c7b23216a3b9d3f411d3a12fb6d7a3f840f3b2a64766ac39426003cf5b0bfacb81a0494f5292552af93c7b92c2605e033cf0f5de6fb03d15aa152a89cff3339a9e1e4c4f17cc6c";

fn pem_body(pem: &str) -> Vec<u8> {
    let body: String = pem
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    general_purpose::STANDARD.decode(body).unwrap()
}

#[test]
fn test_known_fingerprints() {
    for (key_type, pem, expected) in VECTORS {
        let key = PublicKey::from_public_key_pem(pem).unwrap();
        assert_eq!(key.attributes().bits, Some(key_type.bits()), "{}", key_type);
        assert_eq!(compute_fingerprint(&key).unwrap(), expected, "{}", key_type);
    }
}

#[test]
fn test_rebuilt_spki_matches_original_der() {
    for (key_type, pem, _) in VECTORS {
        let key = PublicKey::from_public_key_pem(pem).unwrap();
        assert_eq!(spki_bytes(&key).unwrap(), pem_body(pem), "{}", key_type);
    }
}

#[test]
fn test_der_input_matches_pem_input() {
    for (key_type, pem, expected) in VECTORS {
        let key = PublicKey::from_public_key_der(&pem_body(pem)).unwrap();
        assert_eq!(compute_fingerprint(&key).unwrap(), expected, "{}", key_type);
    }
}

#[test]
fn test_rsa_2048_from_components() {
    let modulus = hex::decode(RSA_2048_MODULUS).unwrap();
    let key = PublicKey::from_rsa_components(&modulus, &[0x01, 0x00, 0x01]).unwrap();
    assert_eq!(
        compute_fingerprint(&key).unwrap(),
        "2ok4GZLOfvdjjRP0n8Jv0Rl0iRJ7w+5nK1JUg/Xy89E="
    );
}

#[test]
fn test_rsa_size_inferred_from_export_length() {
    struct UnsizedRsa(PublicKey);

    impl PublicKeyHandle for UnsizedRsa {
        fn attributes(&self) -> KeyAttributes {
            KeyAttributes::rsa(None)
        }

        fn export_raw(&self) -> Result<Vec<u8>, spkipin::FingerprintError> {
            self.0.export_raw()
        }
    }

    let key = UnsizedRsa(PublicKey::from_public_key_pem(RSA_2048).unwrap());
    assert_eq!(
        compute_fingerprint(&key).unwrap(),
        "2ok4GZLOfvdjjRP0n8Jv0Rl0iRJ7w+5nK1JUg/Xy89E="
    );
}

#[test]
fn test_rsa_crate_key_handle() {
    let key = rsa::RsaPublicKey::from_public_key_pem(RSA_3072).unwrap();
    assert_eq!(
        compute_fingerprint(&key).unwrap(),
        "tsYxQeHmX2YVjtvYUuwF2P//6gNCXBSSokkAmGfyYl8="
    );
}

#[test]
fn test_p256_crate_key_handle() {
    let key = p256::PublicKey::from_public_key_pem(EC_P256).unwrap();
    assert_eq!(
        compute_fingerprint(&key).unwrap(),
        "ILIpy3lvZ0pknjfi6yrDTAW9hEGwjk6FXlRmNe7Xd0E="
    );
}

#[test]
fn test_ec_p384_from_point() {
    let point = hex::decode(EC_P384_POINT).unwrap();
    let key = PublicKey::from_ec_point(EcCurve::NistP384, &point);
    assert_eq!(
        compute_fingerprint(&key).unwrap(),
        "YzzswmVzNQNdLG++pNAP7DOhgFivlZsImPhghUZk6rc="
    );
}

#[test]
fn test_key_types_do_not_collide() {
    let fingerprints: HashSet<String> = VECTORS
        .iter()
        .map(|(_, pem, _)| {
            let key = PublicKey::from_public_key_pem(pem).unwrap();
            compute_fingerprint(&key).unwrap()
        })
        .collect();
    assert_eq!(fingerprints.len(), VECTORS.len());
}

#[test]
fn test_fingerprinting_is_thread_safe() {
    let handles: Vec<_> = VECTORS
        .iter()
        .map(|(_, pem, expected)| {
            let key = PublicKey::from_public_key_pem(pem).unwrap();
            let expected = expected.to_string();
            std::thread::spawn(move || {
                for _ in 0..16 {
                    assert_eq!(compute_fingerprint(&key).unwrap(), expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
