use thiserror::Error;

/// Failure to fingerprint a key. Both variants are terminal for the key:
/// retrying with the same handle gives the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    #[error("Key export failed: {0}")]
    KeyExportFailed(String),

    #[error("Unsupported key type: {algorithm}{}", .bits.map(|b| format!(" ({} bits)", b)).unwrap_or_default())]
    UnsupportedKeyType {
        algorithm: String,
        bits: Option<usize>,
    },
}

impl FingerprintError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FingerprintError::KeyExportFailed(_) => ErrorCode::KeyExportFailed,
            FingerprintError::UnsupportedKeyType { .. } => ErrorCode::UnsupportedKeyType,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("SPKI error: {0}")]
    Spki(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fingerprint(#[from] FingerprintError),

    #[error("Verification failed: {code}: {message}")]
    Verification { code: ErrorCode, message: String },
}

impl From<p256::pkcs8::spki::Error> for Error {
    fn from(err: p256::pkcs8::spki::Error) -> Self {
        Error::Spki(err.to_string())
    }
}

impl From<p256::pkcs8::der::Error> for Error {
    fn from(err: p256::pkcs8::der::Error) -> Self {
        Error::Spki(err.to_string())
    }
}

/// Error codes for structured pinning results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    KeyExportFailed,
    UnsupportedKeyType,
    KeyPinMismatch,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::KeyExportFailed => "KEY_EXPORT_FAILED",
            ErrorCode::UnsupportedKeyType => "UNSUPPORTED_KEY_TYPE",
            ErrorCode::KeyPinMismatch => "KEY_PIN_MISMATCH",
        };
        write!(f, "{}", s)
    }
}
