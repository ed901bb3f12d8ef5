use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

/// A single trusted fingerprint in a pin set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinnedFingerprint {
    pub fingerprint: Fingerprint,
    /// Free-form note, e.g. the host or certificate the pin was taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PinnedFingerprint {
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            label: None,
        }
    }

    pub fn with_label(fingerprint: Fingerprint, label: &str) -> Self {
        Self {
            fingerprint,
            label: Some(label.to_string()),
        }
    }
}
