use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Resource name of the KMS key that unwraps a [`WrappedKey`].
///
/// Immutable and caller-supplied, e.g.
/// `projects/{project}/locations/global/keyRings/{ring}/cryptoKeys/{key}`.
/// The reference identifies key material held by the key-management
/// service; it is not itself a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CryptoKeyReference(String);

impl CryptoKeyReference {
    /// Creates a key reference from a KMS resource name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the resource name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the resource name is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CryptoKeyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CryptoKeyReference {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A wrapped (KMS-encrypted) content-encryption key in its base64
/// transport encoding.
///
/// The key ciphertext is held as a [`SecretString`] so it cannot leak
/// through `Debug` output or logs. [`WrappedKey::decode`] produces the
/// raw ciphertext bytes the service expects; the decoded form is owned
/// transiently by the caller for the duration of one request and never
/// persisted.
#[derive(Clone)]
pub struct WrappedKey {
    encoded: SecretString,
}

// Custom Debug implementation to avoid exposing key ciphertext
impl fmt::Debug for WrappedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedKey")
            .field("encoded", &"[REDACTED]")
            .finish()
    }
}

impl WrappedKey {
    /// Creates a wrapped key from its base64 transport encoding.
    ///
    /// The encoding is not validated here; validation happens in
    /// [`WrappedKey::decode`], before any request is issued.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self {
            encoded: SecretString::new(encoded.into().into()),
        }
    }

    /// Decodes the transport encoding into raw ciphertext bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`base64::DecodeError`] when the stored value is not
    /// valid standard base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.encoded.expose_secret())
    }
}

impl From<&str> for WrappedKey {
    fn from(encoded: &str) -> Self {
        Self::new(encoded)
    }
}

/// The key material a deterministic transformation binds to: the KMS
/// key reference plus the wrapped key it unwraps.
///
/// Both halves are required external configuration. Neither is ever an
/// embedded constant in a production deployment.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    /// The KMS key that unwraps `wrapped_key`.
    pub key_reference: CryptoKeyReference,
    /// The wrapped AES-256 key, base64-encoded for transport.
    pub wrapped_key: WrappedKey,
}

impl KeyMaterial {
    /// Creates key material from a KMS resource name and a base64
    /// wrapped key.
    pub fn new(key_reference: impl Into<String>, wrapped_key: impl Into<String>) -> Self {
        Self {
            key_reference: CryptoKeyReference::new(key_reference),
            wrapped_key: WrappedKey::new(wrapped_key),
        }
    }
}


#[cfg(test)]
mod fuzz_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn fuzz_decode_never_panics(encoded in ".*") {
            // Arbitrary strings either decode or fail cleanly
            let _ = WrappedKey::new(encoded).decode();
        }

        #[test]
        fn fuzz_debug_never_reveals_content(encoded in "[A-Za-z0-9+/]{8,64}") {
            let key = WrappedKey::new(encoded.clone());
            let debug = format!("{key:?}");
            prop_assert!(!debug.contains(&encoded));
        }
    }
}
