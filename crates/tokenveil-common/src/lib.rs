//! # tokenveil-common
//!
//! Common types and data structures for deterministic DLP tokenization.
//!
//! This crate provides the foundational types shared by the tokenveil
//! workspace:
//! - Client configuration with secure credential storage
//! - KMS key material (crypto key reference + wrapped key)
//! - Typed tokenize/detokenize request and result shapes
//!
//! ## Example
//!
//! ```
//! use tokenveil_common::{InfoType, KeyMaterial, SurrogateType, TokenizeRequest};
//!
//! let key = KeyMaterial::new(
//!     "projects/acme/locations/global/keyRings/dlp/cryptoKeys/dlp-key",
//!     "Y2lwaGVydGV4dA==",
//! );
//!
//! let request = TokenizeRequest::builder()
//!     .project("acme".to_string())
//!     .text("Ainsley Wilson".to_string())
//!     .info_types([InfoType::new("PERSON_NAME")].into_iter().collect())
//!     .surrogate_type(Some(SurrogateType::new("NAME_TOKEN")))
//!     .key(key)
//!     .build();
//!
//! assert!(request.validate().is_ok());
//! ```

/// Client configuration and retry policy types.
///
/// Contains types for configuring DLP clients, including timeouts and
/// opt-in retry behavior.
pub mod config;
/// KMS key material types.
///
/// Provides the crypto key reference and the base64-wrapped data key it
/// unwraps, with transport decoding.
pub mod key;
/// Tokenize/detokenize request and result types.
///
/// Typed request shapes for both transform directions, validated before
/// they ever reach a client.
pub mod transform;

pub use config::{Config, RetryConfig};
pub use key::{CryptoKeyReference, KeyMaterial, WrappedKey};
pub use transform::{
    DetokenizeRequest, InfoType, InfoTypes, SurrogateType, TokenizeRequest, TransformResult,
};
