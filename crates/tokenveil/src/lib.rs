//! # tokenveil
//!
//! Deterministic tokenization of sensitive strings through a cloud DLP
//! service.
//!
//! The service performs format-preserving, deterministic encryption of
//! the spans it detects; this crate assembles the two request shapes
//! (tokenize and detokenize), validates them before anything touches the
//! network, and unwraps the response. All cryptography, key unwrapping,
//! and detection happens remotely.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tokenveil::{Config, DlpHttpClient, InfoType, KeyMaterial, SurrogateType};
//! use tokenveil::{TokenizeRequest, Tokenizer};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DlpHttpClient::new(Config::new().with_auth_token("ya29.token"))?;
//! let tokenizer = Tokenizer::new(client);
//!
//! let request = TokenizeRequest::builder()
//!     .project("acme".to_string())
//!     .text("Ainsley Wilson".to_string())
//!     .info_types([InfoType::new("PERSON_NAME")].into_iter().collect())
//!     .surrogate_type(Some(SurrogateType::new("NAME_TOKEN")))
//!     .key(KeyMaterial::new(
//!         "projects/acme/locations/global/keyRings/dlp/cryptoKeys/dlp-key",
//!         std::env::var("WRAPPED_KEY")?,
//!     ))
//!     .build();
//!
//! let result = tokenizer.tokenize(&request).await?;
//! println!("{}", result.text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - **Deterministic**: the same input with the same key material always
//!   produces the same token, and detokenizing that token recovers the
//!   input exactly
//! - **Stateless**: nothing is retained across calls; concurrent use
//!   needs no locking
//! - **Fail-fast**: validation and wrapped-key decoding errors are
//!   raised before any network call

pub mod tokenizer;

pub use tokenveil_client::*;
pub use tokenveil_common::*;

pub use tokenizer::Tokenizer;
