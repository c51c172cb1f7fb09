//! # tokenveil-client
//!
//! Typed client for cloud DLP deidentify/reidentify content APIs.
//!
//! This crate provides the service boundary for the tokenveil workspace
//! through the [`DlpService`] trait: two operations, `deidentify` and
//! `reidentify`, over strongly typed request/response structures that
//! mirror the wire format. The adapter layer depends on this narrow call
//! shape and nothing else of the remote service.
//!
//! ## Example
//!
//! ```no_run
//! use tokenveil_client::{DlpHttpClient, DlpService};
//! use tokenveil_client::dlp::{
//!     ContentItem, CryptoDeterministicConfig, DeidentifyConfig, DeidentifyRequest,
//!     InfoTypeTransformations, InspectConfig,
//! };
//! use tokenveil_common::{Config, InfoType};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::new().with_auth_token("ya29.token");
//! let client = DlpHttpClient::new(config)?;
//!
//! let request = DeidentifyRequest::builder()
//!     .parent("projects/acme".to_string())
//!     .inspect_config(InspectConfig::named(&[InfoType::new("PERSON_NAME")]))
//!     .deidentify_config(DeidentifyConfig {
//!         info_type_transformations: InfoTypeTransformations::deterministic(
//!             CryptoDeterministicConfig::new(
//!                 "projects/acme/locations/global/keyRings/dlp/cryptoKeys/dlp-key",
//!                 vec![0u8; 32],
//!                 None,
//!             ),
//!         ),
//!     })
//!     .item(ContentItem {
//!         value: "Ainsley Wilson".to_string(),
//!     })
//!     .build();
//!
//! let response = client.deidentify(&request).await?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use async_trait::async_trait;

pub mod dlp;
pub mod error;

pub use dlp::{ContentResponse, DEFAULT_BASE_URL, DeidentifyRequest, DlpHttpClient, ReidentifyRequest};
pub use error::DlpError;

/// Trait for DLP service implementations.
///
/// Exposes exactly the two content transformation calls the adapter
/// consumes. Implementations must be safe for concurrent use (`Send +
/// Sync`); every call is an independent request/response exchange with
/// no shared mutable state.
#[must_use = "DlpService must be used to make requests"]
#[async_trait]
pub trait DlpService: Send + Sync {
    /// Deidentify (tokenize) the content item in the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the network exchange fails or the service
    /// rejects the request (authentication, quota, malformed request).
    /// Remote errors propagate to the caller unmodified.
    async fn deidentify(&self, request: &DeidentifyRequest) -> Result<ContentResponse>;

    /// Reidentify (detokenize) the content item in the request.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`DlpService::deidentify`].
    async fn reidentify(&self, request: &ReidentifyRequest) -> Result<ContentResponse>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokenveil_common::transform::InfoType;

    use super::*;
    use crate::dlp::{
        ContentItem, CryptoDeterministicConfig, DeidentifyConfig, InfoTypeTransformations,
        InspectConfig, ReidentifyConfig,
    };

    // Mock implementation for testing
    struct MockDlpService {
        deidentify_calls: AtomicUsize,
        reidentify_calls: AtomicUsize,
    }

    impl MockDlpService {
        fn new() -> Self {
            Self {
                deidentify_calls: AtomicUsize::new(0),
                reidentify_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DlpService for MockDlpService {
        async fn deidentify(&self, request: &DeidentifyRequest) -> Result<ContentResponse> {
            self.deidentify_calls.fetch_add(1, Ordering::SeqCst);
            Ok(ContentResponse {
                item: Some(ContentItem {
                    value: format!("TOKENIZED:{}", request.item.value),
                }),
                overview: None,
            })
        }

        async fn reidentify(&self, request: &ReidentifyRequest) -> Result<ContentResponse> {
            self.reidentify_calls.fetch_add(1, Ordering::SeqCst);
            let value = request
                .item
                .value
                .strip_prefix("TOKENIZED:")
                .unwrap_or(&request.item.value)
                .to_string();
            Ok(ContentResponse {
                item: Some(ContentItem { value }),
                overview: None,
            })
        }
    }

    fn crypto_config() -> CryptoDeterministicConfig {
        CryptoDeterministicConfig::new("projects/p/cryptoKeys/k", vec![1, 2, 3], None)
    }

    #[tokio::test]
    async fn test_deidentify_through_trait_object() {
        let service: Box<dyn DlpService> = Box::new(MockDlpService::new());

        let request = DeidentifyRequest::builder()
            .parent("projects/p".to_string())
            .inspect_config(InspectConfig::named(&[InfoType::new("PERSON_NAME")]))
            .deidentify_config(DeidentifyConfig {
                info_type_transformations: InfoTypeTransformations::deterministic(crypto_config()),
            })
            .item(ContentItem {
                value: "Mia Robbins".to_string(),
            })
            .build();

        let response = service.deidentify(&request).await.unwrap();
        assert_eq!(response.item.unwrap().value, "TOKENIZED:Mia Robbins");
    }

    #[tokio::test]
    async fn test_each_call_is_independent() {
        let service = MockDlpService::new();

        let request = ReidentifyRequest::builder()
            .parent("projects/p".to_string())
            .inspect_config(InspectConfig::surrogates(&[InfoType::new("NAME_TOKEN")]))
            .reidentify_config(ReidentifyConfig {
                info_type_transformations: InfoTypeTransformations::deterministic(crypto_config()),
            })
            .item(ContentItem {
                value: "TOKENIZED:Colby Morin".to_string(),
            })
            .build();

        let first = service.reidentify(&request).await.unwrap();
        let second = service.reidentify(&request).await.unwrap();

        assert_eq!(first.item, second.item);
        assert_eq!(service.reidentify_calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.deidentify_calls.load(Ordering::SeqCst), 0);
    }
}
