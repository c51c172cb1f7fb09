use anyhow::Result;
use log::{debug, warn};
use uuid::Uuid;

use tokenveil_client::dlp::{
    ContentItem, CryptoDeterministicConfig, DeidentifyConfig, DeidentifyRequest, InfoTypeName,
    InfoTypeTransformations, InspectConfig, ReidentifyConfig, ReidentifyRequest,
};
use tokenveil_client::{DlpError, DlpService};
use tokenveil_common::{DetokenizeRequest, TokenizeRequest, TransformResult};

/// The tokenize/detokenize adapter over a DLP service.
///
/// Each method is one stateless request/response exchange. The two
/// directions build their detection configuration differently, and that
/// asymmetry is the contract: tokenize inspects with named built-in
/// detectors, detokenize inspects with surrogate-marker detectors.
/// Swapping them silently produces wrong-but-plausible output, so the
/// shapes are fixed here rather than left to callers.
pub struct Tokenizer<C: DlpService> {
    /// The service the exchanges go through.
    pub client: C,
}

impl<C: DlpService> Tokenizer<C> {
    /// Wraps a DLP service in the adapter.
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Tokenize the sensitive spans of `request.text`.
    ///
    /// Detected spans are replaced by deterministic format-preserving
    /// tokens. When the request carries a surrogate type, tokens are
    /// tagged with it so [`Tokenizer::detokenize`] can reverse them
    /// later.
    ///
    /// # Errors
    ///
    /// - [`DlpError::Validation`] for an empty project or info-type
    ///   list, before any network call
    /// - [`DlpError::KeyDecode`] when the wrapped key is not valid
    ///   base64, before any network call
    /// - service-class errors ([`DlpError::Network`],
    ///   [`DlpError::Timeout`], [`DlpError::Authentication`], ...)
    ///   propagated unmodified from the exchange
    pub async fn tokenize(&self, request: &TokenizeRequest) -> Result<TransformResult> {
        request
            .validate()
            .map_err(|e| DlpError::Validation(e.to_string()))?;
        let wrapped_key = request
            .key
            .wrapped_key
            .decode()
            .map_err(DlpError::KeyDecode)?;

        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] deidentify: project={}, info_types=[{}], surrogate={}, key={}",
            request.project,
            request
                .info_types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            request
                .surrogate_type
                .as_ref()
                .map_or("none", |surrogate| surrogate.as_str()),
            request.key.key_reference,
        );

        let wire = DeidentifyRequest::builder()
            .parent(format!("projects/{}", request.project))
            .inspect_config(InspectConfig::named(&request.info_types))
            .deidentify_config(DeidentifyConfig {
                info_type_transformations: InfoTypeTransformations::deterministic(
                    CryptoDeterministicConfig::new(
                        request.key.key_reference.as_str(),
                        wrapped_key,
                        request.surrogate_type.as_ref().map(InfoTypeName::from),
                    ),
                ),
            })
            .item(ContentItem {
                value: request.text.clone(),
            })
            .build();

        let response = self.client.deidentify(&wire).await?;
        let item = response.item.ok_or_else(|| {
            DlpError::InvalidResponse("deidentify response contained no item".to_string())
        })?;

        debug!("[{request_id}] deidentify done, {} bytes out", item.value.len());
        Ok(TransformResult::new(item.value, request_id))
    }

    /// Reverse previously tokenized spans of `request.text`.
    ///
    /// Detection here is driven by the surrogate marker, not pattern
    /// matching: the request's surrogate info types must designate the
    /// surrogate used at tokenize time.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Tokenizer::tokenize`], plus
    /// [`DlpError::SurrogateMismatch`] when the service returns the
    /// input unchanged, the detectable symptom of reversing with the
    /// wrong surrogate pairing. A mismatch can also yield changed but
    /// wrong output, which cannot be detected locally.
    pub async fn detokenize(&self, request: &DetokenizeRequest) -> Result<TransformResult> {
        request
            .validate()
            .map_err(|e| DlpError::Validation(e.to_string()))?;
        let wrapped_key = request
            .key
            .wrapped_key
            .decode()
            .map_err(DlpError::KeyDecode)?;

        let request_id = Uuid::new_v4();
        debug!(
            "[{request_id}] reidentify: project={}, surrogate_info_types=[{}], surrogate={}, key={}",
            request.project,
            request
                .surrogate_info_types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            request.surrogate_type,
            request.key.key_reference,
        );

        let wire = ReidentifyRequest::builder()
            .parent(format!("projects/{}", request.project))
            .inspect_config(InspectConfig::surrogates(&request.surrogate_info_types))
            .reidentify_config(ReidentifyConfig {
                info_type_transformations: InfoTypeTransformations::deterministic(
                    CryptoDeterministicConfig::new(
                        request.key.key_reference.as_str(),
                        wrapped_key,
                        Some(InfoTypeName::from(&request.surrogate_type)),
                    ),
                ),
            })
            .item(ContentItem {
                value: request.text.clone(),
            })
            .build();

        let response = self.client.reidentify(&wire).await?;
        let item = response.item.ok_or_else(|| {
            DlpError::InvalidResponse("reidentify response contained no item".to_string())
        })?;

        if item.value == request.text {
            warn!(
                "[{request_id}] reidentify returned input unchanged, surrogate {} reversed nothing",
                request.surrogate_type
            );
            return Err(DlpError::SurrogateMismatch {
                surrogate: request.surrogate_type.to_string(),
            }
            .into());
        }

        debug!("[{request_id}] reidentify done, {} bytes out", item.value.len());
        Ok(TransformResult::new(item.value, request_id))
    }
}
