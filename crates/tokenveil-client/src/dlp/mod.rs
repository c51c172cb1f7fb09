//! DLP content API types and client implementation.
//!
//! This module provides typed request/response structures mirroring the
//! DLP `content:deidentify` and `content:reidentify` REST surface, and a
//! client implementation that works with any endpoint exposing it.
//!
//! The one protocol asymmetry worth preserving exactly lives here: a
//! deidentify request inspects with *named built-in* info types, while a
//! reidentify request inspects with *custom* info types whose detector
//! is the surrogate marker itself. Swapping the two produces plausible
//! but wrong output rather than an error.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use tokenveil_common::transform::{InfoType, SurrogateType};

pub mod client;
pub use client::{DEFAULT_BASE_URL, DlpHttpClient};

/// Base64 encoding for bytes fields, the JSON convention for wire-level
/// byte strings.
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }
}

/// A named info type on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoTypeName {
    /// The detector or marker name.
    pub name: String,
}

impl From<&InfoType> for InfoTypeName {
    fn from(info_type: &InfoType) -> Self {
        Self {
            name: info_type.as_str().to_string(),
        }
    }
}

impl From<&SurrogateType> for InfoTypeName {
    fn from(surrogate: &SurrogateType) -> Self {
        Self {
            name: surrogate.as_str().to_string(),
        }
    }
}

/// Marker detector for a custom info type: matches spans previously
/// tagged as surrogates rather than any content pattern.
///
/// Serializes to the empty object the wire format expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurrogateMarker {}

/// A custom info type whose detector is "this span was previously
/// marked as a surrogate of this type".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomInfoType {
    /// The surrogate name the spans were tagged with.
    pub info_type: InfoTypeName,
    /// Surrogate-marker detection, not pattern matching.
    pub surrogate_type: SurrogateMarker,
}

/// Detection configuration: which spans in the input are eligible for
/// transformation.
///
/// Exactly one of the two lists is populated per direction. Use
/// [`InspectConfig::named`] for deidentify and
/// [`InspectConfig::surrogates`] for reidentify.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectConfig {
    /// Named built-in detectors (deidentify direction).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub info_types: Vec<InfoTypeName>,
    /// Surrogate-marker detectors (reidentify direction).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_info_types: Vec<CustomInfoType>,
}

impl InspectConfig {
    /// Detection over named built-in info types, for the tokenize
    /// direction.
    pub fn named<'a>(info_types: impl IntoIterator<Item = &'a InfoType>) -> Self {
        Self {
            info_types: info_types.into_iter().map(InfoTypeName::from).collect(),
            custom_info_types: Vec::new(),
        }
    }

    /// Detection over previously marked surrogates, for the detokenize
    /// direction.
    pub fn surrogates<'a>(surrogate_info_types: impl IntoIterator<Item = &'a InfoType>) -> Self {
        Self {
            info_types: Vec::new(),
            custom_info_types: surrogate_info_types
                .into_iter()
                .map(|info_type| CustomInfoType {
                    info_type: InfoTypeName::from(info_type),
                    surrogate_type: SurrogateMarker {},
                })
                .collect(),
        }
    }
}

/// A KMS-wrapped content-encryption key on the wire: the raw ciphertext
/// bytes plus the KMS key that unwraps them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KmsWrappedCryptoKey {
    /// Decoded wrapped-key ciphertext, re-encoded as base64 at the JSON
    /// boundary.
    #[serde(with = "base64_bytes")]
    pub wrapped_key: Vec<u8>,
    /// KMS key resource name.
    pub crypto_key_name: String,
}

/// The crypto key a transformation binds to.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoKey {
    /// KMS-wrapped key material.
    pub kms_wrapped: KmsWrappedCryptoKey,
}

/// Deterministic-encryption transformation configuration.
///
/// Binds the crypto key and, when reversal is wanted, the surrogate
/// type that tags transformed spans for later recognition.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct CryptoDeterministicConfig {
    /// Key material for the format-preserving transformation.
    pub crypto_key: CryptoKey,
    /// Marker for transformed spans (omitted when reversal is not
    /// needed).
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surrogate_info_type: Option<InfoTypeName>,
}

impl CryptoDeterministicConfig {
    /// Builds the transformation config from decoded key material and an
    /// optional surrogate tag.
    pub fn new(
        crypto_key_name: impl Into<String>,
        wrapped_key: Vec<u8>,
        surrogate_info_type: Option<InfoTypeName>,
    ) -> Self {
        Self {
            crypto_key: CryptoKey {
                kms_wrapped: KmsWrappedCryptoKey {
                    wrapped_key,
                    crypto_key_name: crypto_key_name.into(),
                },
            },
            surrogate_info_type,
        }
    }
}

/// A single primitive transformation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveTransformation {
    /// Deterministic format-preserving encryption.
    pub crypto_deterministic_config: CryptoDeterministicConfig,
}

/// One entry of an info-type transformation list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    /// The transformation applied to every detected span.
    pub primitive_transformation: PrimitiveTransformation,
}

/// Transformation list applied to detected info types.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoTypeTransformations {
    /// The transformations to apply.
    pub transformations: Vec<Transformation>,
}

impl InfoTypeTransformations {
    /// A single deterministic transformation applied to every detected
    /// span.
    #[must_use]
    pub fn deterministic(config: CryptoDeterministicConfig) -> Self {
        Self {
            transformations: vec![Transformation {
                primitive_transformation: PrimitiveTransformation {
                    crypto_deterministic_config: config,
                },
            }],
        }
    }
}

/// Transformation configuration for the deidentify direction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeidentifyConfig {
    /// Per-info-type transformation list.
    pub info_type_transformations: InfoTypeTransformations,
}

/// Transformation configuration for the reidentify direction.
///
/// Same shape as [`DeidentifyConfig`]; the service reverses the bound
/// transformation instead of applying it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReidentifyConfig {
    /// Per-info-type transformation list.
    pub info_type_transformations: InfoTypeTransformations,
}

/// A content item: the text being transformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// The text value.
    pub value: String,
}

/// Request to deidentify (tokenize) content.
///
/// The `parent` resource travels in the URL path, not the JSON body.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct DeidentifyRequest {
    /// Parent resource, `projects/{project}`.
    #[serde(skip_serializing)]
    pub parent: String,
    /// Which spans to transform.
    pub inspect_config: InspectConfig,
    /// How to transform them.
    pub deidentify_config: DeidentifyConfig,
    /// The input text.
    pub item: ContentItem,
}

/// Request to reidentify (detokenize) content.
///
/// The `parent` resource travels in the URL path, not the JSON body.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ReidentifyRequest {
    /// Parent resource, `projects/{project}`.
    #[serde(skip_serializing)]
    pub parent: String,
    /// Which surrogate spans to reverse.
    pub inspect_config: InspectConfig,
    /// The transformation to reverse.
    pub reidentify_config: ReidentifyConfig,
    /// The tokenized text.
    pub item: ContentItem,
}

/// Response from either content transformation call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    /// The transformed text.
    pub item: Option<ContentItem>,
    /// Transformation summary returned by the service; passed through
    /// for debug logging, not interpreted.
    #[serde(default)]
    pub overview: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn sample_config() -> CryptoDeterministicConfig {
        CryptoDeterministicConfig::new(
            "projects/acme/locations/global/keyRings/dlp/cryptoKeys/dlp-key",
            b"ciphertext".to_vec(),
            Some(InfoTypeName {
                name: "NAME_TOKEN".to_string(),
            }),
        )
    }

    #[test]
    fn test_deidentify_request_wire_shape() {
        let request = DeidentifyRequest::builder()
            .parent("projects/acme".to_string())
            .inspect_config(InspectConfig::named(&[InfoType::new("PERSON_NAME")]))
            .deidentify_config(DeidentifyConfig {
                info_type_transformations: InfoTypeTransformations::deterministic(sample_config()),
            })
            .item(ContentItem {
                value: "Ainsley Wilson".to_string(),
            })
            .build();

        let json: serde_json::Value = serde_json::to_value(&request).unwrap();

        // Parent is path-only
        assert!(json.get("parent").is_none());
        assert_eq!(json["inspectConfig"]["infoTypes"][0]["name"], "PERSON_NAME");
        assert!(json["inspectConfig"].get("customInfoTypes").is_none());
        assert_eq!(
            json["deidentifyConfig"]["infoTypeTransformations"]["transformations"][0]
                ["primitiveTransformation"]["cryptoDeterministicConfig"]["surrogateInfoType"]
                ["name"],
            "NAME_TOKEN"
        );
        assert_eq!(json["item"]["value"], "Ainsley Wilson");
    }

    #[test]
    fn test_wrapped_key_serializes_as_base64() {
        let json = serde_json::to_value(sample_config()).unwrap();
        assert_eq!(
            json["cryptoKey"]["kmsWrapped"]["wrappedKey"],
            "Y2lwaGVydGV4dA=="
        );
        assert_eq!(
            json["cryptoKey"]["kmsWrapped"]["cryptoKeyName"],
            "projects/acme/locations/global/keyRings/dlp/cryptoKeys/dlp-key"
        );
    }

    #[test]
    fn test_reidentify_inspects_with_surrogate_markers() {
        let inspect = InspectConfig::surrogates(&[InfoType::new("NAME_TOKEN")]);
        let json = serde_json::to_value(&inspect).unwrap();

        assert!(json.get("infoTypes").is_none());
        assert_eq!(json["customInfoTypes"][0]["infoType"]["name"], "NAME_TOKEN");
        // The detector is the surrogate marker itself: an empty object
        assert_eq!(
            json["customInfoTypes"][0]["surrogateType"],
            serde_json::json!({})
        );
    }

    #[test]
    fn test_surrogate_omitted_when_not_reversible() {
        let config = CryptoDeterministicConfig::new("projects/p/cryptoKeys/k", vec![0u8; 4], None);
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("surrogateInfoType").is_none());
    }

    #[test]
    fn test_content_response_parses_item() {
        let response: ContentResponse = serde_json::from_str(
            r#"{"item":{"value":"NAME_TOKEN(36):abc"},"overview":{"transformedBytes":"14"}}"#,
        )
        .unwrap();
        assert_eq!(response.item.unwrap().value, "NAME_TOKEN(36):abc");
        assert!(response.overview.is_some());
    }

    #[test]
    fn test_content_response_tolerates_missing_item() {
        let response: ContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.item.is_none());
    }
}
