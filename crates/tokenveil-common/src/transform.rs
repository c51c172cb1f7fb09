use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use typed_builder::TypedBuilder;
use uuid::Uuid;

use crate::key::KeyMaterial;

/// A named category of sensitive data the DLP service can detect.
///
/// Built-in detector names such as `PERSON_NAME` drive detection at
/// tokenize time. At detokenize time the same type names surrogate
/// markers instead of pattern detectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfoType(String);

impl InfoType {
    /// Creates an info type from a detector name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the detector name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InfoType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Info-type lists are short in practice (usually one entry), so keep
/// them inline.
pub type InfoTypes = SmallVec<[InfoType; 4]>;

/// A marker label attached to tokenized spans so they can later be
/// recognized and reversed.
///
/// Any string works as long as it does not occur naturally in the data
/// being protected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurrogateType(String);

impl SurrogateType {
    /// Creates a surrogate type from a marker name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the marker name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurrogateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SurrogateType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A request to tokenize sensitive spans in a string.
///
/// Detection runs over the *named built-in* info types; each detected
/// span is replaced by a deterministic, format-preserving token. Supply
/// a surrogate type when the tokens must be reversible later.
///
/// # Examples
///
/// ```
/// use tokenveil_common::{InfoType, KeyMaterial, SurrogateType, TokenizeRequest};
///
/// let request = TokenizeRequest::builder()
///     .project("acme".to_string())
///     .text("Ainsley Wilson".to_string())
///     .info_types([InfoType::new("PERSON_NAME")].into_iter().collect())
///     .surrogate_type(Some(SurrogateType::new("NAME_TOKEN")))
///     .key(KeyMaterial::new("projects/acme/cryptoKeys/k", "AAAA"))
///     .build();
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct TokenizeRequest {
    /// The cloud project id used as the parent resource.
    pub project: String,
    /// The text to protect.
    pub text: String,
    /// Which spans in the input are eligible for transformation.
    pub info_types: InfoTypes,
    /// Marker for tokenized spans. Required only when the tokens must be
    /// reversible.
    #[builder(default)]
    pub surrogate_type: Option<SurrogateType>,
    /// The KMS key reference and wrapped key binding the transformation.
    pub key: KeyMaterial,
}

impl TokenizeRequest {
    /// Checks the request invariants that must hold before any network
    /// call: a non-empty project and a non-empty info-type list.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated invariant.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.project.is_empty() {
            anyhow::bail!("project must not be empty");
        }
        if self.info_types.is_empty() {
            anyhow::bail!("info type list must not be empty");
        }
        Ok(())
    }
}

/// A request to reverse previously tokenized spans in a string.
///
/// Detection is driven by the surrogate marker itself rather than by
/// pattern matching: the info types here must designate the surrogate
/// used at tokenize time, or the service cannot reverse the mapping.
#[derive(Debug, Clone, TypedBuilder)]
pub struct DetokenizeRequest {
    /// The cloud project id used as the parent resource.
    pub project: String,
    /// The tokenized text to reverse.
    pub text: String,
    /// Custom info types recognizing previously marked surrogates.
    pub surrogate_info_types: InfoTypes,
    /// The marker the spans were tagged with at tokenize time.
    pub surrogate_type: SurrogateType,
    /// The same key material used at tokenize time.
    pub key: KeyMaterial,
}

impl DetokenizeRequest {
    /// Checks the request invariants that must hold before any network
    /// call: a non-empty project and a non-empty surrogate info-type
    /// list.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated invariant.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.project.is_empty() {
            anyhow::bail!("project must not be empty");
        }
        if self.surrogate_info_types.is_empty() {
            anyhow::bail!("surrogate info type list must not be empty");
        }
        Ok(())
    }
}

/// The outcome of one tokenize or detokenize exchange.
///
/// Created from the service response, returned to the caller, then
/// discarded; nothing is retained across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformResult {
    /// The transformed text extracted from the response item.
    pub text: String,
    /// Correlation id attached to this exchange's log lines.
    pub request_id: Uuid,
}

impl TransformResult {
    /// Wraps transformed text with the correlation id of the exchange
    /// that produced it.
    #[must_use]
    pub const fn new(text: String, request_id: Uuid) -> Self {
        Self { text, request_id }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn test_key() -> KeyMaterial {
        KeyMaterial::new("projects/p/locations/global/keyRings/r/cryptoKeys/k", "AAAA")
    }

    #[test]
    fn test_tokenize_request_valid() {
        let request = TokenizeRequest::builder()
            .project("acme".to_string())
            .text("Ainsley Wilson".to_string())
            .info_types([InfoType::new("PERSON_NAME")].into_iter().collect())
            .key(test_key())
            .build();

        assert!(request.validate().is_ok());
        assert!(request.surrogate_type.is_none());
    }

    #[test]
    fn test_tokenize_request_empty_info_types() {
        let request = TokenizeRequest::builder()
            .project("acme".to_string())
            .text("Ainsley Wilson".to_string())
            .info_types(InfoTypes::new())
            .key(test_key())
            .build();

        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("info type"));
    }

    #[test]
    fn test_tokenize_request_empty_project() {
        let request = TokenizeRequest::builder()
            .project(String::new())
            .text("Ainsley Wilson".to_string())
            .info_types([InfoType::new("PERSON_NAME")].into_iter().collect())
            .key(test_key())
            .build();

        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("project"));
    }

    #[test]
    fn test_detokenize_request_empty_surrogate_info_types() {
        let request = DetokenizeRequest::builder()
            .project("acme".to_string())
            .text("NAME_TOKEN(36):abc".to_string())
            .surrogate_info_types(InfoTypes::new())
            .surrogate_type(SurrogateType::new("NAME_TOKEN"))
            .key(test_key())
            .build();

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_info_type_display() {
        assert_eq!(InfoType::new("PERSON_NAME").to_string(), "PERSON_NAME");
    }
}
