//! Format dicts and MIME bundles.
//!
//! A [`MimeBundle`] is what a value's `_repr_mimebundle_` capability returns:
//! a [`FormatDict`] of representations plus optional global metadata keyed
//! by MIME type. The JSON shape matches Jupyter's `display_data` output
//! (`{"data": {...}, "metadata": {...}}`).

use crate::{Metadata, MimeType};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Raw content of a single representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Content {
    /// Textual content (markup, JSON text, base64 image data, ...).
    Text(String),
    /// Binary content (raw image bytes).
    Bytes(Vec<u8>),
}

impl Content {
    /// Whether the content is the empty string or has no bytes.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
        }
    }

    /// View the content as text, decoding bytes as lossy UTF-8.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Content {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for Content {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

/// One representation: content plus optional per-format metadata.
///
/// This models both shapes a formatter may return: a bare value, or a
/// `(content, metadata)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatEntry {
    /// The representation itself.
    pub content: Content,
    /// Metadata specific to this representation, if the pair form was used.
    pub metadata: Option<Metadata>,
}

impl FormatEntry {
    /// A bare entry without metadata.
    pub fn new(content: impl Into<Content>) -> Self {
        Self {
            content: content.into(),
            metadata: None,
        }
    }

    /// A `(content, metadata)` entry.
    pub fn with_metadata(content: impl Into<Content>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata: Some(metadata),
        }
    }
}

/// Mapping from MIME type to representation.
pub type FormatDict = HashMap<MimeType, FormatEntry>;

/// Errors building a bundle from JSON.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The bundle was not a JSON object.
    #[error("mime bundle must be a JSON object")]
    NotAnObject,

    /// A `data` entry had an unsupported shape.
    #[error("unsupported content for {mime}: expected a string or a list of strings")]
    UnsupportedContent {
        /// The offending MIME type.
        mime: String,
    },
}

/// A value's full set of representations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeBundle {
    /// The representations, by MIME type.
    pub data: FormatDict,
    /// Global metadata, keyed by the MIME type it applies to.
    pub metadata: BTreeMap<MimeType, Metadata>,
}

impl MimeBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a representation.
    #[must_use]
    pub fn with_entry(mut self, mime: impl Into<MimeType>, entry: FormatEntry) -> Self {
        self.data.insert(mime.into(), entry);
        self
    }

    /// Builder-style insert of a bare text representation.
    #[must_use]
    pub fn with_text(self, mime: impl Into<MimeType>, text: impl Into<String>) -> Self {
        self.with_entry(mime, FormatEntry::new(text.into()))
    }

    /// Builder-style insert of global metadata for one MIME type.
    #[must_use]
    pub fn with_global_metadata(mut self, mime: impl Into<MimeType>, metadata: Metadata) -> Self {
        self.metadata.insert(mime.into(), metadata);
        self
    }

    /// Global metadata for a MIME type, empty when there is none.
    pub fn global_metadata(&self, mime: &MimeType) -> Metadata {
        self.metadata.get(mime).cloned().unwrap_or_default()
    }

    /// Whether the bundle has no representations.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Build a bundle from a Jupyter `display_data`-style JSON object.
    ///
    /// `data` values may be a string, a list of strings (joined, as in
    /// notebook files), or for JSON types any JSON value (serialized back
    /// to text). `metadata` entries that are not objects keyed by a MIME
    /// type are ignored.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, BundleError> {
        let object = value.as_object().ok_or(BundleError::NotAnObject)?;
        let mut bundle = Self::new();

        if let Some(data) = object.get("data").and_then(serde_json::Value::as_object) {
            for (mime, content) in data {
                let mime_type = MimeType::from(mime.as_str());
                let text = json_content_to_text(&mime_type, content).ok_or_else(|| {
                    BundleError::UnsupportedContent { mime: mime.clone() }
                })?;
                bundle.data.insert(mime_type, FormatEntry::new(text));
            }
        }

        if let Some(metadata) = object.get("metadata").and_then(serde_json::Value::as_object) {
            for (mime, meta) in metadata {
                if meta.is_object() {
                    if let Some(meta) = Metadata::from_json(meta) {
                        bundle.metadata.insert(MimeType::from(mime.as_str()), meta);
                    }
                }
            }
        }

        Ok(bundle)
    }
}

fn json_content_to_text(mime: &MimeType, content: &serde_json::Value) -> Option<String> {
    match content {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(lines) if lines.iter().all(serde_json::Value::is_string) => {
            Some(lines.iter().filter_map(serde_json::Value::as_str).collect())
        }
        other if *mime == MimeType::ApplicationJson || mime.as_str().ends_with("+json") => {
            Some(other.to_string())
        }
        _ => None,
    }
}

impl<'de> Deserialize<'de> for MimeBundle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_display_data() {
        let json = serde_json::json!({
            "data": {
                "text/plain": ["<Figure size 640x480", " with 1 Axes>"],
                "image/png": "iVBORw0KGgo=",
            },
            "metadata": {
                "image/png": {"width": 100},
                "needs_background": "light",
            }
        });

        let bundle = MimeBundle::from_json(&json).unwrap();

        assert_eq!(
            bundle.data[&MimeType::TextPlain].content,
            Content::Text("<Figure size 640x480 with 1 Axes>".to_string())
        );
        assert_eq!(
            bundle.global_metadata(&MimeType::ImagePng).get("width"),
            Some("100")
        );
        assert_eq!(bundle.metadata.len(), 1);
    }

    #[test]
    fn test_from_json_serializes_json_payload() {
        let json = serde_json::json!({
            "data": {"application/json": {"a": [1, 2]}}
        });
        let bundle = MimeBundle::from_json(&json).unwrap();
        assert_eq!(
            bundle.data[&MimeType::ApplicationJson].content,
            Content::Text(r#"{"a":[1,2]}"#.to_string())
        );
    }

    #[test]
    fn test_from_json_rejects_object_content_for_text_types() {
        let json = serde_json::json!({"data": {"text/html": {"oops": true}}});
        let err = MimeBundle::from_json(&json).unwrap_err();
        assert!(matches!(err, BundleError::UnsupportedContent { mime } if mime == "text/html"));
    }

    #[test]
    fn test_content_to_text_is_lossy_for_bytes() {
        assert_eq!(Content::from(b"abc".as_slice()).to_text(), "abc");
        assert!(Content::from("").is_empty());
    }
}
