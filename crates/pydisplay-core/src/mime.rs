//! MIME type identifiers used by the display protocol.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A MIME type a value can be represented as.
///
/// The named variants are the types the rich-repr protocol knows about.
/// Anything else a bundle declares is kept verbatim in [`MimeType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MimeType {
    /// `text/plain`
    TextPlain,
    /// `text/html`
    TextHtml,
    /// `text/markdown`
    TextMarkdown,
    /// `image/svg+xml`
    ImageSvg,
    /// `image/png`
    ImagePng,
    /// `application/pdf`
    ApplicationPdf,
    /// `image/jpeg`
    ImageJpeg,
    /// `text/latex`
    TextLatex,
    /// `application/json`
    ApplicationJson,
    /// `application/javascript`
    ApplicationJavascript,
    /// Any other MIME type string.
    Other(String),
}

impl MimeType {
    /// The canonical MIME type string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::TextPlain => "text/plain",
            Self::TextHtml => "text/html",
            Self::TextMarkdown => "text/markdown",
            Self::ImageSvg => "image/svg+xml",
            Self::ImagePng => "image/png",
            Self::ApplicationPdf => "application/pdf",
            Self::ImageJpeg => "image/jpeg",
            Self::TextLatex => "text/latex",
            Self::ApplicationJson => "application/json",
            Self::ApplicationJavascript => "application/javascript",
            Self::Other(s) => s,
        }
    }

    /// Whether this type carries binary image data.
    pub const fn is_image(&self) -> bool {
        matches!(self, Self::ImagePng | Self::ImageJpeg)
    }
}

impl From<&str> for MimeType {
    fn from(s: &str) -> Self {
        match s {
            "text/plain" => Self::TextPlain,
            "text/html" => Self::TextHtml,
            "text/markdown" => Self::TextMarkdown,
            "image/svg+xml" => Self::ImageSvg,
            "image/png" => Self::ImagePng,
            "application/pdf" => Self::ApplicationPdf,
            "image/jpeg" => Self::ImageJpeg,
            "text/latex" => Self::TextLatex,
            "application/json" => Self::ApplicationJson,
            "application/javascript" => Self::ApplicationJavascript,
            other => Self::Other(other.to_string()),
        }
    }
}

impl FromStr for MimeType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MimeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MimeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}
