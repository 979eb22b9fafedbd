//! The rich-repr capability protocol.
//!
//! A displayable value advertises how it can be shown through the
//! [`RichRepr`] trait. Each [`Capability`] corresponds to one of the
//! protocol's formatter methods (`_repr_html_`, `_repr_png_`, ...); host
//! boundaries implement the trait once, so the resolver never has to look
//! up methods itself.

use crate::{FormatEntry, MimeBundle, MimeType};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// A single formatter capability a value may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `__repr__`
    Repr,
    /// `_repr_html_`
    Html,
    /// `_repr_markdown_`
    Markdown,
    /// `_repr_svg_`
    Svg,
    /// `_repr_png_`
    Png,
    /// `_repr_pdf_`
    Pdf,
    /// `_repr_jpeg_`
    Jpeg,
    /// `_repr_latex_`
    Latex,
    /// `_repr_json_`
    Json,
    /// `_repr_javascript_`
    Javascript,
    /// Matplotlib-style `savefig(buffer, format="png")`.
    Savefig,
}

impl Capability {
    /// All capabilities, lowest priority first.
    pub const ASCENDING: [Self; 11] = [
        Self::Repr,
        Self::Html,
        Self::Markdown,
        Self::Svg,
        Self::Png,
        Self::Pdf,
        Self::Jpeg,
        Self::Latex,
        Self::Json,
        Self::Javascript,
        Self::Savefig,
    ];

    /// The formatter method name in the protocol.
    pub const fn method_name(self) -> &'static str {
        match self {
            Self::Repr => "__repr__",
            Self::Html => "_repr_html_",
            Self::Markdown => "_repr_markdown_",
            Self::Svg => "_repr_svg_",
            Self::Png => "_repr_png_",
            Self::Pdf => "_repr_pdf_",
            Self::Jpeg => "_repr_jpeg_",
            Self::Latex => "_repr_latex_",
            Self::Json => "_repr_json_",
            Self::Javascript => "_repr_javascript_",
            Self::Savefig => "savefig",
        }
    }

    /// The MIME type this capability produces.
    pub const fn mime_type(self) -> MimeType {
        match self {
            Self::Repr => MimeType::TextPlain,
            Self::Html => MimeType::TextHtml,
            Self::Markdown => MimeType::TextMarkdown,
            Self::Svg => MimeType::ImageSvg,
            Self::Png | Self::Savefig => MimeType::ImagePng,
            Self::Pdf => MimeType::ApplicationPdf,
            Self::Jpeg => MimeType::ImageJpeg,
            Self::Latex => MimeType::TextLatex,
            Self::Json => MimeType::ApplicationJson,
            Self::Javascript => MimeType::ApplicationJavascript,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Error raised by a value's own formatter method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method} failed: {message}")]
pub struct ReprError {
    /// The formatter method that failed.
    pub method: String,
    /// The failure message reported by the value.
    pub message: String,
}

impl ReprError {
    /// Create a formatter error.
    pub fn new(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            message: message.into(),
        }
    }
}

/// A value that can be displayed.
///
/// Every method has a "not offered" default except [`RichRepr::default_text`],
/// the built-in stringification used when nothing else resolves.
pub trait RichRepr {
    /// The value itself, if it is a plain string.
    ///
    /// Strings are escaped and shown as text without probing any other
    /// capability.
    fn plain_str(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// The `_repr_mimebundle_` capability.
    fn repr_mimebundle(&self) -> Result<Option<MimeBundle>, ReprError> {
        Ok(None)
    }

    /// Evaluate a single capability. `Ok(None)` means it is not offered.
    fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
        let _ = capability;
        Ok(None)
    }

    /// Default textual form of the value.
    fn default_text(&self) -> String;
}

impl<T: RichRepr + ?Sized> RichRepr for &T {
    fn plain_str(&self) -> Option<Cow<'_, str>> {
        (**self).plain_str()
    }

    fn repr_mimebundle(&self) -> Result<Option<MimeBundle>, ReprError> {
        (**self).repr_mimebundle()
    }

    fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
        (**self).represent(capability)
    }

    fn default_text(&self) -> String {
        (**self).default_text()
    }
}

impl RichRepr for str {
    fn plain_str(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }

    fn default_text(&self) -> String {
        self.to_string()
    }
}

impl RichRepr for String {
    fn plain_str(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }

    fn default_text(&self) -> String {
        self.clone()
    }
}

impl RichRepr for MimeBundle {
    fn repr_mimebundle(&self) -> Result<Option<MimeBundle>, ReprError> {
        Ok(Some(self.clone()))
    }

    fn default_text(&self) -> String {
        "<MimeBundle>".to_string()
    }
}

/// Markup to be shown as HTML rather than escaped text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Html(pub String);

impl Html {
    /// Wrap a markup string.
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }
}

impl RichRepr for Html {
    fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
        Ok(match capability {
            Capability::Html => Some(FormatEntry::new(self.0.clone())),
            _ => None,
        })
    }

    fn default_text(&self) -> String {
        format!("Html({:?})", self.0)
    }
}

/// Adapter displaying any [`fmt::Debug`] value through its debug form.
#[derive(Debug, Clone)]
pub struct Repr<T>(pub T);

impl<T: fmt::Debug> RichRepr for Repr<T> {
    fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
        Ok(match capability {
            Capability::Repr => Some(FormatEntry::new(format!("{:?}", self.0))),
            _ => None,
        })
    }

    fn default_text(&self) -> String {
        format!("{:?}", self.0)
    }
}

/// Adapter displaying any [`fmt::Display`] value through its display form.
#[derive(Debug, Clone)]
pub struct Displayed<T>(pub T);

impl<T: fmt::Display> RichRepr for Displayed<T> {
    fn default_text(&self) -> String {
        self.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_order_ends_with_savefig() {
        assert_eq!(Capability::ASCENDING[0], Capability::Repr);
        assert_eq!(Capability::ASCENDING[10], Capability::Savefig);
        assert_eq!(Capability::Savefig.mime_type(), MimeType::ImagePng);
    }

    #[test]
    fn test_strings_short_circuit() {
        assert_eq!("hi".plain_str().as_deref(), Some("hi"));
        assert!(Html::new("<b>").plain_str().is_none());
    }

    #[test]
    fn test_html_offers_only_html() {
        let html = Html::new("<b>bold</b>");
        assert_eq!(
            html.represent(Capability::Html).unwrap(),
            Some(FormatEntry::new("<b>bold</b>"))
        );
        assert_eq!(html.represent(Capability::Repr).unwrap(), None);
    }

    #[test]
    fn test_repr_error_message() {
        let err = ReprError::new("_repr_html_", "boom");
        assert_eq!(err.to_string(), "_repr_html_ failed: boom");
    }
}
