//! The MIME renderer table.
//!
//! [`Renderable`] is the closed set of representations this crate knows how
//! to turn into markup. A MIME type without a variant here has no renderer.

use crate::image::render_image;
use pydisplay_core::{escape_html, Content, Metadata, MimeType};

/// A selected representation, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Renderable {
    /// A string value, shown as escaped text.
    PlainText(String),
    /// HTML markup, inserted verbatim.
    Html(String),
    /// SVG markup, inserted verbatim.
    Svg(String),
    /// PNG image data.
    Png(Content),
    /// JPEG image data.
    Jpeg(Content),
    /// JSON text, inserted verbatim.
    Json(String),
    /// Script source, wrapped in a `<script>` tag.
    Javascript(String),
    /// The value's default textual form, shown as escaped text.
    Fallback(String),
}

impl Renderable {
    /// Classify content for a MIME type.
    ///
    /// Returns `None` when the MIME type has no renderer.
    pub fn from_entry(mime: &MimeType, content: Content) -> Option<Self> {
        Some(match mime {
            MimeType::TextPlain => Self::PlainText(content.to_text()),
            MimeType::TextHtml => Self::Html(content.to_text()),
            MimeType::ImageSvg => Self::Svg(content.to_text()),
            MimeType::ImagePng => Self::Png(content),
            MimeType::ImageJpeg => Self::Jpeg(content),
            MimeType::ApplicationJson => Self::Json(content.to_text()),
            MimeType::ApplicationJavascript => Self::Javascript(content.to_text()),
            MimeType::TextMarkdown
            | MimeType::ApplicationPdf
            | MimeType::TextLatex
            | MimeType::Other(_) => return None,
        })
    }

    /// Whether a MIME type has a renderer.
    pub const fn is_renderable(mime: &MimeType) -> bool {
        matches!(
            mime,
            MimeType::TextPlain
                | MimeType::TextHtml
                | MimeType::ImageSvg
                | MimeType::ImagePng
                | MimeType::ImageJpeg
                | MimeType::ApplicationJson
                | MimeType::ApplicationJavascript
        )
    }

    /// The MIME type of the rendered output.
    pub const fn mime_type(&self) -> MimeType {
        match self {
            Self::PlainText(_) | Self::Fallback(_) => MimeType::TextPlain,
            Self::Html(_) => MimeType::TextHtml,
            Self::Svg(_) => MimeType::ImageSvg,
            Self::Png(_) => MimeType::ImagePng,
            Self::Jpeg(_) => MimeType::ImageJpeg,
            Self::Json(_) => MimeType::ApplicationJson,
            Self::Javascript(_) => MimeType::ApplicationJavascript,
        }
    }

    /// Produce markup. Metadata is only used by image representations.
    pub fn to_markup(&self, metadata: &Metadata) -> String {
        match self {
            Self::PlainText(text) | Self::Fallback(text) => escape_html(text),
            Self::Html(markup) | Self::Svg(markup) | Self::Json(markup) => markup.clone(),
            Self::Png(content) => render_image(&MimeType::ImagePng, content, metadata),
            Self::Jpeg(content) => render_image(&MimeType::ImageJpeg, content, metadata),
            Self::Javascript(source) => format!("<script>{source}</script>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let r = Renderable::PlainText("<b>&</b>".to_string());
        assert_eq!(r.to_markup(&Metadata::new()), "&lt;b&gt;&amp;&lt;/b&gt;");
        assert_eq!(r.mime_type(), MimeType::TextPlain);
    }

    #[test]
    fn test_markup_types_pass_through() {
        for mime in [MimeType::TextHtml, MimeType::ImageSvg, MimeType::ApplicationJson] {
            let r = Renderable::from_entry(&mime, Content::from("<svg/>")).unwrap();
            assert_eq!(r.to_markup(&Metadata::new()), "<svg/>");
            assert_eq!(r.mime_type(), mime);
        }
    }

    #[test]
    fn test_javascript_is_wrapped_unescaped() {
        let r = Renderable::Javascript("console.log('<hi>')".to_string());
        assert_eq!(
            r.to_markup(&Metadata::new()),
            "<script>console.log('<hi>')</script>"
        );
    }

    #[test]
    fn test_unrenderable_types_have_no_variant() {
        for mime in [
            MimeType::TextMarkdown,
            MimeType::TextLatex,
            MimeType::ApplicationPdf,
            MimeType::from("application/x-custom"),
        ] {
            assert!(Renderable::from_entry(&mime, Content::from("x")).is_none());
            assert!(!Renderable::is_renderable(&mime));
        }
    }
}
