//! MIME rendering for pydisplay.
//!
//! This crate turns an arbitrary [`RichRepr`] value into a single piece of
//! markup and the MIME type it represents. It has two stages:
//!
//! - [`resolve`] - pick the best representation the value offers
//! - [`Renderable::to_markup`] - turn that representation into markup
//!
//! [`format_mime`] runs both.
//!
//! # Example
//!
//! ```
//! use pydisplay_core::{Html, MimeType};
//! use pydisplay_render::format_mime;
//!
//! let out = format_mime("<b>not bold</b>").unwrap();
//! assert_eq!(out.markup, "&lt;b&gt;not bold&lt;/b&gt;");
//! assert_eq!(out.mime_type, MimeType::TextPlain);
//!
//! let out = format_mime(&Html::new("<b>bold</b>")).unwrap();
//! assert_eq!(out.markup, "<b>bold</b>");
//! assert_eq!(out.mime_type, MimeType::TextHtml);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod image;
mod renderable;
pub mod resolve;

pub use renderable::Renderable;
pub use resolve::{resolve, Resolved};

use pydisplay_core::{MimeType, ReprError, RichRepr};

/// Rendered markup and the MIME type it was produced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    /// Markup to insert into the document.
    pub markup: String,
    /// MIME type of the selected representation.
    pub mime_type: MimeType,
    /// MIME types offered without a renderer, when they forced the fallback.
    pub unavailable: Vec<MimeType>,
}

impl RenderedOutput {
    /// Whether the markup must be inserted by fragment parsing.
    ///
    /// HTML and scripts are parsed as a fragment so that embedded
    /// `<script>` elements run.
    pub fn needs_fragment(&self) -> bool {
        matches!(
            self.mime_type,
            MimeType::TextHtml | MimeType::ApplicationJavascript
        )
    }

    /// Whether the markup is degenerate (`""` or a single newline).
    pub fn is_degenerate(&self) -> bool {
        self.markup.is_empty() || self.markup == "\n"
    }
}

/// Render a resolved representation.
pub fn render(resolved: &Resolved) -> RenderedOutput {
    RenderedOutput {
        markup: resolved.renderable.to_markup(&resolved.metadata),
        mime_type: resolved.renderable.mime_type(),
        unavailable: resolved.unavailable.clone(),
    }
}

/// Resolve and render a value.
pub fn format_mime<V: RichRepr + ?Sized>(value: &V) -> Result<RenderedOutput, ReprError> {
    resolve(value).map(|resolved| render(&resolved))
}
