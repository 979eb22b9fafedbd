//! Core types for pydisplay
//!
//! This crate provides the data model shared by the display pipeline:
//!
//! - [`MimeType`] - The MIME types a value can be represented as
//! - [`Metadata`] - Attribute metadata, with per-format over global merging
//! - [`FormatEntry`] / [`FormatDict`] - Representations keyed by MIME type
//! - [`MimeBundle`] - A value's full set of representations
//! - [`RichRepr`] / [`Capability`] - The capability protocol values implement
//! - [`escape_html`] - Text escaping for HTML output
//!
//! # Example
//!
//! ```
//! use pydisplay_core::{Capability, FormatEntry, Html, MimeType, RichRepr};
//!
//! let value = Html::new("<b>hello</b>");
//! let entry = value.represent(Capability::Html).unwrap();
//!
//! assert_eq!(entry, Some(FormatEntry::new("<b>hello</b>")));
//! assert_eq!(Capability::Html.mime_type(), MimeType::TextHtml);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bundle;
pub mod escape;
pub mod metadata;
pub mod mime;
pub mod repr;

pub use bundle::{BundleError, Content, FormatDict, FormatEntry, MimeBundle};
pub use escape::{escape_html, unescape_html};
pub use metadata::Metadata;
pub use mime::MimeType;
pub use repr::{Capability, Displayed, Html, Repr, ReprError, RichRepr};
