//! Document output for pydisplay.
//!
//! This crate commits rendered values to a document:
//!
//! - [`Document`] - the host document operations the writer relies on
//! - [`MemoryDocument`] - a recording document for tests and offline use
//! - [`Display`] - the render context and its `display()` operation
//! - [`DisplayError`] - target validation and propagated formatter errors
//!
//! # Example
//!
//! ```
//! use pydisplay_dom::{Display, DisplayOptions, MemoryDocument};
//!
//! let doc = MemoryDocument::new();
//! let out = doc.add_element(doc.body(), "div", "out");
//! let display = Display::new(&doc);
//!
//! display
//!     .display(&[&"a < b"], &DisplayOptions::new().target("#out"))
//!     .unwrap();
//!
//! assert_eq!(doc.inner_html(out), "<div>a &lt; b</div>");
//! assert_eq!(doc.text_content(out), "a < b");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
pub mod display;
pub mod document;
mod error;
pub mod memory;

pub use config::DisplayConfig;
pub use display::{Display, DisplayOptions, Target, TargetGuard};
pub use document::{Document, DomError, ElementOptions};
pub use error::{DisplayError, ErrorKind};
pub use memory::{Child, MemoryDocument, NodeId};
