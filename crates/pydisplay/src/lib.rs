//! pydisplay CLI tools.
//!
//! - `pydisplay-render`: render a notebook or a `display_data` object to an
//!   HTML fragment, with the same output rules as `display()` in the browser
//!
//! # Example Usage
//!
//! ```bash
//! pydisplay-render analysis.ipynb -o outputs.html
//! pydisplay-render figure.json --target plot --replace
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod notebook;
