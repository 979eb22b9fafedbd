//! pydisplay WASM bindings.
//!
//! This crate exposes `display()` to JavaScript. Values are inspected for
//! their rich representations where they cross the boundary, formatted by
//! `pydisplay-render` and written into the live page through `web-sys`.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { display, runWithTarget, formatMime } from '@pydisplay/wasm';
//!
//! await init();
//!
//! display(["a < b"], "#output");
//! display([{ _repr_html_: () => "<b>bold</b>" }], "output", false);
//!
//! runWithTarget("cell-1", () => {
//!     display(["written to #cell-1"]);
//! });
//!
//! console.log(formatMime(42).markup); // "42"
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod browser;
mod host;

use std::cell::OnceCell;
use std::rc::Rc;

use js_sys::{Array, Function};
use pydisplay_core::RichRepr;
use pydisplay_dom::{Display, DisplayError, DisplayOptions, ErrorKind, Target};
use serde::Serialize;
use tracing::debug;
use wasm_bindgen::prelude::*;

pub use browser::BrowserDocument;
pub use host::{js_type_name, target_from_js, JsValueRepr};

// =============================================================================
// TypeScript Type Definitions
// =============================================================================

#[wasm_bindgen(typescript_custom_section)]
const TS_TYPES: &'static str = r#"
/** Result of formatting a value without writing it. */
export interface FormatResult {
    markup: string;
    mimeType: string;
    unavailable: string[];
}
"#;

/// Initialize the WASM module.
///
/// This sets up panic hooks for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

// =============================================================================
// Internal Helpers
// =============================================================================

thread_local! {
    static CONTEXT: OnceCell<Rc<Display<BrowserDocument>>> = const { OnceCell::new() };
}

/// The page-wide render context, created on first use.
fn context() -> Result<Rc<Display<BrowserDocument>>, JsValue> {
    CONTEXT.with(|cell| {
        if let Some(context) = cell.get() {
            return Ok(Rc::clone(context));
        }
        let document =
            BrowserDocument::from_window().map_err(|e| to_js_error(&DisplayError::from(e)))?;
        let context = Rc::new(Display::new(document));
        debug!("created page display context");
        let _ = cell.set(Rc::clone(&context));
        Ok(context)
    })
}

/// Convert an error to the JS exception a script would see.
///
/// Type errors become a `TypeError`; everything else an `Error` whose
/// `name` is the error kind.
fn to_js_error(err: &DisplayError) -> JsValue {
    let message = err.to_string();
    match err.kind() {
        ErrorKind::TypeError => js_sys::TypeError::new(&message).into(),
        kind => {
            let error = js_sys::Error::new(&message);
            error.set_name(kind.name());
            error.into()
        }
    }
}

/// Convert a Rust value to a JS value.
///
/// Produces plain objects rather than ES2015 `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsError::new(&e.to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FormatResult {
    markup: String,
    mime_type: String,
    unavailable: Vec<String>,
}

// =============================================================================
// Public API
// =============================================================================

/// Display values in the page.
///
/// `target` is an element id (optionally prefixed with `#`), or
/// `undefined`/`null` for the target of the running script. Each value is
/// wrapped in its own `<div>` unless `append` is `false`, in which case the
/// target's content is replaced.
#[wasm_bindgen]
pub fn display(values: Array, target: JsValue, append: Option<bool>) -> Result<(), JsValue> {
    let context = context()?;
    let options = DisplayOptions {
        target: target_from_js(&target),
        append: append.unwrap_or(true),
    };

    let values: Vec<JsValueRepr> = values.iter().map(JsValueRepr::new).collect();
    let values: Vec<&dyn RichRepr> = values.iter().map(|v| v as &dyn RichRepr).collect();
    context
        .display(&values, &options)
        .map_err(|e| to_js_error(&e))
}

/// Format a value without writing it.
///
/// Returns a `FormatResult`.
#[wasm_bindgen(js_name = "formatMime")]
pub fn format_mime(value: JsValue) -> Result<JsValue, JsValue> {
    let output = pydisplay_render::format_mime(&JsValueRepr::new(value))
        .map_err(|e| to_js_error(&DisplayError::from(e)))?;
    let result = FormatResult {
        markup: output.markup,
        mime_type: output.mime_type.to_string(),
        unavailable: output
            .unavailable
            .iter()
            .map(ToString::to_string)
            .collect(),
    };
    to_js(&result).map_err(JsValue::from)
}

/// Run `callback` with element `target` as the implicit display target.
///
/// The previous target is restored when the callback returns or throws.
#[wasm_bindgen(js_name = "runWithTarget")]
pub fn run_with_target(target: &str, callback: &Function) -> Result<JsValue, JsValue> {
    let context = context()?;
    let element = context
        .resolve_target(&Target::from(target))
        .map_err(|e| to_js_error(&e))?;
    let _guard = context.enter(element);
    callback.call0(&JsValue::NULL)
}

/// Get version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// =============================================================================
// Tests
// =============================================================================
