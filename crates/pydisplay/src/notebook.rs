//! Reading Jupyter output data.
//!
//! Accepts a whole notebook (`cells[].outputs[]`), a bare list of outputs,
//! or a single `display_data`-style object.

use std::borrow::Cow;

use pydisplay_core::{BundleError, Capability, FormatEntry, MimeBundle, ReprError, RichRepr};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors reading notebook output.
#[derive(Debug, Error)]
pub enum NotebookError {
    /// The input was not JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An output's MIME bundle was malformed.
    #[error("output {index}: {source}")]
    Bundle {
        /// Position of the output in the input.
        index: usize,
        /// The underlying error.
        #[source]
        source: BundleError,
    },

    /// The top-level value has none of the recognised shapes.
    #[error("expected a notebook, a list of outputs or a display_data object")]
    UnknownShape,
}

/// One output to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputValue {
    /// `display_data` / `execute_result` data.
    Bundle(MimeBundle),
    /// `stream` text or an `error` summary, shown escaped.
    Text(String),
}

impl RichRepr for OutputValue {
    fn plain_str(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(text) => Some(Cow::Borrowed(text)),
            Self::Bundle(_) => None,
        }
    }

    fn repr_mimebundle(&self) -> Result<Option<MimeBundle>, ReprError> {
        match self {
            Self::Bundle(bundle) => bundle.repr_mimebundle(),
            Self::Text(_) => Ok(None),
        }
    }

    fn represent(&self, _capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
        Ok(None)
    }

    fn default_text(&self) -> String {
        match self {
            Self::Bundle(bundle) => bundle.default_text(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Parse the outputs contained in a JSON document.
pub fn load(source: &str) -> Result<Vec<OutputValue>, NotebookError> {
    let value: Value = serde_json::from_str(source)?;
    parse_outputs(&value)
}

/// Extract the outputs from parsed JSON.
pub fn parse_outputs(value: &Value) -> Result<Vec<OutputValue>, NotebookError> {
    let outputs: Vec<&Value> = if let Some(cells) = value.get("cells").and_then(Value::as_array) {
        cells
            .iter()
            .filter_map(|cell| cell.get("outputs").and_then(Value::as_array))
            .flatten()
            .collect()
    } else if let Some(list) = value.as_array() {
        list.iter().collect()
    } else if value.get("data").is_some() {
        vec![value]
    } else {
        return Err(NotebookError::UnknownShape);
    };

    let mut values = Vec::with_capacity(outputs.len());
    for (index, output) in outputs.into_iter().enumerate() {
        if let Some(value) = parse_output(output)
            .map_err(|source| NotebookError::Bundle { index, source })?
        {
            values.push(value);
        }
    }
    debug!(count = values.len(), "loaded outputs");
    Ok(values)
}

fn parse_output(output: &Value) -> Result<Option<OutputValue>, BundleError> {
    let kind = output.get("output_type").and_then(Value::as_str);
    match kind {
        Some("stream") => Ok(Some(OutputValue::Text(
            output.get("text").map(joined).unwrap_or_default(),
        ))),
        Some("error") => {
            let field = |name| output.get(name).and_then(Value::as_str).unwrap_or_default();
            Ok(Some(OutputValue::Text(format!(
                "{}: {}",
                field("ename"),
                field("evalue")
            ))))
        }
        Some("display_data" | "execute_result" | "update_display_data") | None => {
            MimeBundle::from_json(output).map(|bundle| Some(OutputValue::Bundle(bundle)))
        }
        Some(other) => {
            debug!(output_type = other, "skipping unknown output");
            Ok(None)
        }
    }
}

/// Notebook text: a string or a list of lines.
fn joined(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(lines) => lines.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}
