//! JavaScript values as displayable objects.
//!
//! A [`JsValueRepr`] answers capability queries by looking up the
//! conventional method names (`_repr_html_`, `savefig`, ...) as function
//! properties of the wrapped value and calling them with the value as `this`.

use std::borrow::Cow;

use js_sys::{Array, Function, Number, Object, Reflect, Uint8Array, JSON};
use pydisplay_core::{
    Capability, Content, FormatEntry, Metadata, MimeBundle, MimeType, ReprError, RichRepr,
};
use pydisplay_dom::Target;
use wasm_bindgen::{JsCast, JsValue};

const MIMEBUNDLE_METHOD: &str = "_repr_mimebundle_";

/// A JavaScript value passed to `display()`.
///
/// Formatter methods are called with `this` bound to the value. The
/// `_repr_*_` methods receive no arguments; `savefig` is called as
/// `savefig("png")` (the format, without the buffer a Python figure takes)
/// and returns the image as a `Uint8Array` or a base64 string. Any method
/// may return the content alone or a `[content, metadata]` pair.
/// `_repr_mimebundle_` returns `{mime: content}` or
/// `[{mime: content}, {mime: metadata}]`.
#[derive(Debug, Clone)]
pub struct JsValueRepr(JsValue);

impl JsValueRepr {
    /// Wrap a value.
    pub const fn new(value: JsValue) -> Self {
        Self(value)
    }

    /// The wrapped value.
    pub const fn value(&self) -> &JsValue {
        &self.0
    }

    fn method(&self, name: &str) -> Option<Function> {
        if !self.0.is_object() && !self.0.is_function() {
            return None;
        }
        Reflect::get(&self.0, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }

    /// Call a capability method. `Ok(None)` when it is missing or returns
    /// `null`/`undefined`.
    fn call(&self, name: &str, args: &[JsValue]) -> Result<Option<JsValue>, ReprError> {
        let Some(function) = self.method(name) else {
            return Ok(None);
        };
        let result = match args {
            [] => function.call0(&self.0),
            [arg, ..] => function.call1(&self.0, arg),
        }
        .map_err(|err| ReprError::new(name, error_message(&err)))?;

        Ok((!result.is_null() && !result.is_undefined()).then_some(result))
    }
}

impl From<JsValue> for JsValueRepr {
    fn from(value: JsValue) -> Self {
        Self(value)
    }
}

impl RichRepr for JsValueRepr {
    fn plain_str(&self) -> Option<Cow<'_, str>> {
        self.0.as_string().map(Cow::Owned)
    }

    fn repr_mimebundle(&self) -> Result<Option<MimeBundle>, ReprError> {
        let Some(result) = self.call(MIMEBUNDLE_METHOD, &[])? else {
            return Ok(None);
        };

        let (data, metadata) = if Array::is_array(&result) {
            let pair = Array::from(&result);
            (pair.get(0), pair.get(1))
        } else {
            (result, JsValue::UNDEFINED)
        };

        let mut bundle = MimeBundle::new();
        if let Some(data) = data.dyn_ref::<Object>() {
            for entry in Object::entries(data).iter() {
                let entry = Array::from(&entry);
                let Some(mime) = entry.get(0).as_string() else {
                    continue;
                };
                let format_entry = entry_from_js(&entry.get(1)).ok_or_else(|| {
                    ReprError::new(MIMEBUNDLE_METHOD, format!("unsupported content for {mime}"))
                })?;
                bundle
                    .data
                    .insert(MimeType::from(mime.as_str()), format_entry);
            }
        }

        if let Ok(serde_json::Value::Object(map)) =
            serde_wasm_bindgen::from_value::<serde_json::Value>(metadata)
        {
            for (mime, meta) in map {
                if let Some(meta) = meta.is_object().then(|| Metadata::from_json(&meta)).flatten() {
                    bundle.metadata.insert(MimeType::from(mime.as_str()), meta);
                }
            }
        }

        Ok(Some(bundle))
    }

    fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
        let method = capability.method_name();
        let args = match capability {
            Capability::Savefig => vec![JsValue::from_str("png")],
            _ => Vec::new(),
        };
        let Some(result) = self.call(method, &args)? else {
            return Ok(None);
        };
        entry_from_js(&result)
            .map(Some)
            .ok_or_else(|| ReprError::new(method, "returned a value that cannot be displayed"))
    }

    fn default_text(&self) -> String {
        js_string(&self.0)
    }
}

/// A capability result: the content alone or a `[content, metadata]` pair.
///
/// A two-element array is a pair only when its second element is a plain
/// object, `null` or `undefined`; `[1, 2]` is content.
fn entry_from_js(value: &JsValue) -> Option<FormatEntry> {
    if Array::is_array(value) {
        let pair = Array::from(value);
        if pair.length() == 2 && is_metadata_slot(&pair.get(1)) {
            let content = content_from_js(&pair.get(0))?;
            return Some(match metadata_from_js(&pair.get(1)) {
                Some(metadata) => FormatEntry::with_metadata(content, metadata),
                None => FormatEntry::new(content),
            });
        }
    }
    content_from_js(value).map(FormatEntry::new)
}

fn is_metadata_slot(value: &JsValue) -> bool {
    if value.is_null() || value.is_undefined() {
        return true;
    }
    if !value.is_object() || Array::is_array(value) {
        return false;
    }
    let proto = Object::get_prototype_of(value);
    let object_prototype = Object::get_prototype_of(&Object::new());
    proto.is_null() || JsValue::from(proto) == JsValue::from(object_prototype)
}

fn content_from_js(value: &JsValue) -> Option<Content> {
    if let Some(text) = value.as_string() {
        return Some(Content::Text(text));
    }
    if let Some(bytes) = value.dyn_ref::<Uint8Array>() {
        return Some(Content::Bytes(bytes.to_vec()));
    }
    // Anything else is shown as its JSON text (`_repr_json_` returns objects).
    JSON::stringify(value)
        .ok()
        .and_then(|json| json.as_string())
        .map(Content::Text)
}

fn metadata_from_js(value: &JsValue) -> Option<Metadata> {
    let json = serde_wasm_bindgen::from_value::<serde_json::Value>(value.clone()).ok()?;
    json.is_object().then(|| Metadata::from_json(&json)).flatten()
}

/// `String(value)`.
pub(crate) fn js_string(value: &JsValue) -> String {
    Reflect::get(&js_sys::global(), &JsValue::from_str("String"))
        .ok()
        .and_then(|string| string.dyn_into::<Function>().ok())
        .and_then(|string| string.call1(&JsValue::UNDEFINED, value).ok())
        .and_then(|text| text.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Message of a thrown JS value.
pub(crate) fn error_message(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .unwrap_or_else(|| js_string(err))
}

/// The name a dynamic host would report for the type of `value`.
pub fn js_type_name(value: &JsValue) -> String {
    if value.as_bool().is_some() {
        return "bool".to_string();
    }
    if value.as_f64().is_some() {
        return if Number::is_integer(value) { "int" } else { "float" }.to_string();
    }
    if Array::is_array(value) {
        return "list".to_string();
    }
    if value.is_function() {
        return "function".to_string();
    }
    match value.js_typeof().as_string().as_deref() {
        Some("bigint") => "int".to_string(),
        Some(other) => other.to_string(),
        None => "object".to_string(),
    }
}

/// Convert a JS `target` argument.
pub fn target_from_js(value: &JsValue) -> Target {
    if value.is_null() || value.is_undefined() {
        return Target::Implicit;
    }
    match value.as_string() {
        Some(id) => Target::Id(id),
        None => Target::Invalid {
            type_name: js_type_name(value),
        },
    }
}
