//! [`Document`] over the browser DOM.

use js_sys::Reflect;
use pydisplay_dom::{Document, DomError, ElementOptions};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement};

use crate::host::error_message;

/// The page's `document`.
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    /// Wrap a document.
    pub const fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The document of the global `window`.
    pub fn from_window() -> Result<Self, DomError> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
            .ok_or_else(|| DomError("no global document available".to_string()))
    }
}

#[allow(clippy::needless_pass_by_value)]
fn dom_error(err: JsValue) -> DomError {
    DomError(error_message(&err))
}

impl Document for BrowserDocument {
    type Node = Element;

    fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.document.create_element(tag).map_err(dom_error)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent.append_child(child).map(drop).map_err(dom_error)
    }

    fn replace_children(&self, node: &Element) -> Result<(), DomError> {
        node.set_inner_html("");
        Ok(())
    }

    fn set_inner_html(&self, node: &Element, html: &str) -> Result<(), DomError> {
        node.set_inner_html(html);
        Ok(())
    }

    fn append_fragment(&self, node: &Element, html: &str) -> Result<(), DomError> {
        let range = self.document.create_range().map_err(dom_error)?;
        range.select_node_contents(node).map_err(dom_error)?;
        let fragment = range.create_contextual_fragment(html).map_err(dom_error)?;
        node.append_child(&fragment).map(drop).map_err(dom_error)
    }

    fn apply(&self, node: &Element, options: &ElementOptions) -> Result<(), DomError> {
        if let Some(id) = &options.id {
            node.set_id(id);
        }

        let classes = node.class_list();
        for class in &options.add_classes {
            classes.add_1(class).map_err(dom_error)?;
        }
        for class in &options.remove_classes {
            classes.remove_1(class).map_err(dom_error)?;
        }

        if options.set_styles.is_empty() && options.remove_styles.is_empty() {
            return Ok(());
        }
        let element = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError(format!("<{}> has no inline style", node.tag_name())))?;
        let style = element.style();
        for (property, value) in &options.set_styles {
            style.set_property(property, value).map_err(dom_error)?;
        }
        for property in &options.remove_styles {
            style.remove_property(property).map_err(dom_error)?;
        }
        Ok(())
    }

    fn output_target_of(&self, node: &Element) -> Option<Element> {
        if !node.tag_name().eq_ignore_ascii_case("script") {
            return None;
        }
        Reflect::get(node.as_ref(), &JsValue::from_str("target"))
            .ok()?
            .dyn_into::<Element>()
            .ok()
    }

    fn warn(&self, message: &str) {
        web_sys::console::warn_1(&JsValue::from_str(message));
    }
}
