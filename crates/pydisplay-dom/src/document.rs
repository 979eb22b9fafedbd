//! The document a display writes into.
//!
//! [`Document`] is the small slice of the host DOM the output writer needs.
//! Nodes are cheap handles owned by the host; the writer never owns them.

use thiserror::Error;

/// Failure reported by the host document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document operation failed: {0}")]
pub struct DomError(pub String);

/// Recognised bulk-update options for an element.
///
/// Classes map to `classList.add` / `classList.remove`, styles to
/// `style.setProperty` / `style.removeProperty`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementOptions {
    /// Element id to set.
    pub id: Option<String>,
    /// Classes to add.
    pub add_classes: Vec<String>,
    /// Classes to remove.
    pub remove_classes: Vec<String>,
    /// Style properties to set, in order.
    pub set_styles: Vec<(String, String)>,
    /// Style properties to remove.
    pub remove_styles: Vec<String>,
}

impl ElementOptions {
    /// No updates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_classes.push(class.into());
        self
    }

    /// Remove a class.
    #[must_use]
    pub fn without_class(mut self, class: impl Into<String>) -> Self {
        self.remove_classes.push(class.into());
        self
    }

    /// Set a style property.
    #[must_use]
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_styles.push((property.into(), value.into()));
        self
    }

    /// Remove a style property.
    #[must_use]
    pub fn without_style(mut self, property: impl Into<String>) -> Self {
        self.remove_styles.push(property.into());
        self
    }

    /// Whether applying these options changes nothing.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.add_classes.is_empty()
            && self.remove_classes.is_empty()
            && self.set_styles.is_empty()
            && self.remove_styles.is_empty()
    }
}

/// Host document operations used by the output writer.
pub trait Document {
    /// Handle to an element.
    type Node: Clone;

    /// `document.getElementById`.
    fn get_element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// `document.createElement`.
    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;

    /// `parent.appendChild(child)`.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// `node.replaceChildren()`: remove every child.
    fn replace_children(&self, node: &Self::Node) -> Result<(), DomError>;

    /// `node.innerHTML = html`.
    fn set_inner_html(&self, node: &Self::Node, html: &str) -> Result<(), DomError>;

    /// Parse `html` as a fragment and append it, so scripts inside run.
    fn append_fragment(&self, node: &Self::Node, html: &str) -> Result<(), DomError>;

    /// Apply bulk updates.
    fn apply(&self, node: &Self::Node, options: &ElementOptions) -> Result<(), DomError>;

    /// The visual output node of a script element, if it has one.
    fn output_target_of(&self, node: &Self::Node) -> Option<Self::Node> {
        let _ = node;
        None
    }

    /// Report a non-fatal diagnostic to the host console.
    fn warn(&self, message: &str) {
        let _ = message;
    }
}

impl<T: Document + ?Sized> Document for &T {
    type Node = T::Node;

    fn get_element_by_id(&self, id: &str) -> Option<Self::Node> {
        (**self).get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError> {
        (**self).create_element(tag)
    }

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError> {
        (**self).append_child(parent, child)
    }

    fn replace_children(&self, node: &Self::Node) -> Result<(), DomError> {
        (**self).replace_children(node)
    }

    fn set_inner_html(&self, node: &Self::Node, html: &str) -> Result<(), DomError> {
        (**self).set_inner_html(node, html)
    }

    fn append_fragment(&self, node: &Self::Node, html: &str) -> Result<(), DomError> {
        (**self).append_fragment(node, html)
    }

    fn apply(&self, node: &Self::Node, options: &ElementOptions) -> Result<(), DomError> {
        (**self).apply(node, options)
    }

    fn output_target_of(&self, node: &Self::Node) -> Option<Self::Node> {
        (**self).output_target_of(node)
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}
