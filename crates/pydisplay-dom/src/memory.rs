//! An in-memory recording document.
//!
//! `MemoryDocument` keeps elements in an arena and stores inserted markup as
//! opaque strings. It does not parse HTML or run scripts; it records what
//! was written where, which is all the display pipeline needs outside a
//! browser.

use crate::document::{Document, DomError, ElementOptions};
use pydisplay_core::{escape_html, unescape_html};
use std::cell::RefCell;

/// Handle to an element in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    /// A nested element.
    Element(NodeId),
    /// Markup inserted through `innerHTML` or a fragment.
    Markup(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    children: Vec<Child>,
    parent: Option<NodeId>,
    output_target: Option<NodeId>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
            parent: None,
            output_target: None,
        }
    }
}

/// Arena-backed document rooted at a `<body>` element.
#[derive(Debug)]
pub struct MemoryDocument {
    nodes: RefCell<Vec<ElementData>>,
    warnings: RefCell<Vec<String>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document containing only `<body>`.
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![ElementData::new("body")]),
            warnings: RefCell::new(Vec::new()),
        }
    }

    /// The `<body>` element.
    pub const fn body(&self) -> NodeId {
        NodeId(0)
    }

    /// Create an element with an id and attach it under `parent`.
    pub fn add_element(&self, parent: NodeId, tag: &str, id: &str) -> NodeId {
        let node = self.alloc(tag);
        self.nodes.borrow_mut()[node.0].id = Some(id.to_string());
        self.attach(parent, node);
        node
    }

    /// Mark `target` as the visual output node of the script element `script`.
    pub fn set_output_target(&self, script: NodeId, target: NodeId) {
        self.nodes.borrow_mut()[script.0].output_target = Some(target);
    }

    /// The children of an element.
    pub fn children(&self, node: NodeId) -> Vec<Child> {
        self.nodes.borrow()[node.0].children.clone()
    }

    /// The element children of an element.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0]
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Element(id) => Some(*id),
                Child::Markup(_) => None,
            })
            .collect()
    }

    /// Tag name of an element.
    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    /// Classes of an element, in insertion order.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.nodes.borrow()[node.0].classes.clone()
    }

    /// Value of a style property.
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0]
            .styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.clone())
    }

    /// Warnings reported through [`Document::warn`].
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    /// Serialized markup of an element's children.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            match child {
                Child::Element(id) => out.push_str(&self.outer_html(id)),
                Child::Markup(markup) => out.push_str(&markup),
            }
        }
        out
    }

    /// Serialized markup of an element, including its own tag.
    pub fn outer_html(&self, node: NodeId) -> String {
        let (tag, attrs) = {
            let nodes = self.nodes.borrow();
            let data = &nodes[node.0];
            let mut attrs = String::new();
            if let Some(id) = &data.id {
                attrs.push_str(&format!(" id=\"{}\"", escape_html(id)));
            }
            if !data.classes.is_empty() {
                attrs.push_str(&format!(" class=\"{}\"", escape_html(&data.classes.join(" "))));
            }
            if !data.styles.is_empty() {
                let style: Vec<String> = data
                    .styles
                    .iter()
                    .map(|(p, v)| format!("{p}: {v};"))
                    .collect();
                attrs.push_str(&format!(" style=\"{}\"", escape_html(&style.join(" "))));
            }
            (data.tag.clone(), attrs)
        };
        format!("<{tag}{attrs}>{}</{tag}>", self.inner_html(node))
    }

    /// Text content of an element: markup with tags stripped and entities
    /// decoded.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            match child {
                Child::Element(id) => out.push_str(&self.text_content(id)),
                Child::Markup(markup) => out.push_str(&unescape_html(&strip_tags(&markup))),
            }
        }
        out
    }

    /// Serialized markup of the whole body.
    pub fn to_html(&self) -> String {
        self.inner_html(self.body())
    }

    fn alloc(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(ElementData::new(tag));
        NodeId(nodes.len() - 1)
    }

    fn attach(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(old_parent) = nodes[child.0].parent {
            nodes[old_parent.0]
                .children
                .retain(|c| *c != Child::Element(child));
        }
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(Child::Element(child));
    }

    fn detach_children(nodes: &mut [ElementData], node: NodeId) {
        let children = std::mem::take(&mut nodes[node.0].children);
        for child in children {
            if let Child::Element(id) = child {
                nodes[id.0].parent = None;
            }
        }
    }

    fn is_connected(nodes: &[ElementData], node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id.0 == 0 {
                return true;
            }
            current = nodes[id.0].parent;
        }
        false
    }
}

fn strip_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut in_tag = false;
    for ch in markup.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

impl Document for MemoryDocument {
    type Node = NodeId;

    fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        nodes
            .iter()
            .enumerate()
            .find(|(index, data)| {
                data.id.as_deref() == Some(id) && Self::is_connected(&nodes, NodeId(*index))
            })
            .map(|(index, _)| NodeId(index))
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        Ok(self.alloc(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        if Self::is_ancestor(&self.nodes.borrow(), *child, *parent) {
            return Err(DomError("the new child is an ancestor of the parent".to_string()));
        }
        self.attach(*parent, *child);
        Ok(())
    }

    fn replace_children(&self, node: &NodeId) -> Result<(), DomError> {
        Self::detach_children(&mut self.nodes.borrow_mut(), *node);
        Ok(())
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        Self::detach_children(&mut nodes, *node);
        if !html.is_empty() {
            nodes[node.0].children.push(Child::Markup(html.to_string()));
        }
        Ok(())
    }

    fn append_fragment(&self, node: &NodeId, html: &str) -> Result<(), DomError> {
        if !html.is_empty() {
            self.nodes.borrow_mut()[node.0]
                .children
                .push(Child::Markup(html.to_string()));
        }
        Ok(())
    }

    fn apply(&self, node: &NodeId, options: &ElementOptions) -> Result<(), DomError> {
        let mut nodes = self.nodes.borrow_mut();
        let data = &mut nodes[node.0];
        if let Some(id) = &options.id {
            data.id = Some(id.clone());
        }
        for class in &options.add_classes {
            if !data.classes.contains(class) {
                data.classes.push(class.clone());
            }
        }
        data.classes.retain(|c| !options.remove_classes.contains(c));
        for (property, value) in &options.set_styles {
            match data.styles.iter_mut().find(|(p, _)| p == property) {
                Some(entry) => entry.1 = value.clone(),
                None => data.styles.push((property.clone(), value.clone())),
            }
        }
        data.styles.retain(|(p, _)| !options.remove_styles.contains(p));
        Ok(())
    }

    fn output_target_of(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].output_target
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

impl MemoryDocument {
    fn is_ancestor(nodes: &[ElementData], candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = nodes[id.0].parent;
        }
        false
    }
}
