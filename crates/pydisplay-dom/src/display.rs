//! The output writer.
//!
//! [`Display`] is the render context threaded through script execution. It
//! holds the document, the writer configuration and the ambient target used
//! when `display()` is called without an explicit one. The ambient target is
//! only ever set through [`Display::enter`] / [`Display::with_target`], whose
//! guard restores the previous value on every exit path.

use crate::config::DisplayConfig;
use crate::document::Document;
use crate::error::DisplayError;
use pydisplay_core::{MimeType, RichRepr};
use pydisplay_render::{format_mime, RenderedOutput};
use std::cell::RefCell;
use tracing::debug;

/// Where `display()` writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Target {
    /// The ambient target of the running script.
    #[default]
    Implicit,
    /// An element id, optionally prefixed with `#`.
    Id(String),
    /// A target argument of an unsupported type, as seen by a dynamic host.
    Invalid {
        /// The host's name for the argument's type.
        type_name: String,
    },
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl<T: Into<Self>> From<Option<T>> for Target {
    fn from(target: Option<T>) -> Self {
        target.map_or(Self::Implicit, Into::into)
    }
}

/// Options of a single `display()` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Where to write.
    pub target: Target,
    /// Add a wrapper per value (`true`) or replace the target's content.
    pub append: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            target: Target::Implicit,
            append: true,
        }
    }
}

impl DisplayOptions {
    /// Append to the ambient target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target.
    #[must_use]
    pub fn target(mut self, target: impl Into<Target>) -> Self {
        self.target = target.into();
        self
    }

    /// Set append mode.
    #[must_use]
    pub const fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }
}

/// Restores the previous ambient target when dropped.
#[must_use = "the ambient target is cleared as soon as the guard is dropped"]
pub struct TargetGuard<'a, N> {
    slot: &'a RefCell<Option<N>>,
    previous: Option<N>,
}

impl<N> Drop for TargetGuard<'_, N> {
    fn drop(&mut self) {
        *self.slot.borrow_mut() = self.previous.take();
    }
}

/// Render context for a document.
///
/// The context owns its document handle; pass `&doc` to keep using the
/// document directly.
pub struct Display<D: Document> {
    document: D,
    config: DisplayConfig,
    current: RefCell<Option<D::Node>>,
}

impl<D: Document> Display<D> {
    /// Create a context with the default configuration.
    pub fn new(document: D) -> Self {
        Self::with_config(document, DisplayConfig::default())
    }

    /// Create a context with a custom configuration.
    pub fn with_config(document: D, config: DisplayConfig) -> Self {
        Self {
            document,
            config,
            current: RefCell::new(None),
        }
    }

    /// The document being written.
    pub const fn document(&self) -> &D {
        &self.document
    }

    /// The writer configuration.
    pub const fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// The ambient target, if a script body is running.
    pub fn current_target(&self) -> Option<D::Node> {
        self.current.borrow().clone()
    }

    /// Make `node` the ambient target until the guard is dropped.
    pub fn enter(&self, node: D::Node) -> TargetGuard<'_, D::Node> {
        let previous = self.current.replace(Some(node));
        TargetGuard {
            slot: &self.current,
            previous,
        }
    }

    /// Run `f` with `node` as the ambient target.
    pub fn with_target<R>(&self, node: D::Node, f: impl FnOnce(&Self) -> R) -> R {
        let _guard = self.enter(node);
        f(self)
    }

    /// Display values, each written independently and in order.
    ///
    /// The target is resolved before any value is formatted. Formatter
    /// errors propagate and stop the call; values already written stay.
    pub fn display(
        &self,
        values: &[&dyn RichRepr],
        options: &DisplayOptions,
    ) -> Result<(), DisplayError> {
        let element = self.resolve_target(&options.target)?;
        for value in values {
            let output = format_mime(*value)?;
            self.write(&element, &output, options.append)?;
        }
        Ok(())
    }

    /// Display a single value.
    pub fn display_one<V: RichRepr + ?Sized>(
        &self,
        value: &V,
        options: &DisplayOptions,
    ) -> Result<(), DisplayError> {
        let element = self.resolve_target(&options.target)?;
        let output = format_mime(value)?;
        self.write(&element, &output, options.append)
    }

    /// Resolve a target argument to the element to write into.
    pub fn resolve_target(&self, target: &Target) -> Result<D::Node, DisplayError> {
        let element = match target {
            Target::Id(id) if id.is_empty() => return Err(DisplayError::EmptyTarget),
            Target::Id(id) => {
                let id = id.strip_prefix('#').unwrap_or(id);
                self.document
                    .get_element_by_id(id)
                    .ok_or_else(|| DisplayError::TargetNotFound(id.to_string()))?
            }
            Target::Implicit => self
                .current_target()
                .ok_or(DisplayError::NoImplicitTarget)?,
            Target::Invalid { type_name } => {
                return Err(DisplayError::TargetType(type_name.clone()))
            }
        };
        Ok(self
            .document
            .output_target_of(&element)
            .unwrap_or(element))
    }

    /// Commit rendered output under `element`.
    pub fn write(
        &self,
        element: &D::Node,
        output: &RenderedOutput,
        append: bool,
    ) -> Result<(), DisplayError> {
        if !output.unavailable.is_empty() {
            let names: Vec<&str> = output.unavailable.iter().map(MimeType::as_str).collect();
            self.document.warn(&format!(
                "Rendered object requested unavailable MIME renderers: {}",
                names.join(", ")
            ));
        }

        if self.config.skip_degenerate && output.is_degenerate() {
            debug!("skipping empty output");
            return Ok(());
        }

        let destination = if append {
            let wrapper = self.document.create_element(&self.config.wrapper_tag)?;
            if !self.config.wrapper_options.is_empty() {
                self.document.apply(&wrapper, &self.config.wrapper_options)?;
            }
            self.document.append_child(element, &wrapper)?;
            wrapper
        } else {
            self.document.replace_children(element)?;
            element.clone()
        };

        debug!(mime = %output.mime_type, append, "writing output");
        if output.needs_fragment() {
            self.document.append_fragment(&destination, &output.markup)?;
        } else {
            self.document.set_inner_html(&destination, &output.markup)?;
        }
        Ok(())
    }
}
