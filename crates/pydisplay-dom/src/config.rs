//! Display configuration.

use crate::document::ElementOptions;

/// Output writer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Tag of the wrapper element created per value in append mode.
    pub wrapper_tag: String,
    /// Updates applied to every wrapper element.
    pub wrapper_options: ElementOptions,
    /// Skip output that renders to `""` or `"\n"`.
    pub skip_degenerate: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            wrapper_tag: "div".to_string(),
            wrapper_options: ElementOptions::default(),
            skip_degenerate: true,
        }
    }
}

impl DisplayConfig {
    /// Create a config with the specified wrapper tag.
    #[must_use]
    pub fn with_wrapper_tag(tag: impl Into<String>) -> Self {
        Self {
            wrapper_tag: tag.into(),
            ..Default::default()
        }
    }

    /// Create a config applying `options` to every wrapper.
    #[must_use]
    pub fn with_wrapper_options(options: ElementOptions) -> Self {
        Self {
            wrapper_options: options,
            ..Default::default()
        }
    }

    /// Keep degenerate output instead of skipping it.
    #[must_use]
    pub fn keep_degenerate(mut self) -> Self {
        self.skip_degenerate = false;
        self
    }
}
