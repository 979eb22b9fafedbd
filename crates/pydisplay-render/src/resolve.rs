//! Formatter resolution.
//!
//! Picks the single best representation of a value. Capabilities are walked
//! from highest to lowest priority (the reverse of [`Capability::ASCENDING`])
//! and the first one that yields renderable content is selected; nothing
//! below it is evaluated.

use crate::Renderable;
use pydisplay_core::{Capability, Metadata, MimeBundle, MimeType, ReprError, RichRepr};
use tracing::debug;

/// Outcome of resolving a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The selected representation.
    pub renderable: Renderable,
    /// Per-format metadata merged over the bundle's global metadata.
    pub metadata: Metadata,
    /// MIME types offered without a renderer, when they forced the fallback.
    pub unavailable: Vec<MimeType>,
}

impl Resolved {
    fn new(renderable: Renderable) -> Self {
        Self {
            renderable,
            metadata: Metadata::new(),
            unavailable: Vec::new(),
        }
    }
}

/// Resolve a value to the representation that will be rendered.
///
/// Never fails for lack of a representation; the value's default text is
/// used instead. Errors from the value's own formatters propagate.
pub fn resolve<V: RichRepr + ?Sized>(value: &V) -> Result<Resolved, ReprError> {
    if let Some(text) = value.plain_str() {
        return Ok(Resolved::new(Renderable::PlainText(text.into_owned())));
    }

    let bundle = value.repr_mimebundle()?.unwrap_or_default();
    let mut unavailable: Vec<MimeType> = Vec::new();

    for capability in Capability::ASCENDING.into_iter().rev() {
        let mime = capability.mime_type();
        let entry = match bundle.data.get(&mime) {
            Some(entry) => Some(entry.clone()),
            None => value.represent(capability)?,
        };
        let Some(entry) = entry else {
            continue;
        };

        match Renderable::from_entry(&mime, entry.content) {
            Some(renderable) => {
                let per_format = entry.metadata.unwrap_or_default();
                let metadata = per_format.merged_over(&bundle.global_metadata(&mime));
                if !unavailable.is_empty() {
                    debug!(skipped = ?unavailable, "skipped representations without a renderer");
                }
                debug!(%capability, %mime, "resolved representation");
                return Ok(Resolved {
                    renderable,
                    metadata,
                    unavailable: Vec::new(),
                });
            }
            None => {
                if !unavailable.contains(&mime) {
                    unavailable.push(mime);
                }
            }
        }
    }

    collect_unknown_bundle_types(&bundle, &mut unavailable);
    if !unavailable.is_empty() {
        let names: Vec<&str> = unavailable.iter().map(MimeType::as_str).collect();
        debug!(
            "Rendered object requested unavailable MIME renderers: {}",
            names.join(", ")
        );
    }

    Ok(Resolved {
        renderable: Renderable::Fallback(value.default_text()),
        metadata: Metadata::new(),
        unavailable,
    })
}

/// Bundle entries whose MIME type no capability maps to.
fn collect_unknown_bundle_types(bundle: &MimeBundle, unavailable: &mut Vec<MimeType>) {
    let mut unknown: Vec<MimeType> = bundle
        .data
        .keys()
        .filter(|mime| !Renderable::is_renderable(mime) && !unavailable.contains(mime))
        .cloned()
        .collect();
    unknown.sort();
    unavailable.extend(unknown);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pydisplay_core::{Content, FormatEntry, Html};
    use std::cell::RefCell;

    /// Value offering a fixed set of capabilities and recording calls.
    #[derive(Default)]
    struct Stub {
        offered: Vec<(Capability, FormatEntry)>,
        bundle: Option<MimeBundle>,
        calls: RefCell<Vec<Capability>>,
    }

    impl Stub {
        fn offering(mut self, capability: Capability, content: &str) -> Self {
            self.offered.push((capability, FormatEntry::new(content)));
            self
        }
    }

    impl RichRepr for Stub {
        fn repr_mimebundle(&self) -> Result<Option<MimeBundle>, ReprError> {
            Ok(self.bundle.clone())
        }

        fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
            self.calls.borrow_mut().push(capability);
            Ok(self
                .offered
                .iter()
                .find(|(c, _)| *c == capability)
                .map(|(_, e)| e.clone()))
        }

        fn default_text(&self) -> String {
            "<Stub>".to_string()
        }
    }

    #[test]
    fn test_html_beats_repr() {
        let stub = Stub::default()
            .offering(Capability::Repr, "stub")
            .offering(Capability::Html, "<b>stub</b>");
        let resolved = resolve(&stub).unwrap();
        assert_eq!(resolved.renderable, Renderable::Html("<b>stub</b>".to_string()));
    }

    #[test]
    fn test_lower_priorities_are_not_evaluated() {
        let stub = Stub::default()
            .offering(Capability::Svg, "<svg/>")
            .offering(Capability::Repr, "stub");
        resolve(&stub).unwrap();
        let calls = stub.calls.borrow();
        assert!(calls.contains(&Capability::Svg));
        assert!(!calls.contains(&Capability::Html));
        assert!(!calls.contains(&Capability::Repr));
    }

    #[test]
    fn test_unavailable_types_are_skipped() {
        let stub = Stub::default()
            .offering(Capability::Latex, "$x$")
            .offering(Capability::Html, "<i>x</i>");
        let resolved = resolve(&stub).unwrap();
        assert_eq!(resolved.renderable, Renderable::Html("<i>x</i>".to_string()));
        assert!(resolved.unavailable.is_empty());
    }

    #[test]
    fn test_only_unavailable_falls_back_to_default_text() {
        let stub = Stub::default()
            .offering(Capability::Markdown, "# title")
            .offering(Capability::Pdf, "%PDF");
        let resolved = resolve(&stub).unwrap();
        assert_eq!(resolved.renderable, Renderable::Fallback("<Stub>".to_string()));
        assert_eq!(
            resolved.unavailable,
            vec![MimeType::ApplicationPdf, MimeType::TextMarkdown]
        );
    }

    #[test]
    fn test_bundle_entry_shadows_capability() {
        let stub = Stub {
            bundle: Some(MimeBundle::new().with_text("text/html", "<p>bundle</p>")),
            ..Stub::default()
        }
        .offering(Capability::Html, "<p>method</p>");

        let resolved = resolve(&stub).unwrap();
        assert_eq!(resolved.renderable, Renderable::Html("<p>bundle</p>".to_string()));
        assert!(!stub.calls.borrow().contains(&Capability::Html));
    }

    #[test]
    fn test_unknown_bundle_types_are_reported() {
        let stub = Stub {
            bundle: Some(MimeBundle::new().with_text("application/vnd.custom+json", "{}")),
            ..Stub::default()
        };
        let resolved = resolve(&stub).unwrap();
        assert_eq!(
            resolved.unavailable,
            vec![MimeType::from("application/vnd.custom+json")]
        );
    }

    #[test]
    fn test_formatter_errors_propagate() {
        struct Broken;
        impl RichRepr for Broken {
            fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
                match capability {
                    Capability::Html => Err(ReprError::new("_repr_html_", "broken")),
                    _ => Ok(None),
                }
            }
            fn default_text(&self) -> String {
                "Broken".to_string()
            }
        }

        let err = resolve(&Broken).unwrap_err();
        assert_eq!(err.method, "_repr_html_");
    }

    #[test]
    fn test_png_bytes_keep_content() {
        struct Png;
        impl RichRepr for Png {
            fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
                Ok((capability == Capability::Png).then(|| FormatEntry::new(vec![1u8, 2, 3])))
            }
            fn default_text(&self) -> String {
                "Png".to_string()
            }
        }

        let resolved = resolve(&Png).unwrap();
        assert_eq!(resolved.renderable, Renderable::Png(Content::Bytes(vec![1, 2, 3])));
    }

    #[test]
    fn test_strings_skip_probing() {
        let resolved = resolve("<Html>").unwrap();
        assert_eq!(resolved.renderable, Renderable::PlainText("<Html>".to_string()));
        let resolved = resolve(&Html::new("<i>")).unwrap();
        assert_eq!(resolved.renderable, Renderable::Html("<i>".to_string()));
    }
}
