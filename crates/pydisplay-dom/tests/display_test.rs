//! Integration tests for `display()` over the in-memory document.

use proptest::prelude::*;
use pydisplay_core::{Capability, FormatEntry, Html, Metadata, MimeBundle, ReprError, RichRepr};
use pydisplay_dom::{
    Child, Display, DisplayConfig, DisplayError, DisplayOptions, ElementOptions, MemoryDocument,
    NodeId, Target,
};

// ============================================================================
// Helpers
// ============================================================================

fn setup() -> (MemoryDocument, NodeId) {
    let doc = MemoryDocument::new();
    let out = doc.add_element(doc.body(), "div", "out");
    (doc, out)
}

fn to(id: &str) -> DisplayOptions {
    DisplayOptions::new().target(id)
}

struct Script(&'static str);

impl RichRepr for Script {
    fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
        Ok((capability == Capability::Javascript).then(|| FormatEntry::new(self.0)))
    }

    fn default_text(&self) -> String {
        "Script".to_string()
    }
}

struct Failing;

impl RichRepr for Failing {
    fn represent(&self, capability: Capability) -> Result<Option<FormatEntry>, ReprError> {
        match capability {
            Capability::Html => Err(ReprError::new("_repr_html_", "division by zero")),
            _ => Ok(None),
        }
    }

    fn default_text(&self) -> String {
        "Failing".to_string()
    }
}

// ============================================================================
// Target validation
// ============================================================================

#[test]
fn test_empty_target_is_rejected() {
    let (doc, _) = setup();
    let display = Display::new(&doc);
    let err = display.display(&[&"x"], &to("")).unwrap_err();
    assert_eq!(err, DisplayError::EmptyTarget);
    assert_eq!(err.to_string(), "Cannot have an empty target");
}

#[test]
fn test_non_string_target_is_rejected() {
    let (doc, _) = setup();
    let display = Display::new(&doc);
    let options = DisplayOptions::new().target(Target::Invalid {
        type_name: "int".to_string(),
    });
    let err = display.display(&[&"x"], &options).unwrap_err();
    assert_eq!(err.to_string(), "target must be str or None, not int");
}

#[test]
fn test_unknown_target_is_rejected() {
    let (doc, _) = setup();
    let display = Display::new(&doc);
    let err = display.display(&[&"x"], &to("#nope")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid selector with id=nope. Cannot be found in the page."
    );
}

#[test]
fn test_implicit_target_requires_context() {
    let (doc, _) = setup();
    let display = Display::new(&doc);
    let err = display.display(&[&"x"], &DisplayOptions::new()).unwrap_err();
    assert_eq!(err, DisplayError::NoImplicitTarget);
}

#[test]
fn test_hash_prefix_is_optional() {
    let (doc, out) = setup();
    let display = Display::new(&doc);
    display.display(&[&"a"], &to("out")).unwrap();
    display.display(&[&"b"], &to("#out")).unwrap();
    assert_eq!(doc.element_children(out).len(), 2);
}

// ============================================================================
// Writing
// ============================================================================

#[test]
fn test_strings_are_escaped_and_round_trip() {
    let (doc, out) = setup();
    let display = Display::new(&doc);
    let text = "<script>alert('x') & \"y\"</script>";
    display.display(&[&text], &to("out")).unwrap();

    let wrapper = doc.element_children(out)[0];
    assert_eq!(
        doc.children(wrapper),
        vec![Child::Markup(pydisplay_core::escape_html(text))]
    );
    assert_eq!(doc.text_content(out), text);
}

#[test]
fn test_html_inserted_as_fragment() {
    let (doc, out) = setup();
    let display = Display::new(&doc);
    display
        .display(&[&Html::new("<p>hi</p>")], &to("out"))
        .unwrap();
    assert_eq!(doc.inner_html(out), "<div><p>hi</p></div>");
}

#[test]
fn test_javascript_is_wrapped_in_script() {
    let (doc, out) = setup();
    let display = Display::new(&doc);
    display.display(&[&Script("run()")], &to("out")).unwrap();
    assert_eq!(doc.inner_html(out), "<div><script>run()</script></div>");
}

#[test]
fn test_degenerate_output_is_skipped() {
    let (doc, out) = setup();
    let display = Display::new(&doc);
    display.display(&[&"", &"\n"], &to("out")).unwrap();
    assert!(doc.children(out).is_empty());
}

#[test]
fn test_keep_degenerate_writes_empty_wrapper() {
    let (doc, out) = setup();
    let display = Display::with_config(&doc, DisplayConfig::default().keep_degenerate());
    display.display(&[&""], &to("out")).unwrap();
    assert_eq!(doc.inner_html(out), "<div></div>");
}

#[test]
fn test_append_preserves_call_order() {
    let (doc, out) = setup();
    let display = Display::new(&doc);
    display.display(&[&"a"], &to("out")).unwrap();
    display.display(&[&"b"], &to("out")).unwrap();

    let children = doc.element_children(out);
    assert_eq!(children.len(), 2);
    assert_eq!(doc.text_content(children[0]), "a");
    assert_eq!(doc.text_content(children[1]), "b");
}

#[test]
fn test_replace_shows_only_last_value() {
    let (doc, out) = setup();
    let display = Display::new(&doc);
    display.display(&[&"old"], &to("out")).unwrap();
    display
        .display(&[&"a", &"b"], &to("out").append(false))
        .unwrap();

    assert_eq!(doc.text_content(out), "b");
    assert_eq!(doc.children(out), vec![Child::Markup("b".to_string())]);
}

#[test]
fn test_wrapper_config_is_applied() {
    let (doc, out) = setup();
    let config = DisplayConfig {
        wrapper_tag: "section".to_string(),
        ..DisplayConfig::with_wrapper_options(ElementOptions::new().with_class("output"))
    };
    let display = Display::with_config(&doc, config);
    display.display(&[&"x"], &to("out")).unwrap();

    let wrapper = doc.element_children(out)[0];
    assert_eq!(doc.tag(wrapper), "section");
    assert_eq!(doc.classes(wrapper), vec!["output".to_string()]);
}

#[test]
fn test_image_metadata_reaches_markup() {
    let (doc, out) = setup();
    let display = Display::new(&doc);
    let bundle = MimeBundle::new()
        .with_entry(
            "image/png",
            FormatEntry::with_metadata("iVBORw0KGgo=", Metadata::new().with("height", "75")),
        )
        .with_global_metadata("image/png", Metadata::new().with("width", "100"));

    display.display(&[&bundle], &to("out")).unwrap();

    let html = doc.inner_html(out);
    assert!(html.contains("width=\"100\""));
    assert!(html.contains("height=\"75\""));
}

#[test]
fn test_formatter_errors_propagate_after_earlier_writes() {
    let (doc, out) = setup();
    let display = Display::new(&doc);
    let err = display
        .display(&[&"first", &Failing, &"never"], &to("out"))
        .unwrap_err();

    assert!(matches!(err, DisplayError::Repr(ref e) if e.message == "division by zero"));
    assert_eq!(doc.text_content(out), "first");
}

#[test]
fn test_unavailable_renderers_warn_host() {
    let (doc, _) = setup();
    let display = Display::new(&doc);
    let bundle = MimeBundle::new().with_text("text/latex", "$x$");
    display.display(&[&bundle], &to("out")).unwrap();
    assert_eq!(
        doc.warnings(),
        vec!["Rendered object requested unavailable MIME renderers: text/latex".to_string()]
    );
}

// ============================================================================
// Ambient target
// ============================================================================

#[test]
fn test_ambient_target_is_scoped() {
    let (doc, out) = setup();
    let display = Display::new(&doc);

    display.with_target(out, |d| {
        d.display(&[&"inside"], &DisplayOptions::new()).unwrap();
    });

    assert_eq!(doc.text_content(out), "inside");
    assert_eq!(display.current_target(), None);
}

#[test]
fn test_ambient_target_restored_after_panic() {
    let (doc, out) = setup();
    let display = Display::new(&doc);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        display.with_target(out, |_| panic!("script body raised"));
    }));

    assert!(result.is_err());
    assert_eq!(display.current_target(), None);
}

#[test]
fn test_nested_guard_restores_outer_target() {
    let (doc, out) = setup();
    let inner = doc.add_element(doc.body(), "div", "inner");
    let display = Display::new(&doc);

    let _outer = display.enter(out);
    {
        let _inner = display.enter(inner);
        assert_eq!(display.current_target(), Some(inner));
    }
    assert_eq!(display.current_target(), Some(out));
}

#[test]
fn test_script_element_redirects_to_output_target() {
    let doc = MemoryDocument::new();
    let script = doc.add_element(doc.body(), "script", "py-script");
    let visual = doc.add_element(doc.body(), "div", "py-script-output");
    doc.set_output_target(script, visual);
    let display = Display::new(&doc);

    display.display(&[&"shown"], &to("py-script")).unwrap();

    assert!(doc.children(script).is_empty());
    assert_eq!(doc.text_content(visual), "shown");
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_displayed_text_reads_back(text in "\\PC*") {
        let (doc, out) = setup();
        let display = Display::with_config(&doc, DisplayConfig::default().keep_degenerate());
        display.display(&[&text.as_str()], &to("out")).unwrap();
        prop_assert_eq!(doc.text_content(out), text);
    }

    #[test]
    fn prop_replace_leaves_single_value(values in prop::collection::vec("[a-z]{1,8}", 1..5)) {
        let (doc, out) = setup();
        let display = Display::new(&doc);
        let refs: Vec<&dyn RichRepr> = values.iter().map(|v| v as &dyn RichRepr).collect();
        display.display(&refs, &to("out").append(false)).unwrap();
        prop_assert_eq!(doc.text_content(out), values.last().unwrap().clone());
    }
}
