//! `<img>` tag synthesis for PNG and JPEG representations.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pydisplay_core::{escape_html, Content, Metadata, MimeType};
use regex::Regex;
use std::sync::OnceLock;

/// Shape of a padded standard-alphabet base64 string.
const BASE64_PATTERN: &str = r"^([A-Za-z0-9+/]{4})*([A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{2}==)?$";

fn base64_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(BASE64_PATTERN).expect("BASE64_PATTERN is a valid regex"))
}

/// Whether `s` already looks like base64 data.
pub fn looks_like_base64(s: &str) -> bool {
    base64_shape().is_match(s)
}

/// Base64 payload for an image representation.
///
/// Bytes are encoded. A string that already looks like base64 is used as
/// is, minus the single trailing newline notebooks store after it. Any
/// other string is treated as raw data and encoded as UTF-8.
pub fn image_payload(content: &Content) -> String {
    match content {
        Content::Bytes(bytes) => STANDARD.encode(bytes),
        Content::Text(text) => {
            let line = text.strip_suffix('\n').unwrap_or(text);
            if line.is_empty() || looks_like_base64(line) {
                line.to_string()
            } else {
                STANDARD.encode(text.as_bytes())
            }
        }
    }
}

/// Build the `<img>` tag for an image, rendering metadata as attributes.
pub fn render_image(mime: &MimeType, content: &Content, metadata: &Metadata) -> String {
    let mut tag = format!(
        "<img src=\"data:{mime};charset=utf-8;base64,{}\"",
        image_payload(content)
    );
    for (key, value) in metadata.iter() {
        tag.push_str(&format!(" {key}=\"{}\"", escape_html(value)));
    }
    tag.push('>');
    tag
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_bytes_are_encoded() {
        let html = render_image(
            &MimeType::ImagePng,
            &Content::from(PNG_MAGIC),
            &Metadata::new(),
        );
        assert_eq!(
            html,
            "<img src=\"data:image/png;charset=utf-8;base64,iVBORw0KGgo=\">"
        );
    }

    #[test]
    fn test_base64_text_is_passed_through() {
        assert_eq!(image_payload(&Content::from("iVBORw0KGgo=")), "iVBORw0KGgo=");
    }

    #[test]
    fn test_notebook_trailing_newline_is_stripped() {
        assert_eq!(image_payload(&Content::from("iVBORw0KGgo=\n")), "iVBORw0KGgo=");
        assert_eq!(
            render_image(
                &MimeType::ImagePng,
                &Content::from("iVBORw0KGgo=\n"),
                &Metadata::new(),
            ),
            "<img src=\"data:image/png;charset=utf-8;base64,iVBORw0KGgo=\">"
        );
        // Only one newline is a line terminator.
        assert_eq!(
            image_payload(&Content::from("iVBORw0KGgo=\n\n")),
            STANDARD.encode("iVBORw0KGgo=\n\n")
        );
    }

    #[test]
    fn test_raw_text_is_encoded() {
        // Not a multiple of four characters, so not base64.
        assert_eq!(image_payload(&Content::from("abc")), "YWJj");
        assert!(!looks_like_base64("not base64!"));
    }

    #[test]
    fn test_metadata_becomes_attributes() {
        let meta = Metadata::new().with("width", "100").with("alt", "a \"plot\"");
        let html = render_image(&MimeType::ImageJpeg, &Content::from("AAAA"), &meta);
        assert_eq!(
            html,
            "<img src=\"data:image/jpeg;charset=utf-8;base64,AAAA\" alt=\"a &quot;plot&quot;\" width=\"100\">"
        );
    }
}
