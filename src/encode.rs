use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::{EncodedPayload, ResponseType};

const FALLBACK_MIME: &str = "text/plain;charset=utf-8";

/// Mime type served for a response type.
#[must_use]
pub fn mime_type(response_type: &ResponseType) -> &'static str {
    match response_type {
        ResponseType::Html => "text/html;charset=utf-8",
        ResponseType::Js => "application/javascript;charset=utf-8",
        ResponseType::Css => "text/css;charset=utf-8",
        ResponseType::Json => "application/json;charset=utf-8",
        ResponseType::Xml => "application/xml;charset=utf-8",
        ResponseType::Text => FALLBACK_MIME,
        ResponseType::Svg => "image/svg+xml;charset=utf-8",
        ResponseType::Png => "image/png",
        ResponseType::Jpg => "image/jpeg",
        ResponseType::Gif => "image/gif",
        ResponseType::Webp => "image/webp",
        ResponseType::Ico => "image/x-icon",
        ResponseType::Woff => "font/woff",
        ResponseType::Woff2 => "font/woff2",
        ResponseType::Ttf => "font/ttf",
        ResponseType::Eot => "application/vnd.ms-fontobject",
        ResponseType::Other(_) => FALLBACK_MIME,
    }
}

/// Whether content of this mime type is authored as text.
#[must_use]
pub fn is_text_mime(mime: &str) -> bool {
    ["text", "javascript", "json", "xml", "svg"]
        .iter()
        .any(|marker| mime.contains(marker))
}

/// Encode a response body for embedding.
///
/// Text content is base64-encoded from its UTF-8 bytes. Binary content is
/// expected to already be base64 and is passed through untouched.
#[must_use]
pub fn encode(content: &str, response_type: &ResponseType) -> EncodedPayload {
    let mime_type = mime_type(response_type);
    let data = if is_text_mime(mime_type) {
        STANDARD.encode(content.as_bytes())
    } else {
        content.to_owned()
    };
    EncodedPayload { mime_type, data }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_table() {
        assert_eq!(mime_type(&ResponseType::Html), "text/html;charset=utf-8");
        assert_eq!(mime_type(&ResponseType::parse("JS")), "application/javascript;charset=utf-8");
        assert_eq!(mime_type(&ResponseType::Ico), "image/x-icon");
        assert_eq!(mime_type(&ResponseType::Eot), "application/vnd.ms-fontobject");
    }

    #[test]
    fn unknown_type_is_plain_text() {
        assert_eq!(mime_type(&ResponseType::parse("wasm")), "text/plain;charset=utf-8");
        let payload = encode("hi", &ResponseType::parse("wasm"));
        assert_eq!(payload.data(), "aGk=");
    }

    #[test]
    fn text_is_base64_of_utf8() {
        let payload = encode("{\"a\":1}", &ResponseType::Json);
        assert_eq!(payload.mime_type(), "application/json;charset=utf-8");
        assert_eq!(payload.data(), "eyJhIjoxfQ==");
    }

    #[test]
    fn non_ascii_text_round_trips() {
        let content = "<p>响应 ✓</p>";
        let payload = encode(content, &ResponseType::Html);
        let bytes = payload.decode().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), content);
    }

    #[test]
    fn svg_counts_as_text() {
        let payload = encode("<svg/>", &ResponseType::Svg);
        assert_eq!(payload.data(), "PHN2Zy8+");
    }

    #[test]
    fn binary_passes_through() {
        let payload = encode("iVBORw0KGgo=", &ResponseType::Png);
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.data(), "iVBORw0KGgo=");
    }

    #[test]
    fn invalid_binary_surfaces_on_decode() {
        let payload = encode("not base64!", &ResponseType::Woff2);
        assert_eq!(payload.data(), "not base64!");
        assert!(payload.decode().is_err());
    }

    #[test]
    fn data_url_format() {
        let payload = encode("x", &ResponseType::Text);
        assert_eq!(payload.data_url(), "data:text/plain;charset=utf-8;base64,eA==");
    }
}
