use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// A response body in its transport form: a mime type and base64 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub(crate) mime_type: &'static str,
    pub(crate) data: String,
}

impl EncodedPayload {
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// The base64 payload.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The self-contained `data:` URL a redirect would point at.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the payload back into raw bytes.
    ///
    /// Binary payloads are passed through unchecked at encode time, so this is
    /// where malformed base64 first shows up.
    ///
    /// # Errors
    ///
    /// Returns [`base64::DecodeError`] if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }
}

impl fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} base64 chars)", self.mime_type, self.data.len())
    }
}
