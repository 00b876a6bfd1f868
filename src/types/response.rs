use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of content a rule responds with.
///
/// Names are parsed case-insensitively. Anything unrecognised is kept verbatim
/// in [`ResponseType::Other`] so that a stored rule survives a round trip; it
/// is served as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseType {
    #[default]
    Html,
    Js,
    Css,
    Json,
    Xml,
    Text,
    Svg,
    Png,
    Jpg,
    Gif,
    Webp,
    Ico,
    Woff,
    Woff2,
    Ttf,
    Eot,
    Other(String),
}

impl ResponseType {
    /// Parse a response type name. Never fails.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "html" => Self::Html,
            "js" | "javascript" => Self::Js,
            "css" => Self::Css,
            "json" => Self::Json,
            "xml" => Self::Xml,
            "text" => Self::Text,
            "svg" => Self::Svg,
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpg,
            "gif" => Self::Gif,
            "webp" => Self::Webp,
            "ico" => Self::Ico,
            "woff" => Self::Woff,
            "woff2" => Self::Woff2,
            "ttf" => Self::Ttf,
            "eot" => Self::Eot,
            _ => Self::Other(name.to_owned()),
        }
    }

    /// Guess the response type of a text file from its name or extension.
    ///
    /// Only text formats are recognised; anything else yields `None`.
    #[must_use]
    pub fn from_extension(file_name: &str) -> Option<Self> {
        let ext = file_name.rsplit('.').next().unwrap_or(file_name);
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "js" | "mjs" => Some(Self::Js),
            "css" => Some(Self::Css),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "txt" => Some(Self::Text),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Html => "html",
            Self::Js => "js",
            Self::Css => "css",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Text => "text",
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Ico => "ico",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
            Self::Ttf => "ttf",
            Self::Eot => "eot",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for ResponseType {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<&str> for ResponseType {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<ResponseType> for String {
    fn from(kind: ResponseType) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
