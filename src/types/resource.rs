use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a request, used to restrict which requests a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    MainFrame,
    SubFrame,
    Stylesheet,
    Script,
    Image,
    Font,
    Object,
    #[serde(rename = "xmlhttprequest", alias = "xhr")]
    XmlHttpRequest,
    Ping,
    Media,
    Websocket,
    Webtransport,
    Webbundle,
    Other,
}

impl ResourceType {
    pub const ALL: [ResourceType; 14] = [
        ResourceType::MainFrame,
        ResourceType::SubFrame,
        ResourceType::Stylesheet,
        ResourceType::Script,
        ResourceType::Image,
        ResourceType::Font,
        ResourceType::Object,
        ResourceType::XmlHttpRequest,
        ResourceType::Ping,
        ResourceType::Media,
        ResourceType::Websocket,
        ResourceType::Webtransport,
        ResourceType::Webbundle,
        ResourceType::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MainFrame => "main_frame",
            Self::SubFrame => "sub_frame",
            Self::Stylesheet => "stylesheet",
            Self::Script => "script",
            Self::Image => "image",
            Self::Font => "font",
            Self::Object => "object",
            Self::XmlHttpRequest => "xmlhttprequest",
            Self::Ping => "ping",
            Self::Media => "media",
            Self::Websocket => "websocket",
            Self::Webtransport => "webtransport",
            Self::Webbundle => "webbundle",
            Self::Other => "other",
        }
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of [`ResourceType`]s packed into a bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResourceSet(u16);

impl ResourceSet {
    #[must_use]
    pub fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn all() -> Self {
        ResourceType::ALL.into_iter().collect()
    }

    /// Build the filter for a rule: an absent or empty list means every kind.
    #[must_use]
    pub fn from_filter(types: Option<&[ResourceType]>) -> Self {
        match types {
            Some(types) if !types.is_empty() => types.iter().copied().collect(),
            _ => Self::all(),
        }
    }

    #[must_use]
    pub fn contains(self, kind: ResourceType) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn insert(&mut self, kind: ResourceType) {
        self.0 |= kind.bit();
    }

    #[must_use]
    pub fn is_all(self) -> bool {
        self == Self::all()
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = ResourceType> {
        ResourceType::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<ResourceType> for ResourceSet {
    fn from_iter<I: IntoIterator<Item = ResourceType>>(iter: I) -> Self {
        let mut set = Self::empty();
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}
