use super::resource::ResourceType;

/// An outgoing request as seen by the match evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub resource_type: ResourceType,
}

impl Request {
    pub fn new(url: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            url: url.into(),
            resource_type,
        }
    }

    /// A top-level document navigation.
    pub fn document(url: impl Into<String>) -> Self {
        Self::new(url, ResourceType::MainFrame)
    }
}
