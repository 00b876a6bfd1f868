use crate::{MatchType, ResponseType, RuleInput};

/// Starter responses for common stubbing jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    EmptyHtml,
    EmptyJs,
    EmptyCss,
    JsonMock,
    NotFound,
    CorsJson,
}

impl Template {
    pub const ALL: [Template; 6] = [
        Template::EmptyHtml,
        Template::EmptyJs,
        Template::EmptyCss,
        Template::JsonMock,
        Template::NotFound,
        Template::CorsJson,
    ];

    /// Look a template up by its short name, e.g. `"json-mock"`.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::EmptyHtml => "empty-html",
            Self::EmptyJs => "empty-js",
            Self::EmptyCss => "empty-css",
            Self::JsonMock => "json-mock",
            Self::NotFound => "404",
            Self::CorsJson => "cors-json",
        }
    }

    #[must_use]
    pub fn response_type(self) -> ResponseType {
        match self {
            Self::EmptyHtml | Self::NotFound => ResponseType::Html,
            Self::EmptyJs => ResponseType::Js,
            Self::EmptyCss => ResponseType::Css,
            Self::JsonMock | Self::CorsJson => ResponseType::Json,
        }
    }

    #[must_use]
    pub fn content(self) -> &'static str {
        match self {
            Self::EmptyHtml => {
                "<!DOCTYPE html>\n<html>\n<head><title>Empty</title></head>\n<body></body>\n</html>"
            }
            Self::EmptyJs => "// Empty JavaScript file\n",
            Self::EmptyCss => "/* Empty CSS file */\n",
            Self::JsonMock => concat!(
                "{\n",
                "  \"success\": true,\n",
                "  \"code\": 200,\n",
                "  \"message\": \"Mock response\",\n",
                "  \"data\": {\n",
                "    \"id\": 1,\n",
                "    \"name\": \"Test\",\n",
                "    \"items\": []\n",
                "  }\n",
                "}"
            ),
            Self::NotFound => concat!(
                "<!DOCTYPE html>\n<html>\n<head><title>404 Not Found</title></head>\n",
                "<body>\n<h1>404 Not Found</h1>\n",
                "<p>The requested resource was not found.</p>\n</body>\n</html>"
            ),
            Self::CorsJson => "{\n  \"success\": true,\n  \"data\": {}\n}",
        }
    }

    #[must_use]
    pub fn note(self) -> &'static str {
        match self {
            Self::EmptyHtml => "Empty HTML page",
            Self::EmptyJs => "Empty JS file",
            Self::EmptyCss => "Empty CSS file",
            Self::JsonMock => "JSON mock data",
            Self::NotFound => "404 page",
            Self::CorsJson => "CORS JSON response",
        }
    }

    /// A `contains` rule for `pattern` pre-filled with this template.
    #[must_use]
    pub fn input(self, pattern: impl Into<String>) -> RuleInput {
        RuleInput::new(pattern, self.content())
            .match_type(MatchType::Contains)
            .response_type(self.response_type())
            .priority(1)
            .note(self.note())
    }
}
