use serde::{Deserialize, Serialize};

/// The renderable content of one snippet
///
/// The three fields always travel together: a render consumes one snapshot
/// of the whole triple. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnippetCode {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub css: String,
    #[serde(default)]
    pub javascript: String,
}

impl SnippetCode {
    pub fn new(
        html: impl Into<String>,
        css: impl Into<String>,
        javascript: impl Into<String>,
    ) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            javascript: javascript.into(),
        }
    }

    /// True when all three fields are empty
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.css.is_empty() && self.javascript.is_empty()
    }
}
