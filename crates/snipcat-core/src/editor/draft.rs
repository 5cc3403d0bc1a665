use chrono::Utc;
use tokio::sync::watch;

use crate::errors::Result;
use crate::model::{NewSnippet, Snippet, SnippetCode};
use crate::preview::CodeSupplier;
use crate::rules::validate_new_snippet;

pub const DEFAULT_COMPATIBILITY: &str = "Shopify 2.0+";
pub const DEFAULT_CATEGORY_ID: i64 = 1;

const PLACEHOLDER_TITLE: &str = "New Snippet";
const PLACEHOLDER_DESCRIPTION: &str = "Your snippet description";

const TEMPLATE_HTML: &str = "<!-- HTML markup for your Shopify snippet -->\n\n\
<div class=\"custom-product-container\">\n  <button class=\"custom-button\">Add to Cart</button>\n</div>";

const TEMPLATE_CSS: &str = "/* CSS styles for your Shopify snippet */\n\n\
.custom-button {\n  background-color: #5c6ac4;\n  color: white;\n  padding: 10px 20px;\n  \
border-radius: 4px;\n  cursor: pointer;\n  transition: all 0.3s ease;\n}\n\n\
.custom-button:hover {\n  background-color: #4959bd;\n  transform: translateY(-2px);\n}";

const TEMPLATE_JAVASCRIPT: &str = "// JavaScript code for your Shopify snippet\n\n\
document.addEventListener('DOMContentLoaded', function() {\n  // Your code here\n  \
console.log('Snippet initialized');\n});";

const TEMPLATE_INSTALLATION: &str = "<p>To install this snippet, add the code to your theme files:</p>\
<ol><li>Add the JavaScript to theme.js</li><li>Add the CSS to theme.css</li>\
<li>Add the HTML to your product template</li></ol>";

const TEMPLATE_HOW_IT_WORKS: &str = "<p>This snippet works by:</p>\
<ul><li>Enhancing the Add to Cart button with animations</li>\
<li>Providing visual feedback to users</li>\
<li>Improving the overall user experience</li></ul>";

/// Form state for a snippet being authored
///
/// The draft may be incomplete or invalid at any point; only `submit`
/// validates. The code fields live in a [`CodeSupplier`] so a live preview
/// can subscribe and re-render as the author types.
#[derive(Debug)]
pub struct SnippetDraft {
    title: String,
    description: String,
    installation: String,
    how_it_works: String,
    category_id: i64,
    compatibility: String,
    tags: Vec<String>,
    tag_input: String,
    code: CodeSupplier,
}

impl Default for SnippetDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl SnippetDraft {
    /// A draft pre-filled with the starter template
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            installation: TEMPLATE_INSTALLATION.to_string(),
            how_it_works: TEMPLATE_HOW_IT_WORKS.to_string(),
            category_id: DEFAULT_CATEGORY_ID,
            compatibility: DEFAULT_COMPATIBILITY.to_string(),
            tags: Vec::new(),
            tag_input: String::new(),
            code: CodeSupplier::new(SnippetCode::new(
                TEMPLATE_HTML,
                TEMPLATE_CSS,
                TEMPLATE_JAVASCRIPT,
            )),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_installation(&mut self, installation: impl Into<String>) {
        self.installation = installation.into();
    }

    pub fn set_how_it_works(&mut self, how_it_works: impl Into<String>) {
        self.how_it_works = how_it_works.into();
    }

    pub fn category_id(&self) -> i64 {
        self.category_id
    }

    pub fn set_category_id(&mut self, category_id: i64) {
        self.category_id = category_id;
    }

    pub fn set_compatibility(&mut self, compatibility: impl Into<String>) {
        self.compatibility = compatibility.into();
    }

    // ----- code -----

    pub fn set_html(&self, html: impl Into<String>) -> bool {
        let html = html.into();
        self.code.update(|code| code.html = html)
    }

    pub fn set_css(&self, css: impl Into<String>) -> bool {
        let css = css.into();
        self.code.update(|code| code.css = css)
    }

    pub fn set_javascript(&self, javascript: impl Into<String>) -> bool {
        let javascript = javascript.into();
        self.code.update(|code| code.javascript = javascript)
    }

    /// Replace all three code fields as one change
    pub fn set_code(&self, code: SnippetCode) -> bool {
        self.code.publish(code)
    }

    pub fn code(&self) -> SnippetCode {
        self.code.current()
    }

    /// Follow the code fields, e.g. to drive a preview
    pub fn subscribe_code(&self) -> watch::Receiver<SnippetCode> {
        self.code.subscribe()
    }

    // ----- tags -----

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    pub fn set_tag_input(&mut self, input: impl Into<String>) {
        self.tag_input = input.into();
    }

    /// Move the tag input into the tag list
    ///
    /// Blank or already-present tags are ignored and the input is kept.
    pub fn add_tag(&mut self) -> bool {
        let tag = self.tag_input.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        self.tag_input.clear();
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    // ----- output -----

    /// The draft as a displayable record, blanks filled with placeholders
    pub fn preview_snippet(&self) -> Snippet {
        let code = self.code();
        Snippet {
            id: 0,
            title: or_placeholder(&self.title, PLACEHOLDER_TITLE),
            description: or_placeholder(&self.description, PLACEHOLDER_DESCRIPTION),
            html: Some(code.html),
            css: Some(code.css),
            javascript: Some(code.javascript),
            installation: Some(self.installation.clone()),
            how_it_works: Some(self.how_it_works.clone()),
            category_id: if self.category_id > 0 {
                self.category_id
            } else {
                DEFAULT_CATEGORY_ID
            },
            tags: self.tags.clone(),
            compatibility: or_placeholder(&self.compatibility, DEFAULT_COMPATIBILITY),
            updated_at: Utc::now(),
            view_count: 0,
        }
    }

    /// Validate and produce the submission
    ///
    /// # Errors
    /// `Validation` listing every rejected field.
    pub fn submit(&self) -> Result<NewSnippet> {
        let code = self.code();
        let snippet = NewSnippet {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            html: non_empty(code.html),
            css: non_empty(code.css),
            javascript: non_empty(code.javascript),
            installation: non_empty(self.installation.clone()),
            how_it_works: non_empty(self.how_it_works.clone()),
            category_id: self.category_id,
            tags: self.tags.clone(),
            compatibility: self.compatibility.trim().to_string(),
        };
        validate_new_snippet(&snippet)?;
        Ok(snippet)
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_has_template() {
        let draft = SnippetDraft::new();
        let code = draft.code();
        assert!(code.html.contains("custom-button"));
        assert!(code.css.contains(".custom-button:hover"));
        assert!(code.javascript.contains("DOMContentLoaded"));
        assert_eq!(draft.category_id(), 1);
    }

    #[test]
    fn test_add_tag_trims_and_clears_input() {
        let mut draft = SnippetDraft::new();
        draft.set_tag_input("  Cart ");
        assert!(draft.add_tag());
        assert_eq!(draft.tags(), ["Cart".to_string()]);
        assert_eq!(draft.tag_input(), "");
    }

    #[test]
    fn test_add_duplicate_tag_keeps_input() {
        let mut draft = SnippetDraft::new();
        draft.set_tag_input("Cart");
        draft.add_tag();
        draft.set_tag_input("Cart");
        assert!(!draft.add_tag());
        assert_eq!(draft.tags().len(), 1);
        assert_eq!(draft.tag_input(), "Cart");
    }

    #[test]
    fn test_blank_tag_ignored() {
        let mut draft = SnippetDraft::new();
        draft.set_tag_input("   ");
        assert!(!draft.add_tag());
        assert!(draft.tags().is_empty());
    }

    #[test]
    fn test_remove_tag() {
        let mut draft = SnippetDraft::new();
        draft.set_tag_input("Zoom");
        draft.add_tag();
        assert!(draft.remove_tag("Zoom"));
        assert!(!draft.remove_tag("Zoom"));
    }

    #[test]
    fn test_preview_fills_placeholders() {
        let preview = SnippetDraft::new().preview_snippet();
        assert_eq!(preview.title, "New Snippet");
        assert_eq!(preview.description, "Your snippet description");
        assert_eq!(preview.compatibility, "Shopify 2.0+");
        assert_eq!(preview.id, 0);
    }

    #[test]
    fn test_code_setters_notify_subscribers() {
        let draft = SnippetDraft::new();
        let mut rx = draft.subscribe_code();
        assert!(draft.set_css("p{color:red}"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().css, "p{color:red}");
        assert!(!draft.set_css("p{color:red}"));
    }

    #[test]
    fn test_submit_empty_draft_fails() {
        assert!(SnippetDraft::new().submit().is_err());
    }

    #[test]
    fn test_submit_valid_draft() {
        let mut draft = SnippetDraft::new();
        draft.set_title("Sticky Cart");
        draft.set_description("Keeps the cart button visible");
        draft.set_javascript("");
        let snippet = draft.submit().unwrap();
        assert_eq!(snippet.title, "Sticky Cart");
        assert_eq!(snippet.javascript, None);
        assert!(snippet.html.is_some());
    }
}
