use crate::model::SnippetCode;

/// Reset applied before the author's stylesheet
///
/// Keeps previews consistent regardless of the user agent's defaults.
pub const BASELINE_CSS: &str = "*,*::before,*::after{box-sizing:border-box}\
html{-webkit-text-size-adjust:100%}\
body{margin:0;padding:16px;font-family:system-ui,-apple-system,'Segoe UI',Roboto,sans-serif;line-height:1.5}\
img,svg,video{max-width:100%;height:auto}\
button,input,select,textarea{font:inherit}";

/// A fully synthesized preview document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewDocument {
    source: String,
}

impl PreviewDocument {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn into_source(self) -> String {
        self.source
    }
}

impl std::fmt::Display for PreviewDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Build the standalone document for a triple
///
/// Layout: doctype, charset and viewport metadata, the baseline reset, the
/// author's CSS, then the author's HTML as live body markup followed by the
/// author's script so top-level DOM queries find their targets.
///
/// Nothing from the host is referenced. Synthesis never fails: any triple,
/// including the empty one, yields a well-formed document.
pub fn synthesize(code: &SnippetCode) -> PreviewDocument {
    let css = escape_raw_text(&code.css, "style", false);
    let javascript = escape_raw_text(&code.javascript, "script", true);

    let mut source = String::with_capacity(
        BASELINE_CSS.len() + code.html.len() + css.len() + javascript.len() + 256,
    );
    source.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    source.push_str("<meta charset=\"utf-8\">\n");
    source.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    source.push_str("<style>");
    source.push_str(BASELINE_CSS);
    source.push_str("</style>\n");
    source.push_str("<style>\n");
    source.push_str(&css);
    source.push_str("\n</style>\n</head>\n<body>\n");
    source.push_str(&code.html);
    source.push_str("\n<script>\n");
    source.push_str(&javascript);
    source.push_str("\n</script>\n</body>\n</html>\n");

    PreviewDocument { source }
}

/// Keep author text from terminating its own raw-text element
///
/// An HTML parser ends a `<style>`/`<script>` block at the first `</tag`
/// regardless of case. A backslash after `<` breaks the sequence; in CSS and
/// JS strings, templates, comments and regex literals (including `/u`)
/// `\/` reads as `/`.
///
/// Inside a script, `<!--` followed later by `<script` puts the parser in a
/// state where the real closing tag is swallowed, so only that `<!--` gets
/// the same backslash. It is then `<\!--`, which changes meaning in two
/// places: a sloppy-mode HTML-like comment and a `/u` regex literal. A lone
/// `<!--` is left exactly as written.
fn escape_raw_text(text: &str, tag: &str, script: bool) -> String {
    let bytes = text.as_bytes();
    let last_script_open = if script { rfind_script_open(bytes) } else { None };
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            let rest = &bytes[i + 1..];
            let closes = rest.first() == Some(&b'/')
                && rest.len() > tag.len()
                && rest[1..=tag.len()].eq_ignore_ascii_case(tag.as_bytes());
            let opens_comment =
                rest.starts_with(b"!--") && last_script_open.is_some_and(|open| open > i);
            if closes || opens_comment {
                out.push_str(&text[last..=i]);
                out.push('\\');
                last = i + 1;
            }
        }
        i += 1;
    }
    out.push_str(&text[last..]);
    out
}

/// Position of the last `<script` (any case) in `bytes`
fn rfind_script_open(bytes: &[u8]) -> Option<usize> {
    const OPEN: &[u8] = b"<script";
    if bytes.len() < OPEN.len() {
        return None;
    }
    (0..=bytes.len() - OPEN.len())
        .rev()
        .find(|&at| bytes[at..at + OPEN.len()].eq_ignore_ascii_case(OPEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_triple_is_complete_document() {
        let doc = synthesize(&SnippetCode::default());
        let src = doc.source();
        assert!(src.starts_with("<!DOCTYPE html>"));
        assert!(src.contains("<body>"));
        assert!(src.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_script_follows_markup() {
        let code = SnippetCode::new(
            "<button id='b'>Go</button>",
            "#b{color:red}",
            "document.getElementById('b').textContent='Clicked'",
        );
        let src = synthesize(&code).into_source();
        let button = src.find("<button id='b'>").unwrap();
        let script = src.find("document.getElementById").unwrap();
        let style = src.find("#b{color:red}").unwrap();
        assert!(style < button);
        assert!(button < script);
    }

    #[test]
    fn test_style_terminator_neutralized() {
        assert_eq!(
            escape_raw_text("a</STYLE>b", "style", false),
            "a<\\/STYLE>b"
        );
    }

    #[test]
    fn test_script_comment_opener_before_script_tag_neutralized() {
        assert_eq!(
            escape_raw_text("x='<!--';y='<SCRIPT>';z='</script>'", "script", true),
            "x='<\\!--';y='<SCRIPT>';z='<\\/script>'"
        );
    }

    #[test]
    fn test_lone_comment_opener_kept_verbatim() {
        // HTML-like comments and `/u` regexes keep working
        assert_eq!(
            escape_raw_text("<!-- legacy\nvar r = /<!--/u;", "script", true),
            "<!-- legacy\nvar r = /<!--/u;"
        );
        assert_eq!(
            escape_raw_text("'<script>' + '<!--'", "script", true),
            "'<script>' + '<!--'"
        );
    }

    #[test]
    fn test_closing_tag_in_unicode_regex_uses_identity_escape() {
        assert_eq!(
            escape_raw_text("/<\\/script>|</script>/u", "script", true),
            "/<\\/script>|<\\/script>/u"
        );
    }

    #[test]
    fn test_other_closing_tags_untouched() {
        assert_eq!(escape_raw_text("'</div>'", "script", true), "'</div>'");
        assert_eq!(escape_raw_text("</scrip", "script", true), "</scrip");
    }

    #[test]
    fn test_comment_opener_left_alone_in_css() {
        assert_eq!(escape_raw_text("<!--", "style", false), "<!--");
    }
}
