//! Plain-text helpers for node content. Node HTML is never parsed
//! structurally; these functions only strip or add markup.

use regex::Regex;
use std::sync::LazyLock;

static HIDDEN_BLOCKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(style|script)\b[^>]*>.*?</(style|script)\s*>").expect("valid regex")
});

static BLOCK_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(div|p|br|li|ul|ol|h[1-6]|tr|td|blockquote)\b[^>]*>").expect("valid regex")
});

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Extracts the visible text of an HTML fragment, collapsing whitespace.
pub fn to_plain_text(html: &str) -> String {
    let without_blocks = HIDDEN_BLOCKS.replace_all(html, " ");
    let spaced = BLOCK_TAGS.replace_all(&without_blocks, " ");
    let without_tags = TAGS.replace_all(&spaced, "");
    let collapsed = WHITESPACE.replace_all(&without_tags, " ");
    decode_entities(collapsed.trim())
}

/// Wraps plain text in the minimal fragment used for node content.
pub fn wrap_text(text: &str) -> String {
    format!("<div>{}</div>", escape(text))
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    // &amp; last so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
