//! HTML sanitization applied to fetched pages before extraction.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>")
        .expect("BUG: hardcoded script block regex is invalid")
});

static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>")
        .expect("BUG: hardcoded style block regex is invalid")
});

static HORIZONTAL_WS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\S\n]+").expect("BUG: hardcoded whitespace regex is invalid")
});

static PADDED_NEWLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" ?\n ?").expect("BUG: hardcoded newline regex is invalid")
});

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n{3,}").expect("BUG: hardcoded blank line regex is invalid")
});

/// Drops `<script>`/`<style>` blocks and squeezes whitespace.
///
/// Runs of spaces and tabs become one space, three or more newlines become
/// two, and the result is trimmed. Markup is otherwise left intact.
pub fn sanitize_html(html: &str) -> String {
    let html = SCRIPT_BLOCK.replace_all(html, "");
    let html = STYLE_BLOCK.replace_all(&html, "");
    let html = HORIZONTAL_WS.replace_all(&html, " ");
    let html = PADDED_NEWLINE.replace_all(&html, "\n");
    let html = BLANK_LINES.replace_all(&html, "\n\n");
    html.trim().to_string()
}
