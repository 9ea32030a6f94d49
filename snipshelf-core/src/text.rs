//! Display helpers for snippet text and timestamps.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("Code block regex is valid"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("Inline code regex is valid"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#{1,6} (.+)").expect("Heading regex is valid"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+)\*\*").expect("Bold regex is valid"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+)\*").expect("Italic regex is valid"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+)\]\(.+\)").expect("Link regex is valid"));

/// Default preview length in characters
pub const DEFAULT_PREVIEW_LEN: usize = 100;

/// Cuts `text` to `max_len` characters, appending `...` when shortened
#[must_use]
pub fn truncate_text(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// Builds a one-line-ish preview of snippet content
///
/// Fenced code blocks become `[code block]`; inline code, heading, emphasis
/// and link markup is stripped down to its text. The result is trimmed and
/// truncated to `max_len` characters.
#[must_use]
pub fn snippet_preview(content: &str, max_len: usize) -> String {
    let clean = CODE_BLOCK.replace_all(content, "[code block]");
    let clean = INLINE_CODE.replace_all(&clean, "${1}");
    let clean = HEADING.replace_all(&clean, "${1}");
    let clean = BOLD.replace_all(&clean, "${1}");
    let clean = ITALIC.replace_all(&clean, "${1}");
    let clean = LINK.replace_all(&clean, "${1}");

    truncate_text(clean.trim(), max_len)
}

/// Maps a language alias or file extension to an editor language name
#[must_use]
pub fn language_for(alias: &str) -> &str {
    match alias {
        "javascript" | "js" => "javascript",
        "typescript" | "ts" => "typescript",
        "html" => "html",
        "css" => "css",
        "markdown" | "md" => "markdown",
        "json" => "json",
        "python" | "py" => "python",
        "" => "plaintext",
        other => other,
    }
}

/// Formats a timestamp as e.g. `Mar 5, 2024`
#[must_use]
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y").to_string()
}

/// Formats a timestamp as e.g. `Mar 5, 2024 3:07 PM`
#[must_use]
pub fn format_date_time(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y %-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly", 7), "exactly");
        assert_eq!(truncate_text("truncated text", 9), "truncated...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
    }

    #[test]
    fn test_preview_strips_markdown() {
        let content = "# Title\nSome **bold** and *italic* with `code` and [a link](https://x.y)";
        assert_eq!(
            snippet_preview(content, DEFAULT_PREVIEW_LEN),
            "Title\nSome bold and italic with code and a link"
        );
    }

    #[test]
    fn test_preview_replaces_code_blocks() {
        let content = "Intro\n```rust\nfn main() {}\n```\nOutro";
        assert_eq!(
            snippet_preview(content, DEFAULT_PREVIEW_LEN),
            "Intro\n[code block]\nOutro"
        );
    }

    #[test]
    fn test_preview_truncates() {
        let content = "a".repeat(150);
        let preview = snippet_preview(&content, DEFAULT_PREVIEW_LEN);
        assert_eq!(preview.chars().count(), DEFAULT_PREVIEW_LEN + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_language_for() {
        assert_eq!(language_for("js"), "javascript");
        assert_eq!(language_for("py"), "python");
        assert_eq!(language_for("rust"), "rust");
        assert_eq!(language_for(""), "plaintext");
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 5, 15, 7, 0).unwrap();
        assert_eq!(format_date(ts), "Mar 5, 2024");
        assert_eq!(format_date_time(ts), "Mar 5, 2024 3:07 PM");
    }
}
