//! Markdown to plain text.
//!
//! A fixed sequence of regex rewrites: code, line-level blocks, links and
//! images, then inline emphasis. Bracketed descriptors such as
//! `[🎥 Video de YouTube]` are plain text to every rule here.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n`]*\n?(.*?)```").expect("valid regex"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("valid regex"));

static HORIZONTAL_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$")
        .expect("valid regex")
});
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]+").expect("valid regex"));
static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*>[ \t]?").expect("valid regex"));
static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+][ \t]+").expect("valid regex"));
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\d+[.)][ \t]+").expect("valid regex"));

/// `[text]([descriptor])`: a markdown link whose target was already replaced.
static LINK_TO_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]\n]*)\]\((\[[^\]\n]*\])\)").expect("valid regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]\n]*)\]\([^)\s]*\)").expect("valid regex"));

static BOLD_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*(\S(?:.*?\S)?)\*\*\*").expect("valid regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(\S(?:.*?\S)?)\*\*").expect("valid regex"));
static BOLD_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w])__(\S(?:.*?\S)?)__($|[^\w])").expect("valid regex")
});
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(\S(?:[^*\n]*?\S)?)\*").expect("valid regex"));
static ITALIC_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\w])_(\S(?:[^_\n]*?\S)?)_($|[^\w])").expect("valid regex")
});
static STRIKETHROUGH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~(\S(?:.*?\S)?)~~").expect("valid regex"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)+").expect("valid regex"));

/// Strip markdown markup, keeping the visible text.
#[must_use]
pub fn strip_markdown(text: &str) -> String {
    let mut out = FENCED_CODE.replace_all(text, "${1}").into_owned();
    out = INLINE_CODE.replace_all(&out, "${1}").into_owned();

    out = HORIZONTAL_RULE.replace_all(&out, "").into_owned();
    out = HEADING.replace_all(&out, "").into_owned();
    out = QUOTE.replace_all(&out, "").into_owned();
    out = BULLET.replace_all(&out, "").into_owned();
    out = NUMBERED.replace_all(&out, "").into_owned();

    out = LINK_TO_LABEL.replace_all(&out, "${1} ${2}").into_owned();
    out = LINK.replace_all(&out, "${1}").into_owned();

    out = BOLD_ITALIC.replace_all(&out, "${1}").into_owned();
    out = BOLD.replace_all(&out, "${1}").into_owned();
    out = BOLD_UNDERSCORE.replace_all(&out, "${1}${2}${3}").into_owned();
    out = ITALIC.replace_all(&out, "${1}").into_owned();
    out = ITALIC_UNDERSCORE
        .replace_all(&out, "${1}${2}${3}")
        .into_owned();
    out = STRIKETHROUGH.replace_all(&out, "${1}").into_owned();

    BLANK_LINES.replace_all(&out, "\n\n").into_owned()
}
