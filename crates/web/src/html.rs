//! HTML-to-text extraction.
//!
//! Pages are untrusted third-party noise, not a DOM: a handful of regex
//! passes is enough to turn them into prompt-safe plain text. Malformed
//! HTML degrades into noisy text; this function never fails.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script>").expect("script regex is valid"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b.*?</style>").expect("style regex is valid"));
static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br[ /]*>").expect("br regex is valid"));
static P_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p>").expect("p regex is valid"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex is valid"));
static NEWLINE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline regex is valid"));
static SPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("space regex is valid"));

/// Entity subset decoded after markup removal. `&amp;` goes last so a
/// literal `&amp;lt;` does not double-decode into `<`.
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Strip markup, scripts, and styles from raw HTML and normalize the
/// remaining text.
pub fn extract_text(html: &str) -> String {
    let s = SCRIPT_RE.replace_all(html, "");
    let s = STYLE_RE.replace_all(&s, "");
    let s = BR_RE.replace_all(&s, "\n");
    let s = P_CLOSE_RE.replace_all(&s, "\n\n");
    let s = TAG_RE.replace_all(&s, " ");
    // Unterminated tags leave a stray bracket behind
    let mut s = s.replace(['<', '>'], " ");

    for (entity, plain) in ENTITIES {
        s = s.replace(entity, plain);
    }

    let s = s.replace('\u{00A0}', " ");
    let s = NEWLINE_RUN_RE.replace_all(&s, "\n\n");
    let s = SPACE_RUN_RE.replace_all(&s, " ");
    s.trim().to_string()
}
