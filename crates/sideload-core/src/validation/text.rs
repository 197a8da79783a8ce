//! Sanitizing of caller-supplied descriptive text.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)\s*>").expect("static regex")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[a-zA-Z/!?][^<>]*>").expect("static regex"));
static PERCENT_OCTET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[0-9a-fA-F]{2}").expect("static regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("static regex"));

/// Sanitize a single-line text field.
///
/// Removes script/style blocks and markup tags, escapes stray angle brackets,
/// drops percent-encoded octets and collapses whitespace into single spaces.
pub fn sanitize_text_field(input: &str) -> String {
    let mut out = input.to_string();

    if out.contains('<') {
        out = SCRIPT_OR_STYLE.replace_all(&out, "").into_owned();
        out = TAG.replace_all(&out, "").into_owned();
    }
    out = out.replace('<', "&lt;").replace('>', "&gt;");

    // Removing one octet can expose another ("%%4141").
    while PERCENT_OCTET.is_match(&out) {
        out = PERCENT_OCTET.replace_all(&out, "").into_owned();
    }

    WHITESPACE.replace_all(&out, " ").trim().to_string()
}
