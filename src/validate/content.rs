//! Raw-text content policy and CSS isolation heuristics.
//!
//! These checks are textual: they run over the whole file (or the
//! concatenated top-level `<style>` text) and flag constructs that would make
//! a component depend on, or leak into, anything outside its own root.

use regex::Regex;
use std::sync::LazyLock;

static FULL_PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:!doctype|html|head|body)\b").expect("full page pattern"));
static EXTERNAL_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:src|href)\s*=\s*["']?\s*(?:[a-z][a-z0-9+.-]*:)?//"#)
        .expect("external attribute pattern")
});
static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@import\b").expect("import pattern"));
static FONT_FACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)@font-face\b").expect("font-face pattern"));
static EXTERNAL_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\burl\(\s*["']?\s*(?:[a-z][a-z0-9+.-]*:)?//"#).expect("url pattern")
});
// A selector starts at the beginning of the text or right after `,`, `{` or `}`.
static GLOBAL_SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[,{}])\s*(?:html|body|:root)(?:[^\w-]|$)")
        .expect("global selector pattern")
});
static UNIVERSAL_SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[,{}])\s*\*\s*(?:[,{]|$)").expect("universal selector pattern")
});

/// Full-document markers and external resource references.
pub(crate) fn check_forbidden_content(raw: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if FULL_PAGE_RE.is_match(raw) {
        errors.push("Must be HTML fragment (no doctype/html/head/body).".to_string());
    }
    if EXTERNAL_ATTR_RE.is_match(raw) {
        errors.push("External link detected in src/href.".to_string());
    }
    if IMPORT_RE.is_match(raw) {
        errors.push("CSS @import is not allowed.".to_string());
    }
    if FONT_FACE_RE.is_match(raw) {
        errors.push("CSS @font-face is not allowed.".to_string());
    }
    if EXTERNAL_URL_RE.is_match(raw) {
        errors.push("External url(...) is not allowed.".to_string());
    }

    errors
}

/// Selectors that escape the component root.
pub(crate) fn check_css_isolation(style_text: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if GLOBAL_SELECTOR_RE.is_match(style_text) {
        errors.push("Global selector detected in <style> (html/body/:root).".to_string());
    }
    if UNIVERSAL_SELECTOR_RE.is_match(style_text) {
        errors.push("Global selector \"*\" detected in <style>.".to_string());
    }
    errors
}
