//! DOM contract of a component fragment.
//!
//! The fragment is parsed in a `<body>` context; only the top level of the
//! resulting tree matters. Exactly one non-auxiliary top-level element is the
//! component root (class `cmp`); `<style>` and `<script>` may sit beside it.

use scraper::{ElementRef, Html};

const ROOT_CLASS: &str = "cmp";
const AUXILIARY_TAGS: &[&str] = &["style", "script"];

/// Result of checking one fragment.
#[derive(Debug, Default)]
pub(crate) struct DomOutcome {
    pub errors: Vec<String>,
    /// Text of every top-level `<style>` element, newline-joined.
    pub style_text: String,
}

fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|value| value.split_whitespace().any(|token| token == class))
}

fn is_auxiliary(element: &ElementRef<'_>) -> bool {
    AUXILIARY_TAGS.contains(&element.value().name())
}

/// Check root count, root attributes, and stray top-level elements.
///
/// `manifest_id` is the manifest's `id` when it is a string; the root's
/// `data-cmp-id` is only compared when both sides are present.
pub(crate) fn check_dom(text: &str, manifest_id: Option<&str>) -> DomOutcome {
    let fragment = Html::parse_fragment(text);
    let top_level: Vec<ElementRef<'_>> = fragment
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .collect();

    let mut outcome = DomOutcome::default();

    let styles: Vec<String> = top_level
        .iter()
        .filter(|element| element.value().name() == "style")
        .map(|element| element.text().collect::<String>())
        .collect();
    outcome.style_text = styles.join("\n");

    let non_aux: Vec<&ElementRef<'_>> = top_level
        .iter()
        .filter(|element| !is_auxiliary(element))
        .collect();
    let roots: Vec<&ElementRef<'_>> = non_aux
        .iter()
        .copied()
        .filter(|element| has_class(element, ROOT_CLASS))
        .collect();

    if let [root] = roots.as_slice() {
        check_root(root, manifest_id, &mut outcome.errors);
    } else {
        outcome.errors.push(format!(
            "Expected exactly 1 component root element with class=\"{ROOT_CLASS}\"; found {}",
            roots.len()
        ));
    }

    let illegal: Vec<String> = non_aux
        .iter()
        .filter(|element| !has_class(element, ROOT_CLASS))
        .map(|element| format!("<{}>", element.value().name()))
        .collect();
    if !illegal.is_empty() {
        outcome.errors.push(format!(
            "Illegal extra top-level elements (only root + optional <style>/<script> allowed): {}",
            illegal.join(", ")
        ));
    }

    outcome
}

fn check_root(root: &ElementRef<'_>, manifest_id: Option<&str>, errors: &mut Vec<String>) {
    let element = root.value();

    match element.attr("data-cmp-id").filter(|value| !value.is_empty()) {
        None => errors.push("Root must have data-cmp-id=\"...\"".to_string()),
        Some(data_id) => {
            if let Some(manifest_id) = manifest_id.filter(|id| !id.is_empty()) {
                if manifest_id != data_id {
                    errors.push(format!(
                        "manifest.id does not match data-cmp-id (\"{manifest_id}\" vs \"{data_id}\")"
                    ));
                }
            }
        }
    }

    if element.attr("role") != Some("img") {
        errors.push("Root must have role=\"img\"".to_string());
    }

    if element
        .attr("aria-label")
        .is_none_or(|label| label.trim().is_empty())
    {
        errors.push("Root must have a non-empty aria-label".to_string());
    }
}
