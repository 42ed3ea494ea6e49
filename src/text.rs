use std::sync::LazyLock;

use regex::Regex;

static ISOFORM_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-\d+$").unwrap());

pub fn truncate_before<'a>(text: &'a str, marker: &str) -> &'a str {
    match text.find(marker) {
        Some(pos) => &text[..pos],
        None => text,
    }
}

pub fn extract_bracketed(text: &str) -> &str {
    let Some(open) = text.find('[') else {
        return "";
    };
    let rest = &text[open + 1..];
    match rest.find(']') {
        Some(close) => &rest[..close],
        None => "",
    }
}

pub fn extract_species_tagged_token<'a>(sentence: &'a str, tag: &str) -> Option<&'a str> {
    sentence
        .split_whitespace()
        .find(|token| token.contains(tag))
        .map(extract_bracketed)
}

pub fn strip_isoform_suffix(id: &str) -> &str {
    match ISOFORM_SUFFIX.find(id) {
        Some(found) => &id[..found.start()],
        None => id,
    }
}

pub fn split_list(text: &str, separator: char) -> Vec<&str> {
    text.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}
