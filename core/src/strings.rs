//! # String Utilities
//!
//! Text cleanup for descriptions and examples, and identifier normalization
//! used to derive `operationId`s from folder and request names.

/// Cleans free text copied out of a Postman collection.
///
/// Trims surrounding whitespace, escapes double quotes as `&quot;` and unwraps a
/// single enclosing `<p>...</p>` pair. The paragraph wrapper is kept when the
/// inner text contains another `<p>` or `</p>`, since stripping it would break
/// the markup.
pub fn string_formatting(text: &str) -> String {
    let escaped = text.trim().replace('"', "&quot;");

    if let Some(inner) = escaped
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        if !inner.contains("<p>") && !inner.contains("</p>") {
            return inner.to_string();
        }
    }

    escaped
}

/// Converts free text into a camelCase identifier token.
///
/// Characters other than alphanumerics, spaces and underscores are removed, the
/// remainder is split on runs of spaces/underscores, the first word is
/// lowercased and every following word is capitalized.
///
/// A leading separator produces an empty first word, so `" get device"`
/// becomes `"GetDevice"`.
pub fn to_camel_case(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();

    let mut words = split_words(&cleaned).into_iter();
    let mut out = words.next().map(str::to_lowercase).unwrap_or_default();
    for word in words {
        out.push_str(&capitalize(word));
    }
    out
}

/// Splits on runs of spaces/underscores, keeping empty words at the edges.
fn split_words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut in_separator = false;

    for (idx, c) in text.char_indices() {
        let is_sep = c == ' ' || c == '_';
        if is_sep && !in_separator {
            words.push(&text[start..idx]);
            in_separator = true;
        } else if !is_sep && in_separator {
            start = idx;
            in_separator = false;
        }
    }
    if in_separator {
        words.push("");
    } else {
        words.push(&text[start..]);
    }
    words
}

/// Uppercases the first character and lowercases the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
