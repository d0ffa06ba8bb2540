//! Escaping for text embedded in generated JSX attributes.
//!
//! - `escape_attr()` - HTML entity escaping for plain string attributes
//! - `escape_js_string()` - body of a double-quoted JS string literal
//! - `escape_js_single()` - body of a single-quoted JS string literal

use std::borrow::Cow;

// =============================================================================
// HTML Escaping
// =============================================================================

/// Characters that require HTML escaping.
const ESCAPE_CHARS: [char; 5] = ['<', '>', '&', '"', '\''];

/// Get the HTML entity for a special character.
#[inline]
fn escape_char(c: char) -> Option<&'static str> {
    match c {
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '&' => Some("&amp;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#39;"),
        _ => None,
    }
}

/// Escape HTML attribute values (alt, title).
///
/// Uses `Cow` to avoid allocation when no escaping is needed.
///
/// # Example
/// ```ignore
/// assert_eq!(escape_attr("a \"b\""), "a &quot;b&quot;");
/// assert_eq!(escape_attr("hello"), "hello"); // No allocation
/// ```
#[inline]
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE_CHARS) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match escape_char(c) {
            Some(entity) => result.push_str(entity),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

// =============================================================================
// JS String Escaping
// =============================================================================

/// Escape a string for use inside a double-quoted JS string literal.
///
/// JSON string syntax is a subset of JS string syntax, so the JSON encoding
/// minus its surrounding quotes is a valid literal body.
pub fn escape_js_string(s: &str) -> String {
    let quoted = serde_json::Value::String(s.to_owned()).to_string();
    quoted[1..quoted.len() - 1].to_owned()
}

/// Escape a string for use inside a single-quoted JS string literal.
pub fn escape_js_single(s: &str) -> Cow<'_, str> {
    if !s.contains(['\\', '\'', '\n', '\r']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
