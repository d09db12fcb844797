//! Canonical string construction.
//!
//! The canonical string is the exact byte sequence that gets signed:
//!
//! ```text
//! METHOD|PATH|TIMESTAMP
//! METHOD|PATH|TIMESTAMP|BODY
//! ```
//!
//! `METHOD` is uppercased, `PATH` is the request path as sent on the wire
//! (percent-encoded, without query string), `TIMESTAMP` is unix seconds and
//! `BODY` is the request payload rendered by [`canonical_json`].

use serde_json::Value;

/// Separator between canonical string fields.
pub const FIELD_SEPARATOR: char = '|';

/// Build the canonical string for a request.
///
/// An empty body is treated the same as no body, so `Some("")` does not add
/// a trailing separator.
///
/// # Examples
///
/// ```
/// use archetype_auth::canonical::build_canonical_string;
///
/// assert_eq!(
///     build_canonical_string("get", "/internal/archetype/A052-x", "1234567890", None),
///     "GET|/internal/archetype/A052-x|1234567890"
/// );
/// assert_eq!(
///     build_canonical_string("POST", "/p", "1", Some(r#"{"a":1}"#)),
///     r#"POST|/p|1|{"a":1}"#
/// );
/// ```
#[must_use]
pub fn build_canonical_string(
    method: &str,
    path: &str,
    timestamp: &str,
    body: Option<&str>,
) -> String {
    let method = method.to_ascii_uppercase();
    match body.filter(|b| !b.is_empty()) {
        Some(body) => format!(
            "{method}{FIELD_SEPARATOR}{path}{FIELD_SEPARATOR}{timestamp}{FIELD_SEPARATOR}{body}"
        ),
        None => format!("{method}{FIELD_SEPARATOR}{path}{FIELD_SEPARATOR}{timestamp}"),
    }
}

/// Serialize a JSON value with object keys sorted at every level and no
/// insignificant whitespace.
///
/// Key order is by Unicode code point, which for UTF-8 strings is plain byte
/// order. The output does not depend on whether `serde_json` was built with
/// `preserve_order`.
///
/// # Examples
///
/// ```
/// use archetype_auth::canonical::canonical_json;
///
/// let value = serde_json::json!({"b": 1, "a": {"d": [true, null], "c": "x"}});
/// assert_eq!(canonical_json(&value), r#"{"a":{"c":"x","d":[true,null]},"b":1}"#);
/// ```
#[must_use]
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // `Value`'s Display is compact and takes care of escaping.
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
