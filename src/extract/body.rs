// src/extract/body.rs

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::trace;

use super::types::BodyValue;

// A double-quoted JSON string. Every pass below matches it first and writes it
// back untouched, so the rewrites only apply outside string literals.
const STRING: &str = r#""(?:[^"\\]|\\.)*""#;

static COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}|//[^\n]*|(?s:/\*.*?\*/)", STRING))
        .expect("comment regex should compile")
});
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}|,(\s*[}}\]])", STRING)).expect("trailing comma regex should compile")
});
// `{ a: 5 }` style keys, only directly after an opening brace or a comma
static BARE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{}|([{{,]\s*)([A-Za-z_$][A-Za-z0-9_$]*)(\s*:)",
        STRING
    ))
    .expect("bare key regex should compile")
});

fn replace_outside_strings<'t>(re: &Regex, text: &'t str, rep: &str) -> Cow<'t, str> {
    re.replace_all(text, |caps: &Captures| {
        if caps[0].starts_with('"') {
            caps[0].to_string()
        } else {
            let mut out = String::new();
            caps.expand(rep, &mut out);
            out
        }
    })
}

/// Turn the inside of a `{ ... }` argument into strict JSON text.
///  - drops `//` and `/* */` comments
///  - drops trailing commas before a closing brace/bracket
///  - quotes bare identifier keys
///
/// String literals pass through unchanged.
pub fn clean_body(inner: &str) -> String {
    let text = format!("{{{}}}", inner.trim());
    let text = replace_outside_strings(&COMMENT, &text, "");
    let text = replace_outside_strings(&TRAILING_COMMA, &text, "$1");
    replace_outside_strings(&BARE_KEY, &text, r#"${1}"${2}"${3}"#).into_owned()
}

/// Parse a record body into `(key, value)` pairs.
pub fn parse_body(inner: &str) -> Result<Vec<(String, BodyValue)>, serde_json::Error> {
    let cleaned = clean_body(inner);
    trace!(body = %cleaned, "parsing record body");
    let map: Map<String, Value> = serde_json::from_str(&cleaned)?;
    Ok(map
        .iter()
        .map(|(k, v)| (k.clone(), BodyValue::from(v)))
        .collect())
}
