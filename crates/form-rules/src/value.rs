// File: src/value.rs
// Purpose: Dynamically typed values held by form fields

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value as a form library hands it to a validator
///
/// Form inputs are loosely typed: a text input yields a string, a number
/// input a number, a multi-select an array, and an untouched field nothing
/// at all. Validators work with the same truthiness and coercion rules the
/// browser applies to these values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy,
    /// everything else (including empty arrays and objects) is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::String(s) => !s.is_empty(),
            FieldValue::Array(_) | FieldValue::Object(_) => true,
        }
    }

    /// True only for the number zero (either sign)
    pub fn is_zero(&self) -> bool {
        matches!(self, FieldValue::Number(n) if *n == 0.0)
    }

    /// True for a non-empty string made only of whitespace
    pub fn is_blank_string(&self) -> bool {
        matches!(self, FieldValue::String(s) if !s.is_empty() && browser_trim(s).is_empty())
    }

    /// Numeric coercion, as the browser's `Number(value)`
    ///
    /// Strings are trimmed and parsed; an empty string is `0`, anything
    /// unparsable is `NaN`.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Null => 0.0,
            FieldValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            FieldValue::Number(n) => *n,
            FieldValue::String(s) => parse_number(s),
            FieldValue::Array(_) | FieldValue::Object(_) => f64::NAN,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Whitespace as the browser's `String.prototype.trim` sees it: Unicode
/// spaces and line terminators plus the byte order mark, but not U+0085
fn is_browser_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

fn browser_trim(s: &str) -> &str {
    s.trim_matches(is_browser_whitespace)
}

/// String to number conversion following the browser's `Number(string)`
fn parse_number(s: &str) -> f64 {
    let text = browser_trim(s);
    if text.is_empty() {
        return 0.0;
    }

    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&text[2..], radix);
    }

    // Rust also reads "inf", "infinity" and "nan"; the browser does not
    if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0, |acc: f64, c| {
            c.to_digit(radix).map(|digit| acc * radix as f64 + digit as f64)
        })
        .unwrap_or(f64::NAN)
}

/// Render a number the way it appears in messages: integral values drop
/// the fractional part (`100`, not `100.0`)
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => f.write_str(&format_number(*n)),
            FieldValue::String(s) => f.write_str(s),
            FieldValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                f.write_str(&parts.join(","))
            }
            FieldValue::Object(_) => f.write_str("[object Object]"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::Array(items)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(items) => {
                FieldValue::Array(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Object(
                map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_truthiness() {
        assert!(!FieldValue::Null.is_truthy());
        assert!(!FieldValue::from(false).is_truthy());
        assert!(!FieldValue::from(0).is_truthy());
        assert!(!FieldValue::from(f64::NAN).is_truthy());
        assert!(!FieldValue::from("").is_truthy());

        assert!(FieldValue::from(" ").is_truthy());
        assert!(FieldValue::from(-1).is_truthy());
        assert!(FieldValue::Array(vec![]).is_truthy());
        assert!(FieldValue::Object(BTreeMap::new()).is_truthy());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(FieldValue::from(" 42 ").as_number(), 42.0);
        assert_eq!(FieldValue::from("").as_number(), 0.0);
        assert_eq!(FieldValue::from(true).as_number(), 1.0);
        assert!(FieldValue::from("abc").as_number().is_nan());
        assert!(FieldValue::Array(vec![]).as_number().is_nan());
    }

    #[rstest]
    #[case::hex("0x10", 16.0)]
    #[case::hex_upper("0XfF", 255.0)]
    #[case::octal("0o7", 7.0)]
    #[case::binary("0b101", 5.0)]
    #[case::exponent(" 1e3 ", 1000.0)]
    #[case::leading_dot(".5", 0.5)]
    #[case::signed("-12.5", -12.5)]
    #[case::infinity("Infinity", f64::INFINITY)]
    #[case::plus_infinity("+Infinity", f64::INFINITY)]
    #[case::minus_infinity("-Infinity", f64::NEG_INFINITY)]
    #[case::bom_padded("\u{FEFF}7\u{FEFF}", 7.0)]
    fn test_browser_number_forms(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(FieldValue::from(text).as_number(), expected);
    }

    #[rstest]
    #[case::inf("inf")]
    #[case::lower_infinity("infinity")]
    #[case::upper_infinity("INFINITY")]
    #[case::nan("NaN")]
    #[case::signed_hex("-0x10")]
    #[case::empty_hex("0x")]
    #[case::bad_binary("0b2")]
    #[case::trailing_text("12px")]
    fn test_rejected_number_forms(#[case] text: &str) {
        assert!(FieldValue::from(text).as_number().is_nan(), "{:?}", text);
    }

    #[test]
    fn test_blank_string() {
        assert!(FieldValue::from(" \t\n").is_blank_string());
        assert!(FieldValue::from("\u{FEFF}").is_blank_string());
        assert!(FieldValue::from("\u{3000}").is_blank_string());
        assert!(!FieldValue::from("").is_blank_string());
        assert!(!FieldValue::from("\u{85}").is_blank_string());
        assert!(!FieldValue::from(" a ").is_blank_string());
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from(100).to_string(), "100");
        assert_eq!(FieldValue::from(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::from(-0.0).to_string(), "0");
        assert_eq!(FieldValue::Null.to_string(), "");
        assert_eq!(
            FieldValue::from(vec![FieldValue::from(1), FieldValue::from("a")]).to_string(),
            "1,a"
        );
    }

    #[test]
    fn test_from_json() {
        let value = FieldValue::from(serde_json::json!({"a": [1, "x", null]}));
        let FieldValue::Object(map) = value else {
            panic!("expected object");
        };
        assert_eq!(
            map["a"],
            FieldValue::Array(vec![
                FieldValue::Number(1.0),
                FieldValue::String("x".to_string()),
                FieldValue::Null,
            ])
        );
    }

    #[test]
    fn test_deserialize_untagged() {
        let value: FieldValue = serde_json::from_str("0").unwrap();
        assert!(value.is_zero());
        let value: FieldValue = serde_json::from_str("null").unwrap();
        assert_eq!(value, FieldValue::Null);
    }
}
