//! Display formatting for prices, percentages and large numbers.
//!
//! The health API sends figures either as JSON numbers or as pre-formatted
//! strings, and sometimes as `null`. Every formatter here accepts any of the
//! three through [`RawValue`] and degrades to an empty string instead of
//! failing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fraction digits used by [`number_to_money`] callers that have no preference.
pub const DEFAULT_MONEY_DECIMALS: usize = 2;

/// Maximum fraction digits kept by [`format_large_number`].
const LARGE_NUMBER_MAX_FRACTION: usize = 3;

/// A figure as it arrives from the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// JSON `null` or a missing figure.
    #[default]
    Null,
    /// A JSON number.
    Number(f64),
    /// A JSON string, possibly numeric.
    Text(String),
}

impl RawValue {
    /// Numeric view of the value, parsing text when needed.
    ///
    /// Returns `None` for `Null`, non-numeric text and non-finite numbers.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Null => return None,
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// Whether the value is `Null` or an empty string.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Number(_) => false,
            Self::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! raw_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawValue {
                fn from(n: $t) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

raw_from_number!(f64, f32, i32, i64, u32, u64, usize);

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for RawValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Group a number en-US style (`1,234,567.25`).
///
/// Rounds to `max_fraction` digits, then drops trailing zeros down to
/// `min_fraction` digits.
fn group_en_us(value: f64, min_fraction: usize, max_fraction: usize) -> String {
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut frac = frac_part.to_string();
    while frac.len() > min_fraction && frac.ends_with('0') {
        frac.pop();
    }

    let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 1);
    let is_zero = int_part.bytes().all(|b| b == b'0') && frac.bytes().all(|b| b == b'0');
    if value < 0.0 && !is_zero {
        out.push('-');
    }

    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Format a number with thousands separators.
///
/// Keeps up to three fraction digits. `Null` and non-numeric text give `""`.
#[must_use]
pub fn format_large_number(value: impl Into<RawValue>) -> String {
    value
        .into()
        .as_number()
        .map(|n| group_en_us(n, 0, LARGE_NUMBER_MAX_FRACTION))
        .unwrap_or_default()
}

/// Prefix a figure with a dollar sign, verbatim.
#[must_use]
pub fn add_usd(value: impl Into<RawValue>) -> String {
    let value = value.into();
    if value.is_blank() {
        return String::new();
    }
    format!("${value}")
}

/// Format a figure as money with exactly `decimals` fraction digits.
#[must_use]
pub fn number_to_money(value: impl Into<RawValue>, decimals: usize) -> String {
    value
        .into()
        .as_number()
        .map(|n| group_en_us(n, decimals, decimals))
        .unwrap_or_default()
}

/// Suffix a figure with a percent sign, verbatim.
#[must_use]
pub fn format_percent(value: impl Into<RawValue>) -> String {
    let value = value.into();
    if value.is_blank() {
        return String::new();
    }
    format!("{value}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(RawValue::from(1_234_567), "1,234,567" ; "integer")]
    #[test_case(RawValue::from(0), "0" ; "zero")]
    #[test_case(RawValue::from(999), "999" ; "no separator needed")]
    #[test_case(RawValue::from(1000), "1,000" ; "first separator")]
    #[test_case(RawValue::from(1234.5678), "1,234.568" ; "rounds to three digits")]
    #[test_case(RawValue::from(-9_876_543.2), "-9,876,543.2" ; "negative")]
    #[test_case(RawValue::from("2500000"), "2,500,000" ; "numeric text")]
    #[test_case(RawValue::from(" 42.10 "), "42.1" ; "padded text")]
    #[test_case(RawValue::from("n/a"), "" ; "non numeric text")]
    #[test_case(RawValue::Null, "" ; "null")]
    fn test_format_large_number(value: RawValue, expected: &str) {
        assert_eq!(format_large_number(value), expected);
    }

    #[test]
    fn test_format_large_number_option() {
        assert_eq!(format_large_number(Some(1_234_567_u64)), "1,234,567");
        assert_eq!(format_large_number(None::<f64>), "");
    }

    #[test_case(RawValue::from("3.5"), 2, "3.50" ; "pads decimals")]
    #[test_case(RawValue::from(1234.5), 2, "1,234.50" ; "groups thousands")]
    #[test_case(RawValue::from(0.123_456), 4, "0.1235" ; "rounds")]
    #[test_case(RawValue::from(7), 0, "7" ; "no decimals")]
    #[test_case(RawValue::from("abc"), 2, "" ; "unparseable")]
    #[test_case(RawValue::Null, 2, "" ; "null")]
    fn test_number_to_money(value: RawValue, decimals: usize, expected: &str) {
        assert_eq!(number_to_money(value, decimals), expected);
    }

    #[test]
    fn test_number_to_money_default_decimals() {
        assert_eq!(number_to_money(12, DEFAULT_MONEY_DECIMALS), "12.00");
    }

    #[test_case(RawValue::from(5), "$5" ; "integer")]
    #[test_case(RawValue::from(0.25), "$0.25" ; "fraction")]
    #[test_case(RawValue::from("3.50"), "$3.50" ; "text kept verbatim")]
    #[test_case(RawValue::from(""), "" ; "empty text")]
    #[test_case(RawValue::Null, "" ; "null")]
    fn test_add_usd(value: RawValue, expected: &str) {
        assert_eq!(add_usd(value), expected);
    }

    #[test_case(RawValue::from(42), "42%" ; "integer")]
    #[test_case(RawValue::from(99.95), "99.95%" ; "fraction")]
    #[test_case(RawValue::from("100"), "100%" ; "text")]
    #[test_case(RawValue::from(0), "0%" ; "zero is not blank")]
    #[test_case(RawValue::from(""), "" ; "empty text")]
    #[test_case(RawValue::Null, "" ; "null")]
    fn test_format_percent(value: RawValue, expected: &str) {
        assert_eq!(format_percent(value), expected);
    }

    #[test]
    fn test_raw_value_deserializes_untagged() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[null, 1.5, "2"]"#).unwrap();
        assert_eq!(
            values,
            vec![RawValue::Null, RawValue::Number(1.5), RawValue::Text("2".into())]
        );
    }

    #[test]
    fn test_raw_value_as_number() {
        assert_eq!(RawValue::from("12.5").as_number(), Some(12.5));
        assert_eq!(RawValue::Number(f64::NAN).as_number(), None);
        assert_eq!(RawValue::Null.as_number(), None);
    }
}
