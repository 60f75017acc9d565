// src/extractors/normalize.rs
//! Token normalization. Both functions are total: anything that doesn't fit
//! the grammar comes back as `None`, never as an error or a zero.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// Optional minus, digits, optional fraction. No exponent, no leading '+', no bare '.5'.
static NUMERIC_LITERAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?$").expect("Failed to compile NUMERIC_LITERAL_RE")
});

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

// Month-first ahead of day-first for all-numeric dates.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

/// Parses a token that fully matches the numeric-literal grammar.
pub fn parse_numeric(token: &str) -> Option<f64> {
    if !NUMERIC_LITERAL_RE.is_match(token) {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Best-effort date parse. Yearless or ambiguous text yields `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok().map(|dt| dt.date()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        })
}

/// Scans whitespace-separated tokens from the right and returns the first numeric one.
pub fn last_numeric_token(text: &str) -> Option<f64> {
    text.split_whitespace().rev().find_map(parse_numeric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_numeric_grammar() {
        assert_eq!(parse_numeric("0.00427"), Some(0.00427));
        assert_eq!(parse_numeric("-12"), Some(-12.0));
        assert_eq!(parse_numeric("1191603"), Some(1191603.0));
        assert_eq!(parse_numeric("0"), Some(0.0));

        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("1e5"), None);
        assert_eq!(parse_numeric("+3"), None);
        assert_eq!(parse_numeric(".5"), None);
        assert_eq!(parse_numeric("5."), None);
        assert_eq!(parse_numeric("1,000"), None);
        assert_eq!(parse_numeric("12%"), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 12);
        assert_eq!(parse_date("2025-09-12"), expected);
        assert_eq!(parse_date(" 2025-09-12 "), expected);
        assert_eq!(parse_date("2025-09-12 10:00:00"), expected);
        assert_eq!(parse_date("2025/09/12"), expected);
        assert_eq!(parse_date("09/12/2025"), expected);
        assert_eq!(parse_date("12 Sep 2025"), expected);
        assert_eq!(parse_date("Sep 12, 2025"), expected);
    }

    #[test]
    fn test_parse_date_failures_are_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("11 Sep"), None);
        assert_eq!(parse_date("11 Sep to 15 Sep"), None);
        assert_eq!(parse_date("2025-13-45"), None);
        assert_eq!(parse_date("Section Header Only"), None);
    }

    #[test]
    fn test_last_numeric_token_prefers_rightmost() {
        assert_eq!(last_numeric_token("1191603 1189884 0.00427"), Some(0.00427));
        assert_eq!(last_numeric_token("foo 12 bar n/a"), Some(12.0));
        assert_eq!(last_numeric_token("no numbers here"), None);
        assert_eq!(last_numeric_token(""), None);
    }

    proptest! {
        #[test]
        fn prop_parse_numeric_is_total(s in "\\PC*") {
            if let Some(v) = parse_numeric(&s) {
                prop_assert_eq!(Some(v), s.parse::<f64>().ok());
            }
        }

        #[test]
        fn prop_decimal_literals_roundtrip(int in -1_000_000i64..1_000_000, frac in 0u32..100_000) {
            let token = format!("{}.{}", int, frac);
            prop_assert_eq!(parse_numeric(&token), token.parse::<f64>().ok());
        }
    }
}
