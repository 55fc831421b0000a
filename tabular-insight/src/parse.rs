//! Cell-level value classification.
//!
//! Every raw cell is classified as exactly one of [`ParsedValue::Missing`],
//! [`ParsedValue::Number`] or [`ParsedValue::Unparsable`]. Missing tokens are
//! checked first, so a lone `"-"` is missing rather than a failed negative
//! number.
//!
//! Numeric coercion is deliberately forgiving: commas and whitespace are
//! removed, then every character other than digits, `.` and `-` is dropped.
//! This strips currency symbols and percent signs (`"$1,234.50"` becomes
//! `1234.5`, `"12.5%"` becomes `12.5`) but also turns unit-suffixed values
//! like `"12kg"` into `12.0`. Tokens with several minus signs such as `"1-2"`
//! survive the stripping intact and then fail to parse.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ClassificationConfig;

/// Textual stand-ins for absent data, compared after trimming and lowercasing.
pub const MISSING_TOKENS: &[&str] = &[
    "",
    "na",
    "n/a",
    "nan",
    "null",
    "none",
    "-",
    "--",
    "\u{2014}",
    "not available",
    "n\\a",
];

/// Parsing policy shown alongside dataset summaries.
pub const SUMMARY_PARSING_NOTE: &str = "Numbers are parsed by treating NA/N/A/null/empty/'-' as missing; removing commas/spaces and symbols like $ and %.";

/// Parsing policy shown alongside single-column statistics.
pub const COLUMN_STATS_PARSING_NOTE: &str = "Parsing: treat NA/N/A/null/empty/'-' as missing; remove commas/spaces; remove symbols like $ and %; keep digits, dot, minus.";

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\s]").expect("separator pattern is valid"));

static NON_NUMERIC_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9.\-]").expect("numeric character pattern is valid"));

/// Outcome of classifying a single raw cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedValue {
    /// One of the [`MISSING_TOKENS`], or no value at all.
    Missing,
    /// Successfully coerced to a finite number.
    Number(f64),
    /// Present, but not coercible to a number.
    Unparsable,
}

/// Returns true if `raw` is absent or one of the missing tokens.
pub fn is_missing(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(text) => {
            let normalized = text.trim().to_lowercase();
            MISSING_TOKENS.contains(&normalized.as_str())
        }
    }
}

/// Coerces a non-missing raw value into a number, stripping formatting noise.
///
/// Returns `None` when nothing numeric remains, when the remainder is not a
/// valid float literal, or when it overflows to infinity.
pub fn parse_number(raw: &str) -> Option<f64> {
    let without_separators = SEPARATORS.replace_all(raw.trim(), "");
    let digits = NON_NUMERIC_CHARS.replace_all(&without_separators, "");

    if matches!(digits.as_ref(), "" | "-" | "." | "-.") {
        return None;
    }

    digits
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Classifies a raw cell value.
pub fn classify(raw: Option<&str>) -> ParsedValue {
    if is_missing(raw) {
        return ParsedValue::Missing;
    }
    match raw.and_then(parse_number) {
        Some(value) => ParsedValue::Number(value),
        None => ParsedValue::Unparsable,
    }
}

/// Numeric-vs-categorical classification of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Running per-column counts for one scan.
///
/// `missing + unparsable + parsed == rows` holds after every call to
/// [`ColumnTally::observe`].
#[derive(Debug, Clone, Default)]
pub struct ColumnTally {
    pub rows: usize,
    pub missing: usize,
    pub unparsable: usize,
    pub parsed: usize,
    values: Vec<f64>,
}

impl ColumnTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one cell and folds it into the counts.
    pub fn observe(&mut self, raw: Option<&str>) -> ParsedValue {
        let parsed = classify(raw);
        self.rows += 1;
        match parsed {
            ParsedValue::Missing => self.missing += 1,
            ParsedValue::Unparsable => self.unparsable += 1,
            ParsedValue::Number(value) => {
                self.parsed += 1;
                self.values.push(value);
            }
        }
        parsed
    }

    /// Number of present (non-missing) cells seen.
    pub fn non_missing(&self) -> usize {
        self.rows - self.missing
    }

    /// Fraction of non-missing cells that parsed; `0.0` with no non-missing cells.
    pub fn parse_ratio(&self) -> f64 {
        match self.non_missing() {
            0 => 0.0,
            present => self.parsed as f64 / present as f64,
        }
    }

    /// Classifies the column from the counts gathered so far.
    pub fn kind(&self, config: &ClassificationConfig) -> ColumnKind {
        if self.non_missing() == 0 {
            return ColumnKind::Categorical;
        }
        if self.parse_ratio() >= config.numeric_threshold
            && self.parsed >= config.min_numeric_values
        {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    /// Parsed values in scan order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tokens_are_case_insensitive() {
        for raw in ["NA", "n/a", "N/A", " ", "\u{2014}", "NULL", "None", "--", "Not Available", "n\\a"] {
            assert_eq!(classify(Some(raw)), ParsedValue::Missing, "{raw:?}");
        }
        assert_eq!(classify(None), ParsedValue::Missing);
    }

    #[test]
    fn test_dash_is_missing_not_negative() {
        assert_eq!(classify(Some("-")), ParsedValue::Missing);
        assert_eq!(classify(Some(" - ")), ParsedValue::Missing);
    }

    #[test]
    fn test_formatting_noise_is_stripped() {
        assert_eq!(classify(Some("$1,234.50")), ParsedValue::Number(1234.5));
        assert_eq!(classify(Some("12.5%")), ParsedValue::Number(12.5));
        assert_eq!(classify(Some(" 99 ")), ParsedValue::Number(99.0));
        assert_eq!(classify(Some("-3.25")), ParsedValue::Number(-3.25));
        assert_eq!(classify(Some("1 000")), ParsedValue::Number(1000.0));
        assert_eq!(classify(Some(".5")), ParsedValue::Number(0.5));
    }

    #[test]
    fn test_rejected_remainders_are_unparsable() {
        assert_eq!(classify(Some("$")), ParsedValue::Unparsable);
        assert_eq!(classify(Some("abc")), ParsedValue::Unparsable);
        assert_eq!(classify(Some("-.")), ParsedValue::Unparsable);
        assert_eq!(classify(Some("1.2.3")), ParsedValue::Unparsable);
    }

    #[test]
    fn test_stripping_heuristic_on_unit_suffixes() {
        // Unit suffixes are stripped silently; this is a known false positive.
        assert_eq!(classify(Some("12kg")), ParsedValue::Number(12.0));
        // Multiple minus signs survive stripping and fail to parse.
        assert_eq!(classify(Some("1-2")), ParsedValue::Unparsable);
    }

    #[test]
    fn test_overflowing_number_is_unparsable() {
        let huge = "9".repeat(400);
        assert_eq!(classify(Some(&huge)), ParsedValue::Unparsable);
    }

    #[test]
    fn test_tally_counts_sum_to_rows() {
        let mut tally = ColumnTally::new();
        for raw in ["$1,234.50", "12.5%", "N/A", "\u{2014}", "99", "n/a-ish"] {
            tally.observe(Some(raw));
        }
        assert_eq!(tally.rows, 6);
        assert_eq!(tally.missing, 2);
        assert_eq!(tally.unparsable, 1);
        assert_eq!(tally.parsed, 3);
        assert_eq!(tally.missing + tally.unparsable + tally.parsed, tally.rows);
        assert_eq!(tally.values(), &[1234.5, 12.5, 99.0]);
        assert!((tally.parse_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_column_kind_thresholds() {
        let config = ClassificationConfig::default();

        let tally_of = |parsed: usize, text: usize| {
            let mut tally = ColumnTally::new();
            for i in 0..parsed {
                tally.observe(Some(&i.to_string()));
            }
            for _ in 0..text {
                tally.observe(Some("text"));
            }
            tally
        };

        assert_eq!(tally_of(8, 2).kind(&config), ColumnKind::Numeric);
        assert_eq!(tally_of(3, 7).kind(&config), ColumnKind::Categorical);
        assert_eq!(tally_of(4, 0).kind(&config), ColumnKind::Categorical);
        assert_eq!(tally_of(7, 3).kind(&config), ColumnKind::Numeric);
        assert_eq!(ColumnTally::new().kind(&config), ColumnKind::Categorical);
    }

    #[test]
    fn test_all_missing_column_has_zero_ratio() {
        let mut tally = ColumnTally::new();
        tally.observe(Some("NA"));
        tally.observe(Some(""));
        assert_eq!(tally.parse_ratio(), 0.0);
        assert_eq!(tally.kind(&ClassificationConfig::default()), ColumnKind::Categorical);
    }
}
