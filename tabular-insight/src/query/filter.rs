//! Row filters applied to previewed pages.
//!
//! Filtering happens on rows that were already read, so it never widens a
//! scan: a filtered preview shows the matching subset of one page.

use serde::{Deserialize, Serialize};

use crate::parse::{classify, ParsedValue};
use crate::scanner::Row;

/// Predicate over decoded rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RowFilter {
    /// Case-insensitive substring match on one column, or on any column when
    /// `column` is `None`. Blank text matches every row.
    Contains {
        column: Option<String>,
        text: String,
    },
    /// Inclusive numeric bounds on one column.
    ///
    /// Cells are parsed like any other numeric cell; rows whose cell does not
    /// parse are dropped. Without either bound every row passes.
    Range {
        column: String,
        min: Option<f64>,
        max: Option<f64>,
    },
}

impl RowFilter {
    pub fn contains(column: Option<&str>, text: impl Into<String>) -> Self {
        RowFilter::Contains {
            column: column.map(str::to_string),
            text: text.into(),
        }
    }

    pub fn range(column: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        RowFilter::Range {
            column: column.into(),
            min,
            max,
        }
    }

    /// Returns true if `row` passes the filter.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            RowFilter::Contains { column, text } => {
                let needle = text.trim().to_lowercase();
                if needle.is_empty() {
                    return true;
                }
                match column {
                    Some(name) => row
                        .get(name)
                        .is_some_and(|value| value.to_lowercase().contains(&needle)),
                    None => row
                        .values()
                        .iter()
                        .any(|value| value.to_lowercase().contains(&needle)),
                }
            }
            RowFilter::Range { column, min, max } => {
                if min.is_none() && max.is_none() {
                    return true;
                }
                let ParsedValue::Number(value) = classify(row.get(column)) else {
                    return false;
                };
                min.map_or(true, |lo| value >= lo) && max.map_or(true, |hi| value <= hi)
            }
        }
    }

    /// Keeps the rows of `rows` that match, in order.
    pub fn apply<'a, I>(&self, rows: I) -> Vec<Row>
    where
        I: IntoIterator<Item = &'a Row>,
    {
        rows.into_iter().filter(|row| self.matches(row)).cloned().collect()
    }

    /// Short human-readable form, e.g. `range: [10, +inf]` or the search text.
    pub fn describe(&self) -> String {
        match self {
            RowFilter::Contains { text, .. } => text.clone(),
            RowFilter::Range { min, max, .. } => {
                let lo = min.map_or_else(|| "-inf".to_string(), |v| v.to_string());
                let hi = max.map_or_else(|| "+inf".to_string(), |v| v.to_string());
                format!("range: [{lo}, {hi}]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn rows() -> Vec<Row> {
        let columns: Arc<[String]> = vec!["title".to_string(), "price".to_string()].into();
        [("Red Lamp", "$10"), ("blue chair", "25.5"), ("Lamp shade", "n/a"), ("Desk", "40")]
            .iter()
            .map(|(t, p)| Row::new(Arc::clone(&columns), vec![t.to_string(), p.to_string()]))
            .collect()
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let rows = rows();
        let hits = RowFilter::contains(Some("title"), " LAMP ").apply(&rows);
        assert_eq!(hits.len(), 2);

        let anywhere = RowFilter::contains(None, "25").apply(&rows);
        assert_eq!(anywhere.len(), 1);
        assert_eq!(RowFilter::contains(None, "  ").apply(&rows).len(), 4);
        assert!(RowFilter::contains(Some("nope"), "lamp").apply(&rows).is_empty());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let rows = rows();
        let hits = RowFilter::range("price", Some(10.0), Some(25.5)).apply(&rows);
        let titles: Vec<_> = hits.iter().map(|r| r.get("title").unwrap()).collect();
        assert_eq!(titles, vec!["Red Lamp", "blue chair"]);

        assert_eq!(RowFilter::range("price", Some(30.0), None).apply(&rows).len(), 1);
        assert_eq!(RowFilter::range("price", None, None).apply(&rows).len(), 4);
    }

    #[test]
    fn test_describe() {
        assert_eq!(RowFilter::range("price", Some(10.0), None).describe(), "range: [10, +inf]");
        assert_eq!(RowFilter::range("price", None, Some(2.5)).describe(), "range: [-inf, 2.5]");
        assert_eq!(RowFilter::contains(None, "lamp").describe(), "lamp");
    }
}
