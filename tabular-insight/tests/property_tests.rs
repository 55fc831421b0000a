//! Property-based tests for the statistics kernel and the value parser.
//!
//! Each block states an invariant that must hold for every input:
//! - quartiles and the mean stay ordered within `[min, max]`
//! - quantiles return the endpoints at and beyond `q = 0` and `q = 1`
//! - histogram bins conserve the number of values and span `[min, max]`
//! - statistics stay finite for values near the edge of `f64`
//! - rankings are sorted by count and never exceed their limit
//! - cell classification is total and missing tokens never parse

use proptest::prelude::*;
use tabular_insight::parse::{classify, ColumnTally, ParsedValue, MISSING_TOKENS};
use tabular_insight::stats::{compute_histogram, compute_stats, quantile, top_n, FrequencyCounter};

fn finite_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e9f64..1.0e9, 1..200)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_summary_values_are_ordered(values in finite_values()) {
        let record = compute_stats(&values);
        let s = record.summary.unwrap();
        prop_assert_eq!(record.count, values.len());
        prop_assert!(s.min <= s.q1);
        prop_assert!(s.q1 <= s.median);
        prop_assert!(s.median <= s.q3);
        prop_assert!(s.q3 <= s.max);
        prop_assert!(s.min <= s.avg && s.avg <= s.max);
        prop_assert!(s.std >= 0.0);
        prop_assert!(s.iqr >= 0.0);
    }

    #[test]
    fn test_quantile_endpoints(mut values in finite_values(), q in 1.0f64..10.0) {
        values.sort_by(f64::total_cmp);
        let first = values[0];
        let last = values[values.len() - 1];
        prop_assert_eq!(quantile(&values, 0.0), Some(first));
        prop_assert_eq!(quantile(&values, -q), Some(first));
        prop_assert_eq!(quantile(&values, 1.0), Some(last));
        prop_assert_eq!(quantile(&values, q), Some(last));
    }

    #[test]
    fn test_histogram_conserves_counts(values in finite_values(), bins in 1usize..50) {
        let histogram = compute_histogram(&values, bins).unwrap();
        let total: usize = histogram.iter().map(|b| b.count).sum();
        prop_assert_eq!(total, values.len());
        prop_assert!(histogram.len() == bins || histogram.len() == 1);
    }

    #[test]
    fn test_histogram_spans_the_range(values in finite_values(), bins in 1usize..50) {
        let histogram = compute_histogram(&values, bins).unwrap();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let first = histogram.first().unwrap();
        let last = histogram.last().unwrap();
        prop_assert_eq!(first.from, min);
        prop_assert_eq!(last.to, max);
        // the maximum is always counted in the last bin
        prop_assert!(last.count >= 1);
    }

    #[test]
    fn test_extreme_magnitudes_stay_finite(
        values in prop::collection::vec(-1.0e308f64..1.0e308, 1..50),
        bins in 1usize..20,
    ) {
        let s = compute_stats(&values).summary.unwrap();
        for stat in [s.min, s.max, s.avg, s.median, s.std, s.q1, s.q3, s.iqr] {
            prop_assert!(stat.is_finite());
        }
        prop_assert!(s.q1 <= s.median && s.median <= s.q3);

        let histogram = compute_histogram(&values, bins).unwrap();
        prop_assert!(histogram.iter().all(|b| b.from.is_finite() && b.to.is_finite()));
        prop_assert_eq!(histogram.iter().map(|b| b.count).sum::<usize>(), values.len());
    }

    #[test]
    fn test_rankings_are_sorted(keys in prop::collection::vec("[a-e]", 0..100), limit in 0usize..8) {
        let mut counter = FrequencyCounter::new();
        for key in &keys {
            counter.add(key);
        }
        let ranked = top_n(&counter, limit);
        prop_assert!(ranked.len() <= limit);
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_classification_is_total(cells in prop::collection::vec(".{0,12}", 0..100)) {
        let mut tally = ColumnTally::new();
        for cell in &cells {
            tally.observe(Some(cell.as_str()));
        }
        prop_assert_eq!(tally.missing + tally.unparsable + tally.parsed, cells.len());
        prop_assert!(tally.values().iter().all(|v| v.is_finite()));
        let ratio = tally.parse_ratio();
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    #[test]
    fn test_missing_tokens_never_parse(index in 0usize..MISSING_TOKENS.len(), pad in "[ \t]{0,3}", upper in any::<bool>()) {
        let token = MISSING_TOKENS[index];
        let token = if upper { token.to_uppercase() } else { token.to_string() };
        let cell = format!("{pad}{token}{pad}");
        prop_assert_eq!(classify(Some(cell.as_str())), ParsedValue::Missing);
    }

    #[test]
    fn test_formatted_integers_parse(n in 0u32..10_000_000) {
        let cell = format!("${}", n.to_string().as_bytes().rchunks(3).rev()
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect::<Vec<_>>()
            .join(","));
        prop_assert_eq!(classify(Some(cell.as_str())), ParsedValue::Number(f64::from(n)));
    }
}
