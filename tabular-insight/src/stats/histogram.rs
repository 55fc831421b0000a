use serde::{Deserialize, Serialize};

use crate::error::{InsightError, Result};

/// Bin count used when a caller does not choose one.
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// One equal-width histogram bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Lower edge of the bin.
    pub from: f64,
    /// Upper edge of the bin.
    pub to: f64,
    /// Number of values assigned to the bin.
    pub count: usize,
}

impl HistogramBin {
    /// Axis label with both edges rounded to integers, e.g. `"10-20"`.
    pub fn label(&self) -> String {
        format!("{:.0}-{:.0}", self.from, self.to)
    }
}

/// Builds `bins` equal-width bins covering `[min(values), max(values)]`.
///
/// A value lands in bin `floor((v - min) / width)`, clamped to the last bin so
/// that the maximum is always counted there despite rounding. When every value
/// is equal the result is a single bin `[v, v]` holding all of them. Empty
/// input produces no bins and non-finite values are skipped.
///
/// # Errors
///
/// Returns [`InsightError::InvalidInput`] when `bins` is zero.
pub fn compute_histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(InsightError::invalid_input("histogram needs at least one bin"));
    }

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some(&first) = finite.first() else {
        return Ok(Vec::new());
    };
    let (min, max) = finite
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if min == max {
        return Ok(vec![HistogramBin {
            from: min,
            to: max,
            count: finite.len(),
        }]);
    }

    // Dividing before subtracting keeps the width finite when `max - min`
    // overflows.
    let mut width = max / bins as f64 - min / bins as f64;
    if !(width > 0.0) || !width.is_finite() {
        width = 1.0;
    }

    let mut counts = vec![0usize; bins];
    for &v in &finite {
        let offset = v - min;
        let index = if offset.is_finite() {
            (offset / width).floor()
        } else {
            (v / width - min / width).floor()
        };
        let index = if index.is_nan() || index < 0.0 {
            0
        } else {
            (index as usize).min(bins - 1)
        };
        counts[index] += 1;
    }

    let edge = |i: usize| {
        let t = i as f64 / bins as f64;
        min * (1.0 - t) + max * t
    };
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            from: edge(i),
            to: edge(i + 1),
            count,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_are_conserved() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = compute_histogram(&values, 10).unwrap();
        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(bins[0].from, 0.0);
        assert!((bins[9].to - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let bins = compute_histogram(&[0.0, 0.1, 0.3, 0.7], 3).unwrap();
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
    }

    #[test]
    fn test_extreme_range_keeps_finite_edges() {
        let bins = compute_histogram(&[-1e308, 1e308, 0.0], 4).unwrap();
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].from, -1e308);
        assert_eq!(bins[3].to, 1e308);
        assert!(bins.windows(2).all(|w| w[0].to == w[1].from));
        assert!(bins.iter().all(|b| b.from.is_finite() && b.to.is_finite()));

        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 1]);
    }

    #[test]
    fn test_constant_values_make_one_bin() {
        let bins = compute_histogram(&[5.0, 5.0, 5.0], 10).unwrap();
        assert_eq!(
            bins,
            vec![HistogramBin {
                from: 5.0,
                to: 5.0,
                count: 3
            }]
        );
    }

    #[test]
    fn test_empty_and_invalid_inputs() {
        assert!(compute_histogram(&[], 10).unwrap().is_empty());
        assert!(compute_histogram(&[1.0], 0).is_err());
    }

    #[test]
    fn test_label_rounds_edges() {
        let bin = HistogramBin {
            from: 9.6,
            to: 20.2,
            count: 1,
        };
        assert_eq!(bin.label(), "10-20");
    }
}
