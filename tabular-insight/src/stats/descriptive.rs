use serde::{Deserialize, Serialize};

/// Summary values of a non-empty numeric list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    /// Population standard deviation; `0.0` for a single value.
    pub std: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Statistics over a numeric list.
///
/// Either every summary value is present or none is: an empty list yields
/// `count == 0` and no [`DescriptiveStats`]. On the wire the record is flat,
/// `{count, min, max, avg, median, std, q1, q3, iqr}`, with `null` for the
/// values of an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "FlatStatistics", from = "FlatStatistics")]
pub struct StatisticsRecord {
    pub count: usize,
    pub summary: Option<DescriptiveStats>,
}

impl StatisticsRecord {
    /// The record of an empty list.
    pub fn empty() -> Self {
        Self {
            count: 0,
            summary: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
    }

    pub fn min(&self) -> Option<f64> {
        self.summary.map(|s| s.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.summary.map(|s| s.max)
    }

    pub fn avg(&self) -> Option<f64> {
        self.summary.map(|s| s.avg)
    }

    pub fn median(&self) -> Option<f64> {
        self.summary.map(|s| s.median)
    }

    pub fn std(&self) -> Option<f64> {
        self.summary.map(|s| s.std)
    }

    pub fn q1(&self) -> Option<f64> {
        self.summary.map(|s| s.q1)
    }

    pub fn q3(&self) -> Option<f64> {
        self.summary.map(|s| s.q3)
    }

    pub fn iqr(&self) -> Option<f64> {
        self.summary.map(|s| s.iqr)
    }
}

impl Default for StatisticsRecord {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Serialize, Deserialize)]
struct FlatStatistics {
    count: usize,
    min: Option<f64>,
    max: Option<f64>,
    avg: Option<f64>,
    median: Option<f64>,
    std: Option<f64>,
    q1: Option<f64>,
    q3: Option<f64>,
    iqr: Option<f64>,
}

impl From<StatisticsRecord> for FlatStatistics {
    fn from(record: StatisticsRecord) -> Self {
        Self {
            count: record.count,
            min: record.min(),
            max: record.max(),
            avg: record.avg(),
            median: record.median(),
            std: record.std(),
            q1: record.q1(),
            q3: record.q3(),
            iqr: record.iqr(),
        }
    }
}

impl From<FlatStatistics> for StatisticsRecord {
    fn from(flat: FlatStatistics) -> Self {
        let summary = match (
            flat.min, flat.max, flat.avg, flat.median, flat.std, flat.q1, flat.q3, flat.iqr,
        ) {
            (
                Some(min),
                Some(max),
                Some(avg),
                Some(median),
                Some(std),
                Some(q1),
                Some(q3),
                Some(iqr),
            ) if flat.count > 0 => Some(DescriptiveStats {
                min,
                max,
                avg,
                median,
                std,
                q1,
                q3,
                iqr,
            }),
            _ => None,
        };
        Self {
            count: if summary.is_some() { flat.count } else { 0 },
            summary,
        }
    }
}

/// Linear-interpolation quantile of an ascending-sorted slice.
///
/// For `pos = (n - 1) * q` the result interpolates between the values at
/// `floor(pos)` and `ceil(pos)`, `lo * (1 - frac) + hi * frac`, kept within
/// `[lo, hi]`. It is evaluated as `lo + (hi - lo) * frac`, which is monotone in
/// `q` under rounding, unless `hi - lo` overflows. `q <= 0` returns the
/// minimum and `q >= 1` the maximum.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let first = *sorted.first()?;
    let last = *sorted.last()?;
    if q <= 0.0 {
        return Some(first);
    }
    if q >= 1.0 {
        return Some(last);
    }

    let pos = (sorted.len() - 1) as f64 * q;
    let lo_index = pos.floor() as usize;
    let hi_index = (lo_index + 1).min(sorted.len() - 1);
    let frac = pos - lo_index as f64;

    let lo = sorted[lo_index];
    let hi = sorted[hi_index];
    if frac == 0.0 || lo == hi {
        return Some(lo);
    }
    let span = hi - lo;
    let interpolated = if span.is_finite() {
        lo + span * frac
    } else {
        lo * (1.0 - frac) + hi * frac
    };
    Some(interpolated.max(lo.min(hi)).min(lo.max(hi)))
}

/// Mean and population standard deviation of finite `values`.
///
/// When a plain sum or squared deviation overflows, both are recomputed over
/// values divided by `max(|min|, |max|)` and scaled back.
fn moments(values: &[f64], min: f64, max: f64) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    if mean.is_finite() && variance.is_finite() {
        return (mean.max(min).min(max), variance.sqrt());
    }

    let scale = min.abs().max(max.abs());
    let scaled_mean = values.iter().map(|v| v / scale).sum::<f64>() / n;
    let scaled_variance = values
        .iter()
        .map(|v| (v / scale - scaled_mean).powi(2))
        .sum::<f64>()
        / n;
    let mean = (scaled_mean * scale).max(min).min(max);
    let std = (scaled_variance.sqrt() * scale).min(f64::MAX);
    (mean, std)
}

/// Computes the [`StatisticsRecord`] of `values`.
///
/// Non-finite values are ignored. The mean is kept within `[min, max]` so
/// that summation rounding cannot push it outside the observed range.
pub fn compute_stats(values: &[f64]) -> StatisticsRecord {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return StatisticsRecord::empty();
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let min = sorted[0];
    let max = sorted[n - 1];
    let (mean, std) = moments(&sorted, min, max);

    // Each quantile falls back to an endpoint only if `sorted` were empty,
    // which was ruled out above.
    let q1 = quantile(&sorted, 0.25).unwrap_or(min);
    let median = quantile(&sorted, 0.5).unwrap_or(min);
    let q3 = quantile(&sorted, 0.75).unwrap_or(max);

    StatisticsRecord {
        count: n,
        summary: Some(DescriptiveStats {
            min,
            max,
            avg: mean,
            median,
            std,
            q1,
            q3,
            iqr: (q3 - q1).min(f64::MAX),
        }),
    }
}
