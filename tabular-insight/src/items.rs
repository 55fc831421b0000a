//! Analytics over normalized marketplace item records.
//!
//! Records arrive already flattened (price, shipping, seller feedback and a
//! few grouping fields); this module only aggregates them. Numeric fields are
//! accepted either as JSON numbers or as numeric strings, anything else reads
//! as missing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::stats::{
    compute_histogram, compute_stats, FrequencyCounter, HistogramBin, KeyCount, StatisticsRecord,
    DEFAULT_HISTOGRAM_BINS,
};

/// Number of entries in each grouping ranking.
pub const TOP_GROUPS: usize = 7;

/// Label for records without a grouping value.
pub const ABSENT_GROUP: &str = "\u{2014}";

/// One normalized item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default, deserialize_with = "loose_f64")]
    pub price_value: Option<f64>,
    #[serde(default)]
    pub price_currency: Option<String>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub shipping_value: Option<f64>,
    #[serde(default)]
    pub shipping_currency: Option<String>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub seller_feedback: Option<f64>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub location_country: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn loose_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|v| v.is_finite()))
}

/// Decodes a JSON array of item records.
pub fn items_from_json(json: &str) -> Result<Vec<ItemRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Per-field counts of records lacking a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemMissingCounts {
    pub price_value: usize,
    pub shipping_value: usize,
    /// Records with neither a price nor a shipping cost.
    pub total: usize,
    pub seller_feedback: usize,
}

/// Histogram bins wrapped the way chart consumers expect them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BinnedValues {
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemHistograms {
    pub price: BinnedValues,
    pub total: BinnedValues,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemGroupings {
    pub conditions: Vec<KeyCount>,
    pub countries: Vec<KeyCount>,
    pub categories: Vec<KeyCount>,
}

/// Aggregates over a batch of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemAnalytics {
    pub count_items: usize,
    /// Most frequent currency, `""` when no record carries one.
    pub currency_most_common: String,
    pub missing: ItemMissingCounts,
    pub price: StatisticsRecord,
    pub shipping: StatisticsRecord,
    pub total: StatisticsRecord,
    pub seller_feedback: StatisticsRecord,
    pub hist: ItemHistograms,
    pub top: ItemGroupings,
}

fn group_key(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => ABSENT_GROUP,
    }
}

/// Computes [`ItemAnalytics`] for `items`.
///
/// An item's total is its price plus its shipping cost, where a missing side
/// counts as zero; the total is missing only when both sides are. The
/// currency of an item is its price currency, falling back to the shipping
/// currency.
#[instrument(skip(items), fields(items = items.len()))]
pub fn compute_item_analytics(items: &[ItemRecord]) -> Result<ItemAnalytics> {
    let mut prices = Vec::new();
    let mut shipping = Vec::new();
    let mut totals = Vec::new();
    let mut feedback = Vec::new();
    let mut missing = ItemMissingCounts::default();

    let mut currencies = FrequencyCounter::new();
    let mut conditions = FrequencyCounter::new();
    let mut countries = FrequencyCounter::new();
    let mut categories = FrequencyCounter::new();

    for item in items {
        let currency = item
            .price_currency
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(item.shipping_currency.as_deref())
            .unwrap_or_default()
            .trim();
        if !currency.is_empty() {
            currencies.add(currency);
        }

        match item.price_value {
            Some(price) => prices.push(price),
            None => missing.price_value += 1,
        }
        match item.shipping_value {
            Some(cost) => shipping.push(cost),
            None => missing.shipping_value += 1,
        }
        match (item.price_value, item.shipping_value) {
            (None, None) => missing.total += 1,
            (price, cost) => totals.push(price.unwrap_or(0.0) + cost.unwrap_or(0.0)),
        }
        match item.seller_feedback {
            Some(score) => feedback.push(score),
            None => missing.seller_feedback += 1,
        }

        conditions.add(group_key(item.condition.as_deref()));
        countries.add(group_key(item.location_country.as_deref()));
        categories.add(group_key(item.category.as_deref()));
    }

    debug!(
        prices = prices.len(),
        totals = totals.len(),
        currencies = currencies.len(),
        "Aggregated item fields"
    );

    Ok(ItemAnalytics {
        count_items: items.len(),
        currency_most_common: currencies.most_common().unwrap_or_default().to_string(),
        missing,
        price: compute_stats(&prices),
        shipping: compute_stats(&shipping),
        total: compute_stats(&totals),
        seller_feedback: compute_stats(&feedback),
        hist: ItemHistograms {
            price: BinnedValues {
                bins: compute_histogram(&prices, DEFAULT_HISTOGRAM_BINS)?,
            },
            total: BinnedValues {
                bins: compute_histogram(&totals, DEFAULT_HISTOGRAM_BINS)?,
            },
        },
        top: ItemGroupings {
            conditions: KeyCount::ranked(&conditions, TOP_GROUPS),
            countries: KeyCount::ranked(&countries, TOP_GROUPS),
            categories: KeyCount::ranked(&categories, TOP_GROUPS),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_numbers() {
        let items = items_from_json(
            r#"[
                {"price_value": 10, "shipping_value": "2.5", "seller_feedback": "n/a"},
                {"price_value": "abc", "shipping_value": null, "condition": "Used"},
                {"title": "ignored"}
            ]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].price_value, Some(10.0));
        assert_eq!(items[0].shipping_value, Some(2.5));
        assert_eq!(items[0].seller_feedback, None);
        assert_eq!(items[1].price_value, None);
        assert_eq!(items[2], ItemRecord::default());
    }

    #[test]
    fn test_invalid_json_is_a_serialization_error() {
        let err = items_from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::error::InsightError::Serialization(_)));
    }

    #[test]
    fn test_totals_and_missing_counts() {
        let items = vec![
            ItemRecord {
                price_value: Some(10.0),
                shipping_value: Some(5.0),
                price_currency: Some("USD".into()),
                ..Default::default()
            },
            ItemRecord {
                price_value: Some(20.0),
                shipping_currency: Some("EUR".into()),
                ..Default::default()
            },
            ItemRecord {
                shipping_currency: Some("EUR".into()),
                ..Default::default()
            },
        ];

        let analytics = compute_item_analytics(&items).unwrap();
        assert_eq!(analytics.count_items, 3);
        assert_eq!(analytics.currency_most_common, "EUR");
        assert_eq!(
            analytics.missing,
            ItemMissingCounts {
                price_value: 1,
                shipping_value: 2,
                total: 1,
                seller_feedback: 3,
            }
        );
        assert_eq!(analytics.total.count, 2);
        assert_eq!(analytics.total.min(), Some(15.0));
        assert_eq!(analytics.total.max(), Some(20.0));
        assert!(analytics.seller_feedback.is_empty());
        assert_eq!(analytics.hist.price.bins.len(), 10);
    }

    #[test]
    fn test_groupings_use_placeholder() {
        let items = vec![
            ItemRecord {
                condition: Some(" New ".into()),
                ..Default::default()
            },
            ItemRecord {
                condition: Some("New".into()),
                ..Default::default()
            },
            ItemRecord::default(),
        ];
        let analytics = compute_item_analytics(&items).unwrap();
        assert_eq!(
            analytics.top.conditions,
            vec![
                KeyCount { key: "New".into(), count: 2 },
                KeyCount { key: ABSENT_GROUP.into(), count: 1 },
            ]
        );
        assert_eq!(analytics.currency_most_common, "");
        assert!(analytics.hist.total.bins.is_empty());
    }
}
