use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Counts occurrences of string keys, remembering first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, usize)>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `key`.
    pub fn add(&mut self, key: &str) {
        self.add_many(key, 1);
    }

    /// Adds `count` occurrences of `key`.
    pub fn add_many(&mut self, key: &str, count: usize) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += count,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), count));
            }
        }
    }

    pub fn get(&self, key: &str) -> usize {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-occurrence order.
    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    /// The most frequent key, ties resolved by first occurrence.
    pub fn most_common(&self) -> Option<&str> {
        top_n(self, 1).into_iter().next().map(|(key, _)| key)
    }
}

/// The `n` most frequent keys, highest count first.
///
/// Keys with equal counts keep the order in which they were first seen, so
/// the ranking is reproducible for a given input order.
pub fn top_n(counter: &FrequencyCounter, n: usize) -> Vec<(&str, usize)> {
    let mut ranked: Vec<(&str, usize)> = counter
        .entries
        .iter()
        .map(|(key, count)| (key.as_str(), *count))
        .collect();
    // Stable sort keeps first-occurrence order among ties.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// A ranking as parallel label/count lists, for chart consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopValues {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

impl TopValues {
    /// Ranks `counter` and keeps the first `n` entries.
    pub fn from_counter(counter: &FrequencyCounter, n: usize) -> Self {
        let (labels, counts) = top_n(counter, n)
            .into_iter()
            .map(|(key, count)| (key.to_string(), count))
            .unzip();
        Self { labels, counts }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A ranking entry as a keyed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCount {
    pub key: String,
    pub count: usize,
}

impl KeyCount {
    /// Ranks `counter` into keyed records.
    pub fn ranked(counter: &FrequencyCounter, n: usize) -> Vec<Self> {
        top_n(counter, n)
            .into_iter()
            .map(|(key, count)| Self {
                key: key.to_string(),
                count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_of(keys: &[&str]) -> FrequencyCounter {
        let mut counter = FrequencyCounter::new();
        for key in keys {
            counter.add(key);
        }
        counter
    }

    #[test]
    fn test_top_values_ranking() {
        let counter = counter_of(&["a", "b", "a", "c", "b", "a"]);
        let top = TopValues::from_counter(&counter, 2);
        assert_eq!(top.labels, vec!["a", "b"]);
        assert_eq!(top.counts, vec![3, 2]);
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let counter = counter_of(&["x", "y", "z", "y", "z", "x", "w"]);
        let ranked = top_n(&counter, 4);
        assert_eq!(ranked, vec![("x", 2), ("y", 2), ("z", 2), ("w", 1)]);
    }

    #[test]
    fn test_counter_bookkeeping() {
        let mut counter = counter_of(&["a", "b", "a"]);
        counter.add_many("c", 5);
        assert_eq!(counter.len(), 3);
        assert_eq!(counter.get("a"), 2);
        assert_eq!(counter.get("missing"), 0);
        assert_eq!(counter.total(), 8);
        assert_eq!(counter.most_common(), Some("c"));
        assert_eq!(FrequencyCounter::new().most_common(), None);
    }

    #[test]
    fn test_key_count_records() {
        let counter = counter_of(&["New", "Used", "New"]);
        let ranked = KeyCount::ranked(&counter, 7);
        assert_eq!(
            ranked,
            vec![
                KeyCount { key: "New".to_string(), count: 2 },
                KeyCount { key: "Used".to_string(), count: 1 },
            ]
        );
    }
}
