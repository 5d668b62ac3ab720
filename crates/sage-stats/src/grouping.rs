use std::{collections::HashMap, hash::Hash};

use sage_types::{records::ModelSample, series::FrequencyEntry};

/// Records sharing one key, in input order.
#[derive(Debug)]
pub struct Group<'a, K, T> {
    pub key: K,
    pub records: Vec<&'a T>,
}

impl<K, T> Group<'_, K, T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn values(&self, value: impl Fn(&T) -> f64) -> Vec<f64> {
        self.records.iter().map(|record| value(record)).collect()
    }
}

/// Disjoint partition of a record slice, keys in first-occurrence order.
#[derive(Debug)]
pub struct Groups<'a, K, T> {
    groups: Vec<Group<'a, K, T>>,
}

impl<'a, K: Eq, T> Groups<'a, K, T> {
    pub fn get(&self, key: &K) -> Option<&Group<'a, K, T>> {
        self.groups.iter().find(|group| &group.key == key)
    }

    pub fn keys(&self) -> Vec<&K> {
        self.groups.iter().map(|group| &group.key).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Group<'a, K, T>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a, K, T> IntoIterator for Groups<'a, K, T> {
    type Item = Group<'a, K, T>;
    type IntoIter = std::vec::IntoIter<Group<'a, K, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

pub fn group_by<'a, T, K, F>(records: &'a [T], mut key: F) -> Groups<'a, K, T>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Group<'a, K, T>> = Vec::new();
    for record in records {
        let k = key(record);
        let slot = *slots.entry(k.clone()).or_insert_with(|| {
            groups.push(Group {
                key: k,
                records: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].records.push(record);
    }
    Groups { groups }
}

pub fn group_by_model<T: ModelSample>(records: &[T]) -> Groups<'_, String, T> {
    group_by(records, |record| record.model_name().to_string())
}

/// Selection counts per model, most frequent first.
pub fn model_frequency<T: ModelSample>(records: &[T]) -> Vec<FrequencyEntry> {
    let total = records.len();
    let mut entries: Vec<FrequencyEntry> = group_by_model(records)
        .into_iter()
        .map(|group| FrequencyEntry {
            count: group.len(),
            percentage: group.len() as f64 / total as f64 * 100.0,
            model: group.key,
        })
        .collect();
    // Stable, so ties keep first-occurrence order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}
