// src/preprocess/frequency.rs
//! Document × token incidence and grouped token frequencies.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Sparse presence table: which token appears in which document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidenceTable {
    rows: BTreeMap<String, BTreeSet<String>>,
    columns: BTreeSet<String>,
}

impl IncidenceTable {
    /// One row per document id; a repeated id replaces the earlier row.
    pub fn from_documents<I, D, T, S>(docs: I) -> Self
    where
        I: IntoIterator<Item = (D, T)>,
        D: Into<String>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows = BTreeMap::new();
        for (doc, tokens) in docs {
            let set: BTreeSet<String> = tokens.into_iter().map(Into::into).collect();
            rows.insert(doc.into(), set);
        }
        let columns = rows.values().flatten().cloned().collect();
        Self { rows, columns }
    }

    /// 1 if `doc` contains `token`, else 0 (also for unknown docs).
    pub fn get(&self, doc: &str, token: &str) -> u8 {
        self.rows
            .get(doc)
            .is_some_and(|set| set.contains(token))
            .into()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn documents(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn num_documents(&self) -> usize {
        self.rows.len()
    }

    pub fn num_tokens(&self) -> usize {
        self.columns.len()
    }
}

/// Group × token mean incidence. Cells that were never observed read as 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable<K: Ord> {
    groups: BTreeMap<K, BTreeMap<String, f64>>,
    #[serde(skip)]
    group_sizes: BTreeMap<K, usize>,
}

impl<K: Ord> FrequencyTable<K> {
    pub fn get(&self, group: &K, token: &str) -> f64 {
        self.groups
            .get(group)
            .and_then(|row| row.get(token))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn groups(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    pub fn group_size(&self, group: &K) -> usize {
        self.group_sizes.get(group).copied().unwrap_or(0)
    }

    /// Up to `n` most frequent tokens of `group`, ties broken alphabetically.
    pub fn top(&self, group: &K, n: usize) -> Vec<(&str, f64)> {
        let Some(row) = self.groups.get(group) else {
            return Vec::new();
        };
        let mut v: Vec<(&str, f64)> = row.iter().map(|(t, f)| (t.as_str(), *f)).collect();
        v.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v.truncate(n);
        v
    }
}

/// Fraction of documents per group that contain each token.
///
/// `grouper` maps a document id to its group key (e.g. the month it was published).
pub fn compute_frequencies<K, F>(incidence: &IncidenceTable, grouper: F) -> FrequencyTable<K>
where
    K: Ord + Clone,
    F: Fn(&str) -> K,
{
    let mut counts: BTreeMap<K, BTreeMap<String, usize>> = BTreeMap::new();
    let mut group_sizes: BTreeMap<K, usize> = BTreeMap::new();

    for (doc, tokens) in &incidence.rows {
        let key = grouper(doc);
        *group_sizes.entry(key.clone()).or_insert(0) += 1;
        let row = counts.entry(key).or_default();
        for t in tokens {
            *row.entry(t.clone()).or_insert(0) += 1;
        }
    }

    let groups = counts
        .into_iter()
        .map(|(key, row)| {
            let n = group_sizes[&key] as f64;
            let freqs = row.into_iter().map(|(t, c)| (t, c as f64 / n)).collect();
            (key, freqs)
        })
        .collect();

    FrequencyTable {
        groups,
        group_sizes,
    }
}

/// Occurrences of each token in one sequence.
pub fn token_count<S: AsRef<str>>(tokens: &[S]) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for t in tokens {
        *out.entry(t.as_ref().to_string()).or_insert(0) += 1;
    }
    out
}
