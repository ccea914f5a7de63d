// src/preprocess/loader.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::download::{ARTIFACT_EXT, ARTIFACT_PREFIX};
use crate::search::Record;

/// Loaded row. The id is the table index, so it is not repeated here.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Paper {
    pub title: String,
    pub summary: String,
    pub published: DateTime<Utc>,
    pub authors: Vec<String>,
}

/// Papers indexed by arXiv id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    rows: BTreeMap<String, Paper>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Paper> {
        self.rows.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Paper)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Append `other`; rows of `other` replace rows with the same id.
    pub fn extend(&mut self, other: Corpus) {
        self.rows.extend(other.rows);
    }

    fn from_records(records: BTreeMap<String, Record>) -> Result<Self> {
        let mut rows = BTreeMap::new();
        for (id, r) in records {
            let published = DateTime::parse_from_rfc3339(&r.published)
                .with_context(|| format!("parsing published {:?} of {id}", r.published))?
                .with_timezone(&Utc);
            rows.insert(
                id,
                Paper {
                    title: r.title,
                    summary: r.summary,
                    published,
                    authors: r.authors,
                },
            );
        }
        Ok(Self { rows })
    }
}

/// Read one persisted interval.
pub fn load(path: &Path) -> Result<Corpus> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records: BTreeMap<String, Record> = serde_json::from_str(&content)
        .with_context(|| format!("deserializing {}", path.display()))?;
    Corpus::from_records(records).with_context(|| format!("loading {}", path.display()))
}

/// Every `arxiv_*.json` under `dir`, in file-name order, concatenated.
pub fn load_dir(dir: &Path) -> Result<Corpus> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .flatten()
        .map(|e| e.path())
        .filter(|p| is_artifact(p))
        .collect();
    files.sort();

    let mut corpus = Corpus::default();
    for f in files {
        corpus.extend(load(&f)?);
    }
    Ok(corpus)
}

fn is_artifact(path: &Path) -> bool {
    let ext_ok = path.extension().and_then(|s| s.to_str()) == Some(ARTIFACT_EXT);
    let name_ok = path
        .file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|n| n.starts_with(ARTIFACT_PREFIX));
    ext_ok && name_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_timestamp_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("arxiv_2018-01.json");
        fs::write(
            &p,
            r#"{"1":{"id":"1","title":"t","summary":"s","published":"yesterday","authors":[]}}"#,
        )
        .unwrap();
        let err = load(&p).unwrap_err();
        assert!(format!("{err:#}").contains("yesterday"));
    }

    #[test]
    fn only_artifacts_are_picked_up() {
        assert!(is_artifact(Path::new("data/arxiv_2018-01.json")));
        assert!(!is_artifact(Path::new("data/arxiv_2018-01.json.tmp")));
        assert!(!is_artifact(Path::new("data/notes.json")));
    }
}
