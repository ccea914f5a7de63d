// src/search/types.rs
use anyhow::Result;

/// One normalized paper as produced by the fetcher and persisted per interval.
///
/// `published` is the raw feed timestamp (RFC 3339); the loader parses it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub published: String,
    pub authors: Vec<String>,
}

/// Blocking GET returning the response body.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<String>;
}

