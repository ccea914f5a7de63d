// src/search/feed.rs
//! Atom feed bodies returned by the arXiv query endpoint.

use anyhow::{bail, Context, Result};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

const API_ERROR_PREFIX: &str = "http://arxiv.org/api/errors";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub published: String,
    #[serde(rename = "author", default)]
    pub authors: Vec<Author>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub name: String,
}

/// Parse one result page into raw entries.
///
/// arXiv answers a malformed query with HTTP 200 and a single entry whose id
/// lives under `/api/errors`; that page is turned into an error.
pub fn parse_entries(body: &str) -> Result<Vec<Entry>> {
    let t0 = std::time::Instant::now();
    let feed: Feed = from_str(body).context("parsing arxiv atom feed")?;

    if let Some(err) = feed
        .entries
        .iter()
        .find(|e| e.id.starts_with(API_ERROR_PREFIX))
    {
        bail!("arxiv api error: {}", err.summary.trim());
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("arxiv_page_parse_ms").record(ms);
    counter!("arxiv_entries_total").increment(feed.entries.len() as u64);
    Ok(feed.entries)
}
