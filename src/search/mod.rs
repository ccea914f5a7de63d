// src/search/mod.rs
//! Paged arXiv search.
//!
//! `Search` turns a category/keyword/date filter into one composite
//! `search_query` and exposes the results as a lazy iterator that pages
//! through the endpoint until a page comes back empty.

pub mod feed;
pub mod http;
pub mod types;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use metrics::counter;
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, Span};

use crate::config::{SearchConfig, DEFAULT_ENDPOINT};
use crate::search::feed::Entry;
pub use crate::search::types::{Record, Transport};

pub const ABS_URL_PREFIX: &str = "http://arxiv.org/abs/";
pub const SORT_BY: &str = "submittedDate";
pub const SORT_ORDER: &str = "descending";

/// What to search for. The date range is inclusive on both ends as far as
/// arXiv's `submittedDate:[a TO b]` filter goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub category: String,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl SearchQuery {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            keyword: None,
            category: category.into(),
            date_range: None,
        }
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_range = Some((from, to));
        self
    }

    /// Composite `search_query` value, e.g.
    /// `stat.ML+AND+submittedDate:[20180101+TO+20180201]`.
    pub fn to_query_string(&self) -> String {
        let mut q = match self.keyword.as_deref() {
            Some(k) => format!("{}:{}", self.category, k),
            None => self.category.clone(),
        };
        if let Some((from, to)) = self.date_range {
            q = format!(
                "{}+AND+submittedDate:[{}+TO+{}]",
                q,
                compact_date(from),
                compact_date(to)
            );
        }
        q
    }
}

fn compact_date(d: NaiveDate) -> String {
    d.format("%Y%m%d").to_string()
}

pub struct Search {
    endpoint: String,
    query: String,
    page_size: usize,
    transport: Arc<dyn Transport>,
    span: Span,
}

impl Search {
    pub fn new(query: &SearchQuery, page_size: usize, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            query: query.to_query_string(),
            page_size: page_size.max(1),
            transport,
            span: Span::none(),
        }
    }

    /// Endpoint, page size and keyword come from `cfg`; the query's own
    /// keyword wins when both are set.
    pub fn from_config(
        cfg: &SearchConfig,
        query: &SearchQuery,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let mut query = query.clone();
        if query.keyword.is_none() {
            query.keyword = cfg.keyword.clone();
        }
        Self::new(&query, cfg.page_size, transport).with_endpoint(cfg.endpoint.clone())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page_url(&self, start: usize) -> String {
        format!(
            "{}?search_query={}&start={}&max_results={}&sortBy={}&sortOrder={}",
            self.endpoint, self.query, start, self.page_size, SORT_BY, SORT_ORDER
        )
    }

    /// Fresh lazy sequence starting at offset 0. Each call restarts from the
    /// first page; a sequence cannot be resumed once dropped.
    pub fn results(&self) -> Results<'_> {
        self.span.in_scope(|| info!(query = %self.query, "use query"));
        Results {
            search: self,
            start: 0,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    /// Drain the sequence into a map keyed by id; later duplicates replace
    /// earlier ones.
    pub fn collect_by_id(&self) -> Result<BTreeMap<String, Record>> {
        let mut data = BTreeMap::new();
        for record in self.results() {
            let record = record?;
            data.insert(record.id.clone(), record);
        }
        self.span
            .in_scope(|| info!(records = data.len(), "finish data loading"));
        Ok(data)
    }

    /// Fetch everything and persist it as a JSON map at `path`.
    pub fn save(&self, path: &Path) -> Result<usize> {
        let data = self.collect_by_id()?;
        self.span
            .in_scope(|| info!(path = %path.display(), "persisting data"));
        crate::download::write_json_atomic(path, &data)?;
        Ok(data.len())
    }

    fn fetch_page(&self, start: usize) -> Result<Vec<Entry>> {
        let url = self.page_url(start);
        let _enter = self.span.enter();
        info!(start, "fetch entries from arxiv");
        counter!("arxiv_pages_fetched_total").increment(1);

        let body = self
            .transport
            .get(&url)
            .with_context(|| format!("fetching {url}"))?;
        feed::parse_entries(&body).map_err(|e| {
            counter!("arxiv_fetch_errors_total").increment(1);
            e.context(format!("page at start={start}"))
        })
    }
}

/// Lazy, finite sequence of records. Yields at most one `Err`, then stops.
pub struct Results<'a> {
    search: &'a Search,
    start: usize,
    buffer: VecDeque<Record>,
    done: bool,
}

impl Iterator for Results<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(r) = self.buffer.pop_front() {
                return Some(Ok(r));
            }
            if self.done {
                return None;
            }

            let start = self.start;
            self.start += self.search.page_size;

            match self.search.fetch_page(start) {
                Ok(entries) if entries.is_empty() => {
                    self.done = true;
                    return None;
                }
                Ok(entries) => {
                    self.buffer.extend(entries.into_iter().map(process_entry));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Drop line breaks, fold the double space they leave behind, trim.
pub fn normalize_text(text: &str) -> String {
    text.replace(['\n', '\r'], "")
        .replace("  ", " ")
        .trim()
        .to_string()
}

/// `http://arxiv.org/abs/1234.5678` → `1234.5678`.
pub fn extract_id_from_url(url: &str) -> String {
    url.replace(ABS_URL_PREFIX, "")
}

pub fn process_entry(entry: Entry) -> Record {
    Record {
        summary: normalize_text(&entry.summary),
        id: extract_id_from_url(&entry.id),
        title: normalize_text(&entry.title),
        published: entry.published,
        authors: entry.authors.into_iter().map(|a| a.name).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn query_with_category_only() {
        assert_eq!(SearchQuery::category("all").to_query_string(), "all");
    }

    #[test]
    fn query_with_keyword_and_dates() {
        let q = SearchQuery::category("stat.ML")
            .keyword("bandits")
            .between(d(2018, 1, 1), d(2018, 2, 1));
        assert_eq!(
            q.to_query_string(),
            "stat.ML:bandits+AND+submittedDate:[20180101+TO+20180201]"
        );
    }

    #[test]
    fn normalize_text_joins_wrapped_lines() {
        assert_eq!(
            normalize_text("  Deep Learning for\n  Sparse Graphs\r\n"),
            "Deep Learning for Sparse Graphs"
        );
    }

    #[test]
    fn id_is_taken_from_abs_url() {
        assert_eq!(
            extract_id_from_url("http://arxiv.org/abs/1234.5678"),
            "1234.5678"
        );
        assert_eq!(
            extract_id_from_url("http://arxiv.org/abs/1801.00001v2"),
            "1801.00001v2"
        );
    }
}
