// tests/common/mod.rs
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use arxiv_trends::search::Transport;
use std::sync::Mutex;

pub const PAGE_1: &str = include_str!("../fixtures/arxiv_page.xml");
pub const PAGE_2: &str = include_str!("../fixtures/arxiv_page_2.xml");
pub const EMPTY: &str = include_str!("../fixtures/arxiv_empty.xml");

/// Serves canned pages by `start` offset and records every requested URL.
pub struct StubTransport {
    pages: Vec<String>,
    page_size: usize,
    fail_at: Option<usize>,
    pub requested: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new(pages: &[&str], page_size: usize) -> Self {
        Self {
            pages: pages.iter().map(|s| s.to_string()).collect(),
            page_size,
            fail_at: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Make the request for page `idx` (0-based) fail with a transport error.
    pub fn failing_at(mut self, idx: usize) -> Self {
        self.fail_at = Some(idx);
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    fn get(&self, url: &str) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        let start: usize = url
            .split('&')
            .find_map(|kv| kv.strip_prefix("start="))
            .ok_or_else(|| anyhow!("no start in {url}"))?
            .parse()?;
        let idx = start / self.page_size;
        if self.fail_at == Some(idx) {
            return Err(anyhow!("connection reset by peer"));
        }
        Ok(self
            .pages
            .get(idx)
            .cloned()
            .unwrap_or_else(|| EMPTY.to_string()))
    }
}
