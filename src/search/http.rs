// src/search/http.rs
use anyhow::{Context, Result};
use metrics::counter;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::search::types::Transport;

/// reqwest-backed transport. Build and drop it outside of an async context:
/// the scheduler calls it from `spawn_blocking` threads only.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn from_config(cfg: &SearchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("building arxiv http client")?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        let resp = match self.client.get(url).send() {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = ?e, %url, "arxiv http error");
                counter!("arxiv_fetch_errors_total").increment(1);
                return Err(e).context("arxiv http get()");
            }
        };
        let resp = match resp.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(status = ?e.status(), %url, "arxiv error status");
                counter!("arxiv_fetch_errors_total").increment(1);
                return Err(e).with_context(|| format!("arxiv returned error status for {url}"));
            }
        };
        resp.text().context("arxiv http .text()")
    }
}
