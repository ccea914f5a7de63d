// src/telemetry.rs
//! Logging and metrics plumbing.
//!
//! The library never installs a global subscriber on its own. The binary calls
//! [`init_tracing`] once; library components log inside a `tracing::Span`
//! handed to them by the caller (see `with_span` on `Search`,
//! `DownloadInterval` and `Scheduler`).

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
const DEFAULT_FILTER: &str = "arxiv_trends=info,warn";

/// Install the fmt subscriber. `RUST_LOG` overrides the default filter and
/// `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = std::env::var(ENV_LOG_FORMAT)
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if let Err(e) = res {
        eprintln!("tracing already initialized: {e}");
    }
}

/// One-time metrics registration (so series carry descriptions once a recorder exists).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("arxiv_pages_fetched_total", "Result pages requested from arXiv.");
        describe_counter!("arxiv_entries_total", "Entries parsed from result pages.");
        describe_counter!(
            "arxiv_fetch_errors_total",
            "Page fetch or feed parse errors."
        );
        describe_histogram!("arxiv_page_parse_ms", "Feed parse time in milliseconds.");
        describe_counter!("download_tasks_succeeded_total", "Download tasks that ran to completion.");
        describe_counter!("download_tasks_failed_total", "Download tasks that returned an error or panicked.");
        describe_counter!(
            "download_tasks_skipped_total",
            "Download tasks skipped because their output already exists."
        );
        describe_counter!("download_records_written_total", "Records persisted by download tasks.");
        describe_gauge!("download_last_run_ts", "Unix ts when the scheduler last finished a batch.");
    });
}

/// Prometheus recorder whose rendering is dumped to a text file at exit
/// (node-exporter textfile collector layout).
pub struct MetricsSink {
    handle: PrometheusHandle,
}

impl MetricsSink {
    pub fn install() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("installing prometheus recorder")?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render())
            .with_context(|| format!("writing metrics to {}", path.display()))
    }
}
