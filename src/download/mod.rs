// src/download/mod.rs
//! Interval downloads and the per-year batch that declares them.

pub mod interval;
pub mod scheduler;

use anyhow::{Context, Result};
use metrics::counter;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Span};

use crate::config::{AppConfig, SearchConfig};
use crate::download::interval::{months_of_year, DateInterval};
use crate::download::scheduler::{BuildSummary, Scheduler, Task};
use crate::search::{Search, SearchQuery, Transport};

pub const ARTIFACT_PREFIX: &str = "arxiv_";
pub const ARTIFACT_EXT: &str = "json";

/// `<dir>/arxiv_<interval>.json`
pub fn artifact_path(dir: &Path, interval: &DateInterval) -> PathBuf {
    dir.join(format!("{ARTIFACT_PREFIX}{interval}.{ARTIFACT_EXT}"))
}

/// Serialize `value` next to `path` and rename it into place, so a crash never
/// leaves a partial file that the scheduler would take for finished output.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    serde_json::to_writer(&mut tmp, value)
        .with_context(|| format!("serializing {}", path.display()))?;
    tmp.flush()?;
    tmp.persist(path)
        .with_context(|| format!("persisting {}", path.display()))?;
    Ok(())
}

/// Downloads one interval of one category into a single artifact.
pub struct DownloadInterval {
    pub interval: DateInterval,
    pub download_dir: PathBuf,
    pub search: SearchConfig,
    transport: Arc<dyn Transport>,
    span: Span,
}

impl DownloadInterval {
    pub fn new(
        interval: DateInterval,
        download_dir: impl Into<PathBuf>,
        search: SearchConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            interval,
            download_dir: download_dir.into(),
            search,
            transport,
            span: Span::none(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    fn query(&self) -> SearchQuery {
        SearchQuery::category(self.search.category.clone())
            .between(self.interval.start, self.interval.end)
    }
}

impl Task for DownloadInterval {
    fn name(&self) -> String {
        format!("DownloadInterval({}, {})", self.interval, self.search.category)
    }

    fn output(&self) -> PathBuf {
        artifact_path(&self.download_dir, &self.interval)
    }

    fn run(&self) -> Result<()> {
        let search = Search::from_config(&self.search, &self.query(), self.transport.clone())
            .with_span(self.span.clone());

        self.span
            .in_scope(|| info!(interval = %self.interval, "start downloading for range"));
        let data = search
            .collect_by_id()
            .with_context(|| format!("downloading interval {}", self.interval))?;

        let out = self.output();
        self.span.in_scope(|| {
            info!(records = data.len(), path = %out.display(), "persisting data")
        });
        write_json_atomic(&out, &data)?;
        counter!("download_records_written_total").increment(data.len() as u64);
        Ok(())
    }
}

/// One year of monthly downloads.
pub struct Download {
    pub year: i32,
    pub download_dir: PathBuf,
    pub search: SearchConfig,
    transport: Arc<dyn Transport>,
    span: Span,
}

impl Download {
    pub fn new(
        year: i32,
        download_dir: impl Into<PathBuf>,
        search: SearchConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            year,
            download_dir: download_dir.into(),
            search,
            transport,
            span: Span::none(),
        }
    }

    pub fn from_config(cfg: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self::new(
            cfg.download.year,
            cfg.download.dir.clone(),
            cfg.search.clone(),
            transport,
        )
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Create the download dir and declare one task per month.
    pub fn requires(&self) -> Result<Vec<DownloadInterval>> {
        std::fs::create_dir_all(&self.download_dir)
            .with_context(|| format!("creating {}", self.download_dir.display()))?;

        let tasks = months_of_year(self.year)?
            .into_iter()
            .map(|interval| {
                let span = tracing::info_span!(parent: &self.span, "interval", %interval);
                DownloadInterval::new(
                    interval,
                    self.download_dir.clone(),
                    self.search.clone(),
                    self.transport.clone(),
                )
                .with_span(span)
            })
            .collect();
        Ok(tasks)
    }
}

/// Declare the year's tasks and hand them to `scheduler`.
pub fn run_download(download: &Download, scheduler: &Scheduler) -> Result<BuildSummary> {
    let tasks: Vec<Arc<dyn Task>> = download
        .requires()?
        .into_iter()
        .map(|t| Arc::new(t) as Arc<dyn Task>)
        .collect();
    download.span.in_scope(|| {
        info!(
            year = download.year,
            tasks = tasks.len(),
            workers = scheduler.workers(),
            "scheduling downloads"
        )
    });
    scheduler.run(tasks)
}
