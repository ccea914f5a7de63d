// src/download/scheduler.rs
//! Minimal batch runner: skip units whose output already exists, run the rest
//! on blocking threads with bounded parallelism, report what happened.

use anyhow::{Context, Result};
use metrics::{counter, gauge};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, Instrument, Span};

/// A unit of work identified by the artifact it produces.
pub trait Task: Send + Sync {
    fn name(&self) -> String;

    fn output(&self) -> PathBuf;

    /// A task whose output exists is considered done and is not re-run.
    fn complete(&self) -> bool {
        self.output().exists()
    }

    fn run(&self) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub succeeded: Vec<String>,
    pub skipped: Vec<String>,
    /// `(task name, error message)`.
    pub failed: Vec<(String, String)>,
}

impl BuildSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    workers: usize,
    span: Span,
}

impl Scheduler {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            span: Span::none(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `tasks` to completion on a runtime owned by this call. Must not be
    /// called from inside another tokio runtime.
    pub fn run(&self, tasks: Vec<Arc<dyn Task>>) -> Result<BuildSummary> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.workers.min(4))
            .max_blocking_threads(self.workers)
            .enable_all()
            .build()
            .context("building scheduler runtime")?;
        rt.block_on(self.run_async(tasks).instrument(self.span.clone()))
    }

    async fn run_async(&self, tasks: Vec<Arc<dyn Task>>) -> Result<BuildSummary> {
        crate::telemetry::ensure_metrics_described();

        let mut summary = BuildSummary::default();
        let mut seen = HashSet::new();
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut set = JoinSet::new();
        let mut names = HashMap::new();

        for task in tasks {
            let name = task.name();
            if !seen.insert(name.clone()) {
                continue;
            }
            if task.complete() {
                info!(task = %name, "output exists, skipping");
                counter!("download_tasks_skipped_total").increment(1);
                summary.skipped.push(name);
                continue;
            }

            let permit = permits
                .clone()
                .acquire_owned()
                .await
                .context("scheduler semaphore closed")?;
            let span = Span::current();
            let label = name.clone();
            let handle = set.spawn_blocking(move || {
                let _permit = permit;
                let _enter = span.enter();
                info!(task = %name, "running");
                let res = task.run();
                (name, res)
            });
            names.insert(handle.id(), label);
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((name, Ok(()))) => {
                    info!(task = %name, "done");
                    counter!("download_tasks_succeeded_total").increment(1);
                    summary.succeeded.push(name);
                }
                Ok((name, Err(e))) => {
                    error!(task = %name, error = ?e, "task failed");
                    counter!("download_tasks_failed_total").increment(1);
                    summary.failed.push((name, format!("{e:#}")));
                }
                Err(join_err) => {
                    let name = names
                        .remove(&join_err.id())
                        .unwrap_or_else(|| "<unknown>".to_string());
                    error!(task = %name, error = %join_err, "task panicked");
                    counter!("download_tasks_failed_total").increment(1);
                    summary.failed.push((name, join_err.to_string()));
                }
            }
        }

        gauge!("download_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
        summary.succeeded.sort();
        summary.failed.sort();
        Ok(summary)
    }
}
