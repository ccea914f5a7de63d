// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod config;
pub mod download;
pub mod preprocess;
pub mod search;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::config::AppConfig;
pub use crate::download::scheduler::{BuildSummary, Scheduler, Task};
pub use crate::download::{run_download, Download, DownloadInterval};
pub use crate::search::{Record, Search, SearchQuery, Transport};
