// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "ARXIV_TRENDS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/arxiv_trends.toml";

pub const DEFAULT_ENDPOINT: &str = "http://export.arxiv.org/api/query";
pub const DEFAULT_DOWNLOAD_DIR: &str = "./data/download";

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_category() -> String {
    "stat.ML".to_string()
}
fn default_page_size() -> usize {
    10
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("arxiv-trends/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_download_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DOWNLOAD_DIR)
}
fn default_year() -> i32 {
    2018
}
fn default_workers() -> usize {
    8
}
fn default_min_token_len() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub keyword: Option<String>,
    /// Entries requested per page (`max_results`).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            category: default_category(),
            keyword: None,
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_year")]
    pub year: i32,
    /// Upper bound on intervals downloaded in parallel.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            dir: default_download_dir(),
            year: default_year(),
            workers: default_workers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub download: DownloadConfig,
    #[serde(default)]
    pub preprocess: PreprocessConfig,
}

impl AppConfig {
    /// Load from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load using env var + fallbacks:
    /// 1) $ARXIV_TRENDS_CONFIG
    /// 2) config/arxiv_trends.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
        }
        let toml_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        Ok(Self::default())
    }

    pub fn parse(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    fn sanitize(&mut self) {
        if self.search.page_size == 0 {
            self.search.page_size = default_page_size();
        }
        if self.download.workers == 0 {
            self.download.workers = 1;
        }
        if self.preprocess.min_token_len == 0 {
            self.preprocess.min_token_len = default_min_token_len();
        }
        self.search.keyword = self
            .search
            .keyword
            .take()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
    }
}
