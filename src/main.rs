//! arxiv-trends binary entrypoint.
//! `download` fetches a year of monthly arXiv intervals, `search` runs one
//! ad-hoc query into a file, `frequencies` turns downloaded papers into
//! per-month token frequencies.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, info_span};

use arxiv_trends::config::AppConfig;
use arxiv_trends::download::{run_download, Download};
use arxiv_trends::preprocess::{self, TextField, Tokenizer};
use arxiv_trends::search::http::HttpTransport;
use arxiv_trends::search::{Search, SearchQuery, Transport};
use arxiv_trends::telemetry::{self, MetricsSink};
use arxiv_trends::Scheduler;

#[derive(Parser)]
#[command(name = "arxiv-trends")]
#[command(version, about = "arXiv metadata downloader and token frequency pipeline", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: $ARXIV_TRENDS_CONFIG, then config/arxiv_trends.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write Prometheus text metrics here on exit
    #[arg(long, global = true)]
    metrics_out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every month of a year, one file per month
    Download {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        download_dir: Option<PathBuf>,
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Run one query over a date range and save the results
    Search {
        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: NaiveDate,
        /// Last day, YYYY-MM-DD
        #[arg(long)]
        to: NaiveDate,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Token frequencies per publication month over downloaded files
    Frequencies {
        #[arg(long)]
        download_dir: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value = "summary")]
        field: FieldArg,
        /// Log the N most frequent tokens of each month
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FieldArg {
    Summary,
    Title,
    Both,
}

impl From<FieldArg> for TextField {
    fn from(f: FieldArg) -> Self {
        match f {
            FieldArg::Summary => TextField::Summary,
            FieldArg::Title => TextField::Title,
            FieldArg::Both => TextField::Both,
        }
    }
}

fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut cfg = match &cli.config {
        Some(p) => AppConfig::load_from(p)?,
        None => AppConfig::load_default()?,
    };

    let metrics = match &cli.metrics_out {
        Some(_) => Some(MetricsSink::install()?),
        None => None,
    };

    let res = match cli.command {
        Commands::Download {
            year,
            download_dir,
            workers,
            category,
            keyword,
        } => {
            if let Some(y) = year {
                cfg.download.year = y;
            }
            if let Some(d) = download_dir {
                cfg.download.dir = d;
            }
            if let Some(w) = workers {
                cfg.download.workers = w.max(1);
            }
            if let Some(c) = category {
                cfg.search.category = c;
            }
            if keyword.is_some() {
                cfg.search.keyword = keyword;
            }
            cmd_download(&cfg)
        }
        Commands::Search {
            from,
            to,
            out,
            category,
            keyword,
        } => {
            if let Some(c) = category {
                cfg.search.category = c;
            }
            if keyword.is_some() {
                cfg.search.keyword = keyword;
            }
            cmd_search(&cfg, from, to, &out)
        }
        Commands::Frequencies {
            download_dir,
            out,
            field,
            top,
        } => {
            if let Some(d) = download_dir {
                cfg.download.dir = d;
            }
            cmd_frequencies(&cfg, field.into(), &out, top)
        }
    };

    if let (Some(sink), Some(path)) = (metrics, cli.metrics_out.as_deref()) {
        sink.write_to(path)?;
    }
    res
}

fn cmd_download(cfg: &AppConfig) -> Result<()> {
    // The transport outlives the scheduler's runtime; it must be dropped on this thread.
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(&cfg.search)?);
    let download = Download::from_config(cfg, transport.clone())
        .with_span(info_span!("download", year = cfg.download.year));
    let scheduler = Scheduler::new(cfg.download.workers);

    let summary = run_download(&download, &scheduler)?;
    info!(
        succeeded = summary.succeeded.len(),
        skipped = summary.skipped.len(),
        failed = summary.failed.len(),
        "download finished"
    );
    if !summary.is_success() {
        for (task, err) in &summary.failed {
            error!(%task, %err, "failed task");
        }
        bail!("{} download task(s) failed", summary.failed.len());
    }
    Ok(())
}

fn cmd_search(cfg: &AppConfig, from: NaiveDate, to: NaiveDate, out: &Path) -> Result<()> {
    if to < from {
        bail!("--to {to} is before --from {from}");
    }
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(&cfg.search)?);
    let query = SearchQuery::category(cfg.search.category.clone()).between(from, to);
    let search = Search::from_config(&cfg.search, &query, transport)
        .with_span(info_span!("search", %from, %to));
    let n = search.save(out)?;
    info!(records = n, path = %out.display(), "search saved");
    Ok(())
}

fn cmd_frequencies(cfg: &AppConfig, field: TextField, out: &Path, top: usize) -> Result<()> {
    let corpus = preprocess::load_dir(&cfg.download.dir)?;
    if corpus.is_empty() {
        bail!("no downloaded papers under {}", cfg.download.dir.display());
    }
    info!(papers = corpus.len(), "corpus loaded");

    let tokenizer = Tokenizer::default().with_min_len(cfg.preprocess.min_token_len);
    let freqs = preprocess::monthly_frequencies(&corpus, &tokenizer, field);

    for month in freqs.groups() {
        let best: Vec<String> = freqs
            .top(month, top)
            .into_iter()
            .map(|(t, f)| format!("{t}={f:.3}"))
            .collect();
        info!(%month, papers = freqs.group_size(month), top = ?best, "monthly tokens");
    }

    arxiv_trends::download::write_json_atomic(out, &freqs)
        .with_context(|| format!("writing frequencies to {}", out.display()))?;
    Ok(())
}
