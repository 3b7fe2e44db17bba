/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Footer-Core. Loads the footer configuration,
    resolves the backend version and custom link groups, plans
    the layout and emits the rendered footer.

  Security / Safety Notes:
    Operates within user privileges. Performs HTTPS GET
    requests only and writes to operator-chosen paths.

  Dependencies:
    clap for CLI parsing, chrono for timestamps, tokio runtime.

  Operational Scope:
    Invoked by the explorer build or by operators when the
    footer fragment needs regenerating.

  Revision History:
    2026-10-16 COD  Authored Footer-Core runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod backend;
mod config;
mod error;
mod layout;
mod links;
mod logger;
mod query;
mod session;
mod version;
mod view;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use clap::{ArgAction, Parser, ValueEnum};

use backend::FooterClient;
use config::FooterCoreConfig;
use error::Result;
use logger::Logger;
use session::{FooterSession, SourceSnapshot};
use view::{render_html, render_json, write_output, FooterDocument, FooterView, VersionLine};

/// Output encoding of the rendered footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

/// Command-line arguments for Footer-Core.
#[derive(Debug, Parser)]
#[command(
    name = "Footer-Core",
    version,
    author = "Synavera Systems",
    about = "Resolves and renders the explorer footer"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override output path.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Output encoding.
    #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,
    /// Page the issue report should reference.
    #[arg(long, value_name = "URL")]
    page_url: Option<String>,
    /// Milliseconds to wait for the backend and links before rendering.
    #[arg(long, value_name = "MS")]
    wait_ms: Option<u64>,
    /// Ignore the configured custom links.
    #[arg(long, action = ArgAction::SetTrue)]
    no_links: bool,
    /// Print to stdout instead of writing the output file.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[Footer-Core] {}", err);
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = FooterCoreConfig::load_from_optional_path(cli.config.as_deref())?;
    if cli.no_links {
        config.footer.links = None;
    }

    let output_path = cli.output.clone().unwrap_or_else(|| config.output_path());

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli
        .log
        .clone()
        .or_else(|| Some(config.log_dir().join(format!("footer_{session_stamp}.log"))));
    let logger = Logger::new(log_path, session_stamp, cli.verbose)?;
    logger.info("INIT", "Footer-Core session opened.");

    let links_url = config.footer.links_url();
    match links_url {
        Some(url) => logger.info("LINKS", format!("Custom links configured at {url}")),
        None => logger.debug("LINKS", "Custom links not configured; loader disabled"),
    }

    let client = FooterClient::new(&config.api)?;
    let wait = Duration::from_millis(cli.wait_ms.unwrap_or(config.api.wait_ms));
    let session = FooterSession::new();
    let sources = session.settle(&client, &client, links_url, wait).await;
    report_sources(&sources, &logger);

    let document = FooterView::new(&config)
        .with_page_url(cli.page_url.as_deref())
        .compose(&sources);
    summarise(&document, &logger);

    let rendered = match cli.format {
        OutputFormat::Html => render_html(&document),
        OutputFormat::Json => render_json(&document)?,
    };

    if cli.dry_run {
        println!("{rendered}");
    } else {
        write_output(&rendered, &output_path)?;
        logger.info(
            "OUTPUT",
            format!("Footer written to {}", output_path.display()),
        );
    }

    logger.info("COMPLETE", "Footer rendered.");
    logger.finalize()?;

    Ok(ExitCode::SUCCESS)
}

fn report_sources(sources: &SourceSnapshot, logger: &Logger) {
    if let Some(err) = sources.version.error() {
        logger.source_failure("backend version", err);
    } else if sources.version.is_pending() {
        logger.warn("PENDING", "Backend version still pending; rendering placeholder");
    }

    if let Some(err) = sources.links.error() {
        logger.source_failure("custom links", err);
    } else if sources.links.is_loading() {
        logger.warn("PENDING", "Custom links still loading; reserving default columns");
    }
}

fn summarise(document: &FooterDocument, logger: &Logger) {
    let backend = match &document.backend {
        VersionLine::Shown(link) => link.label.as_str(),
        VersionLine::Pending => "pending",
        VersionLine::Hidden => "absent",
    };
    logger.info(
        "SUMMARY",
        format!(
            "backend={} groups={} wide_columns={}",
            backend,
            document.custom_groups.len(),
            document.layout.wide_column_count()
        ),
    );
}
