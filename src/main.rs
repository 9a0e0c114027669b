//! `portal-fetch` command line.

use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use portal_fetch::downloader::{DownloaderBuilder, DEFAULT_CONCURRENCY, DEFAULT_RETRIES};
use portal_fetch::{mirror, settings, ChecksumAlgorithm, PortalConfig, StyleOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Sign in to the JGI Genome Portal and download every file listed in an
/// "Open Downloads as XML" manifest. Files are written to
/// OUTPUT/<folder name>/<filename>.
///
/// Credentials are read from an INI file, either the one given with
/// --config or config.ini in the application config directory:
///
///     [jgi]
///     username = exampleuser
///     password = examplepassword
#[derive(Debug, Parser)]
#[command(version, about, verbatim_doc_comment)]
struct Args {
    /// Manifest exported from the portal.
    xml: PathBuf,

    /// Settings file defining username and password.
    #[arg(short, long = "config", visible_alias = "configfile")]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Overwrite existing downloaded files.
    #[arg(long)]
    overwrite: bool,

    /// Number of download retries if there is an error.
    #[arg(long, default_value_t = DEFAULT_RETRIES)]
    retries: u32,

    /// Number of simultaneous downloads.
    #[arg(short, long, default_value_t = DEFAULT_CONCURRENCY)]
    threads: usize,

    /// Algorithm of the manifest checksums (md5 or sha256).
    #[arg(long, default_value = "md5")]
    checksum: ChecksumAlgorithm,

    /// Write files under OUTPUT/<manifest name>/.
    #[arg(long)]
    nest: bool,

    /// Do not draw progress bars.
    #[arg(long)]
    no_progress: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.threads < 1 {
        warn!("Setting `threads` to 1.");
    }

    let credentials = settings::load_credentials(args.config.as_deref())?;

    std::fs::create_dir_all(&args.output)
        .wrap_err_with(|| format!("cannot create output directory {:?}", args.output))?;
    let output = std::fs::canonicalize(&args.output)?;

    let style = if args.no_progress {
        StyleOptions::hidden()
    } else {
        StyleOptions::default()
    };
    let downloader = DownloaderBuilder::new()
        .directory(output)
        .overwrite(args.overwrite)
        .retries(args.retries)
        .concurrent_downloads(args.threads.max(1))
        .checksum_algorithm(args.checksum)
        .nest_by_manifest_name(args.nest)
        .style_options(style)
        .build();

    let portal = PortalConfig::default();
    info!("Logging into {}", portal.base_url);
    let summary = mirror(&portal, &credentials, &args.xml, &downloader).await?;

    if summary.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(
            "{} files failed and {} files did not validate",
            summary.failed,
            summary.mismatched
        );
        Ok(ExitCode::from(2))
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
