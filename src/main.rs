mod config;
mod explore;
mod extract;
mod locate;
mod output;
mod report;

use clap::Parser;
use config::{ConfigError, JunilogConfig, MissingPolicy};
use extract::catalog::{Catalog, CatalogError};
use extract::LogExtractor;
use locate::LocateError;
use output::{OutputError, OutputFormat};
use report::ReportError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_CONFIG: &str = "junilog.toml";

/// Parse the per-element logs of a junifer pipeline job (status output,
/// resource accounting and error logs) and sum them up in one table.
#[derive(Parser, Debug)]
#[command(name = "junilog", version, about)]
pub struct Cli {
    /// Directory of a junifer pipeline job (must contain a logs directory)
    #[arg(value_name = "JOB_DIRECTORY", required_unless_present = "print_config")]
    job_directory: Option<PathBuf>,

    /// Path to the report; `.csv` writes comma-separated, `.tsv` tab-separated
    #[arg(short, long, default_value = "junilog.csv")]
    outfile: PathBuf,

    /// Explore the report interactively after writing it
    #[arg(short, long, alias = "ipython")]
    interactive: bool,

    /// Config file path (default: junilog.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Filename prefix stripped before splitting the element key (overrides config)
    #[arg(long)]
    prefix: Option<String>,

    /// Skip elements with missing or unreadable files instead of failing
    #[arg(long)]
    skip_incomplete: bool,

    /// Print the resolved configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Debug logging (per-element discovery and extraction)
    #[arg(short, long)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Any failure that ends the run.
#[derive(Debug)]
enum RunError {
    Config(ConfigError),
    Catalog(CatalogError),
    Locate(LocateError),
    Report(ReportError),
    Output(OutputError),
    PrintConfig(toml::ser::Error),
    Explore(std::io::Error),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "{e}"),
            RunError::Catalog(e) => write!(f, "invalid rule catalog: {e}"),
            RunError::Locate(e) => write!(f, "{e}"),
            RunError::Report(e) => write!(f, "{e}"),
            RunError::Output(e) => write!(f, "{e}"),
            RunError::PrintConfig(e) => write!(f, "failed to render config: {e}"),
            RunError::Explore(e) => write!(f, "interactive session failed: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(e) => std::error::Error::source(e),
            RunError::Catalog(e) => std::error::Error::source(e),
            RunError::Locate(e) => std::error::Error::source(e),
            RunError::Report(e) => std::error::Error::source(e),
            RunError::Output(e) => std::error::Error::source(e),
            RunError::PrintConfig(e) => Some(e),
            RunError::Explore(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<CatalogError> for RunError {
    fn from(e: CatalogError) -> Self {
        RunError::Catalog(e)
    }
}

impl From<LocateError> for RunError {
    fn from(e: LocateError) -> Self {
        RunError::Locate(e)
    }
}

impl From<ReportError> for RunError {
    fn from(e: ReportError) -> Self {
        RunError::Report(e)
    }
}

impl From<OutputError> for RunError {
    fn from(e: OutputError) -> Self {
        RunError::Output(e)
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file and fold the CLI overrides into it.
fn resolve_config(cli: &Cli) -> Result<JunilogConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path, true)?,
        None => config::load_config(Path::new(DEFAULT_CONFIG), false)?,
    };
    if let Some(prefix) = &cli.prefix {
        config.layout.file_prefix = prefix.clone();
    }
    if cli.skip_incomplete {
        config.discovery.on_missing = MissingPolicy::Skip;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<(), RunError> {
    // Reject the output format before touching anything on disk.
    let format = OutputFormat::from_path(&cli.outfile)?;

    let config = resolve_config(cli)?;
    if cli.print_config {
        let rendered = toml::to_string_pretty(&config).map_err(RunError::PrintConfig)?;
        print!("{rendered}");
        return Ok(());
    }

    let catalog = Catalog::with_rules(&config.resource.rules)?;
    let extractor = LogExtractor::new(catalog, &config.diagnostics)?;
    tracing::debug!(rules = extractor.catalog().rules().len(), "rule catalog ready");

    let job_dir = match &cli.job_directory {
        Some(dir) => dir,
        // clap enforces the positional unless --print-config is given
        None => return Ok(()),
    };

    let elements =
        locate::locate_elements(job_dir, &config.layout, config.discovery.on_missing)?;
    let table = report::build_report(&extractor, &elements, config.discovery.on_missing)?;
    output::write_report(&table, &cli.outfile, format)?;

    if cli.interactive {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        explore::run_session(&table, stdin.lock(), stdout.lock()).map_err(RunError::Explore)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    tracing::debug!(?cli, "parsed CLI arguments");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                tracing::debug!("caused by: {cause}");
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
