use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tally_core::{CategoryMap, Period, Table};
use tally_ledger::{LedgerError, LedgerStore, Pipeline, RunSummary, SqliteStore, create_all, drop_all};
use tracing_subscriber::EnvFilter;

mod config;
mod state;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "tally", version = VERSION, about = "Monthly statement ingestion into a personal finance ledger")]
struct Cli {
    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config file
    InitConfig,

    /// Create every ledger table that does not exist yet
    Create,

    /// Drop every ledger table
    Drop,

    /// Ingest one month of statements and input sheets
    Append {
        /// Month name, e.g. feb or February
        #[arg(short, long)]
        month: String,

        /// Year, e.g. 2023
        #[arg(short, long)]
        year: String,

        /// Report what would be appended without writing
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error[{}]: {err:#}", error_code(&err));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_file = cli.config.as_deref();

    match cli.command {
        Command::InitConfig => config::init_config(config_file)?,

        Command::Create => {
            let cfg = config::load_config(config_file)?;
            let db = &cfg.ledger.database;
            let mut store = open_store(db)?;
            create_all(&mut store)?;
            println!("Created {} tables in {}", Table::ALL.len(), db.display());
        }

        Command::Drop => {
            let cfg = config::load_config(config_file)?;
            let db = &cfg.ledger.database;
            let mut store = open_store(db)?;
            drop_all(&mut store)?;
            println!("Dropped {} tables from {}", Table::ALL.len(), db.display());
        }

        Command::Append { month, year, dry_run } => {
            let cfg = config::load_config(config_file)?;
            let period = Period::from_month_and_year(&month, &year)?;
            let categories = CategoryMap::load(&cfg.categories.path).with_context(|| {
                format!("load category mapping {}", cfg.categories.path.display())
            })?;
            let store = open_store(&cfg.ledger.database)?;
            ensure_created(&store)?;

            let mut pipeline = Pipeline::new(&cfg.sources, &categories, store);
            let summary = if dry_run {
                pipeline.preview(period)?
            } else {
                pipeline
                    .append_period(period)
                    .with_context(|| format!("append {period}"))?
            };
            print_summary(&summary);
        }
    }

    Ok(())
}

fn open_store(path: &Path) -> Result<SqliteStore> {
    SqliteStore::open(path).with_context(|| format!("open ledger {}", path.display()))
}

fn ensure_created(store: &SqliteStore) -> Result<()> {
    for table in Table::ALL {
        if !store.table_exists(table)? {
            return Err(LedgerError::MissingTable(table.name().to_string()))
                .context("run `tally create` first");
        }
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let verb = if summary.dry_run { "would append" } else { "appended" };
    for r in &summary.reports {
        println!(
            "{:<22} {verb} {:>5} of {:>5} (skipped {})",
            r.table.name(),
            r.accepted,
            r.candidates,
            r.rejected
        );
    }
    if summary.is_noop() {
        println!("\nNothing new for {}", summary.period);
    } else {
        println!("\n{} rows for {}", summary.accepted(), summary.period);
    }
}

/// Stable code of the underlying failure, for scripts reading stderr.
fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<LedgerError>() {
        return e.error_code();
    }
    if let Some(e) = err.downcast_ref::<tally_core::Error>() {
        return e.error_code();
    }
    "ERROR"
}
