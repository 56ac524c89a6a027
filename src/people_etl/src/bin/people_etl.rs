use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use people_etl::config::load_config_path;
use people_etl::io::{TABLE_CHAPTER, TABLE_CONS, TABLE_CONS_EMAIL, read_raw_tables};
use people_etl::models::ChapterId;
use people_etl::pipeline::{RunOptions, run};
use people_etl::profile::profile_table;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Constituent people / acquisition facts builder")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Build people.csv and acquisition_facts.csv
    Run {
        /// Pipeline config (TOML); defaults apply when omitted
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Chapter to report subscription state for (overrides config and env)
        #[arg(long)]
        chapter_id: Option<i64>,
        /// Compute both tables without writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Print per-column profiles of the configured extracts
    Profile {
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Run {
            config,
            chapter_id,
            dry_run,
        } => {
            let mut cfg = load_config_path(config.as_deref()).context("load pipeline config")?;
            if let Some(id) = chapter_id {
                cfg.chapter_id = ChapterId(id);
            }

            let summary = run(&cfg, RunOptions { dry_run }).context("pipeline run failed")?;

            if dry_run {
                for row in summary.output.people.iter().take(5) {
                    info!(?row, "people preview");
                }
                for row in summary.output.acquisitions.iter().take(5) {
                    info!(day = %row.acquisition_day, count = row.count, "acquisition preview");
                }
            }
            for path in &summary.written {
                println!("{}", path.display());
            }
        }
        Cmd::Profile { config } => {
            let cfg = load_config_path(config.as_deref()).context("load pipeline config")?;
            let raw = read_raw_tables(&cfg.inputs)?;
            for (table, df) in [
                (TABLE_CONS, &raw.cons),
                (TABLE_CONS_EMAIL, &raw.cons_email),
                (TABLE_CHAPTER, &raw.chapter),
            ] {
                println!("{table}");
                for p in profile_table(df)? {
                    println!("  {p}");
                }
            }
        }
    }

    Ok(())
}
