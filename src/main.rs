//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `table_loader` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All loading logic is implemented in the library crate.

use std::process;

use anyhow::{bail, Context, Result};
use structopt::StructOpt;

use table_loader::import::import_csv;
use table_loader::initialization::init_logger_with;
use table_loader::{LoadSummary, Loader, Opt, SqliteBackend};

fn main() -> Result<()> {
    let opt = Opt::from_args();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(&opt) {
        Ok(summary) => {
            println!(
                "✅ Loaded {} row(s) into {} ({} flush(es)). Database: {}",
                summary.rows_inserted,
                opt.table,
                summary.flushes,
                opt.db_path.display()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("table_loader error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(opt: &Opt) -> Result<LoadSummary> {
    if !opt.delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got {:?}", opt.delimiter);
    }

    let mut backend = SqliteBackend::open(&opt.db_path)
        .with_context(|| format!("Failed to open database {}", opt.db_path.display()))?;

    let mut loader = Loader::new(&mut backend, opt.loader_config());
    loader
        .open()
        .with_context(|| format!("Failed to open load into {}", opt.table))?;

    import_csv(&mut loader, &opt.file, opt.delimiter as u8)?;

    let summary = loader.close().context("Failed to finish load")?;
    Ok(summary)
}
