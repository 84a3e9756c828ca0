//! `hdocs` - CLI for healthdocs
//!
//! This binary provides the command-line interface for uploading, browsing
//! and deleting health document records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;

use clap::Parser;
use tracing::debug;

use healthdocs::cli::{self, Cli, Command};
use healthdocs::{init_logging, Config, DocumentStore, SqliteBackend};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    // Commands that never touch the database
    match cli.command {
        Command::Config(config_cmd) => {
            cli::handle_config(&config, config_cmd, &mut out)?;
            return Ok(());
        }
        Command::Categories => {
            cli::handle_categories(&mut out)?;
            return Ok(());
        }
        _ => {}
    }

    let backend = SqliteBackend::open(config.database_path())?;
    let store = DocumentStore::with_key(backend, &config.storage.storage_key);
    debug!(key = store.key(), "store ready");

    let explicit_seeding = matches!(cli.command, Command::Seed | Command::Reset(_));
    if config.storage.seed_on_first_run && !explicit_seeding {
        cli::seed_on_first_run(&store)?;
    }

    match cli.command {
        Command::List(cmd) => {
            cli::handle_list(&store, &cmd, config.storage.strict_reads, &mut out)?;
        }
        Command::Show(cmd) => cli::handle_show(&store, &cmd, &mut out)?,
        Command::Upload(cmd) => cli::handle_upload(&store, &cmd, &config.upload, &mut out)?,
        Command::Delete(cmd) => cli::handle_delete(&store, &cmd, &mut out)?,
        Command::Seed => cli::handle_seed(&store, &mut out)?,
        Command::Reset(cmd) => cli::handle_reset(&store, &cmd, &mut out)?,
        Command::Stats(cmd) => cli::handle_stats(&store, &cmd, &mut out)?,
        Command::Config(_) | Command::Categories => {}
    }

    out.flush()?;
    Ok(())
}
