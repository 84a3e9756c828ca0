//! Command-line interface for healthdocs.
//!
//! This module provides the CLI structure and command handlers for the
//! `hdocs` binary.

mod commands;
mod handlers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DeleteCommand, ListCommand, OutputFormat, ResetCommand, ShowCommand,
    StatsCommand, UploadCommand,
};
pub use handlers::{
    handle_categories, handle_config, handle_delete, handle_list, handle_reset, handle_seed,
    handle_show, handle_stats, handle_upload, seed_on_first_run,
};

use crate::logging::Verbosity;

/// hdocs - Keep track of your health documents
///
/// Upload, categorize, browse and delete records of personal health
/// documents kept in a local database.
#[derive(Debug, Parser)]
#[command(name = "hdocs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List stored documents, most recent first
    List(ListCommand),

    /// Show one document
    Show(ShowCommand),

    /// Upload a document
    Upload(UploadCommand),

    /// Delete a document
    Delete(DeleteCommand),

    /// Load the demo documents if nothing is stored yet
    Seed,

    /// Replace all documents with the demo dataset
    Reset(ResetCommand),

    /// Show collection statistics
    Stats(StatsCommand),

    /// List the document categories
    Categories,

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
