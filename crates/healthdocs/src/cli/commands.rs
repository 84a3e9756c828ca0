//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::DocumentCategory;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show documents in this category (e.g. "lab-results")
    #[arg(short = 't', long, value_parser = parse_category)]
    pub category: Option<DocumentCategory>,

    /// Only show documents whose name or description contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Maximum number of documents to show
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the document
    pub id: String,

    /// Output as JSON (includes the payload)
    #[arg(short, long)]
    pub json: bool,
}

/// Upload command arguments.
#[derive(Debug, Args)]
pub struct UploadCommand {
    /// File to upload
    pub file: PathBuf,

    /// Document category (e.g. "Lab Results" or "lab-results")
    #[arg(short = 't', long, value_parser = parse_category)]
    pub category: DocumentCategory,

    /// Optional description
    #[arg(short, long)]
    pub description: Option<String>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the document to delete
    pub id: String,
}

/// Reset command arguments.
#[derive(Debug, Args)]
pub struct ResetCommand {
    /// Confirm replacing every stored document with the demo dataset
    #[arg(long)]
    pub yes: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to config file to validate (uses default if not specified)
        file: Option<PathBuf>,
    },
}

/// Output format for document listings.
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned columns
    #[default]
    Table,
    /// JSON array
    Json,
    /// One id and name per line
    Plain,
}

fn parse_category(s: &str) -> Result<DocumentCategory, String> {
    s.parse().map_err(|e: crate::error::Error| {
        let known: Vec<_> = DocumentCategory::ALL.iter().map(|c| c.label()).collect();
        format!("{e} (expected one of: {})", known.join(", "))
    })
}
