//! Command handlers.
//!
//! Each handler runs one subcommand against a store and writes its
//! human-facing output to `out`. Store errors propagate to the caller.

use std::io::Write;

use tracing::info;

use super::commands::{
    ConfigCommand, DeleteCommand, ListCommand, OutputFormat, ResetCommand, ShowCommand,
    StatsCommand, UploadCommand,
};
use crate::config::{Config, UploadConfig};
use crate::error::{Error, Result};
use crate::record::{DocumentCategory, DocumentRecord};
use crate::storage::KeyValueBackend;
use crate::store::{DocumentStore, ListQuery};
use crate::upload::prepare_upload;

/// Seed the demo dataset the first time a store is used.
///
/// Only an absent key counts as first use, so a collection the user emptied
/// by deleting everything stays empty.
///
/// # Errors
///
/// Returns an error if the backend cannot be read or the seed write fails.
pub fn seed_on_first_run<B: KeyValueBackend>(store: &DocumentStore<B>) -> Result<bool> {
    if store.backend().get(store.key())?.is_some() {
        return Ok(false);
    }
    info!("first run, loading demo documents");
    store.initialize_if_empty()
}

/// `list`: print stored documents, most recent first.
///
/// # Errors
///
/// Returns an error if output fails, or if `strict` is set and the stored
/// collection is corrupt.
pub fn handle_list<B: KeyValueBackend, W: Write>(
    store: &DocumentStore<B>,
    cmd: &ListCommand,
    strict: bool,
    out: &mut W,
) -> Result<()> {
    let query = ListQuery {
        category: cmd.category,
        search: cmd.search.clone(),
        limit: cmd.limit,
    };
    let records = if strict {
        store.try_query(&query)?
    } else {
        store.query(&query)
    };

    match cmd.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &records)?;
            writeln!(out)?;
        }
        OutputFormat::Plain => {
            for record in &records {
                writeln!(out, "{}\t{}", record.id, record.name)?;
            }
        }
        OutputFormat::Table => write_table(&records, out)?,
    }
    Ok(())
}

fn write_table<W: Write>(records: &[DocumentRecord], out: &mut W) -> Result<()> {
    if records.is_empty() {
        writeln!(out, "No documents stored.")?;
        return Ok(());
    }

    let id_width = records.iter().map(|r| r.id.len()).max().unwrap_or(2).max(2);
    writeln!(
        out,
        "{:<id_width$}  {:<18}  {:>10}  {:<16}  NAME",
        "ID", "CATEGORY", "SIZE", "UPLOADED"
    )?;
    for record in records {
        writeln!(
            out,
            "{:<id_width$}  {:<18}  {:>10}  {:<16}  {}",
            record.id,
            record.category.label(),
            record.display_size(),
            record.upload_date.format("%Y-%m-%d %H:%M"),
            record.name
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{} document(s)", records.len())?;
    Ok(())
}

/// `show`: print one document.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id, or an output error.
pub fn handle_show<B: KeyValueBackend, W: Write>(
    store: &DocumentStore<B>,
    cmd: &ShowCommand,
    out: &mut W,
) -> Result<()> {
    let record = store
        .get(&cmd.id)
        .ok_or_else(|| Error::NotFound(cmd.id.clone()))?;

    if cmd.json {
        serde_json::to_writer_pretty(&mut *out, &record)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Id:          {}", record.id)?;
    writeln!(out, "Name:        {}", record.name)?;
    writeln!(out, "Category:    {}", record.category)?;
    writeln!(out, "Type:        {}", record.mime_type)?;
    writeln!(out, "Size:        {} ({} bytes)", record.display_size(), record.size)?;
    writeln!(out, "Uploaded:    {}", record.upload_date.to_rfc3339())?;
    if record.has_description() {
        writeln!(out, "Description: {}", record.description)?;
    }
    writeln!(out, "Payload:     {}", payload_summary(&record.payload))?;
    Ok(())
}

fn payload_summary(payload: &str) -> String {
    match payload.split_once(',') {
        Some((header, data)) if header.starts_with("data:") => {
            format!("{header}, {} encoded bytes", data.len())
        }
        _ => payload.to_string(),
    }
}

/// `upload`: read a file and store it as a new document.
///
/// # Errors
///
/// Returns [`Error::InvalidDocument`] if the file breaks an upload rule,
/// [`Error::CorruptData`] if the stored collection cannot be read,
/// [`Error::Persistence`] if it cannot be stored, or an I/O error.
pub fn handle_upload<B: KeyValueBackend, W: Write>(
    store: &DocumentStore<B>,
    cmd: &UploadCommand,
    config: &UploadConfig,
    out: &mut W,
) -> Result<()> {
    let document = prepare_upload(
        &cmd.file,
        cmd.category,
        cmd.description.as_deref(),
        config,
    )?;
    let record = store.upload(document)?;
    writeln!(
        out,
        "Uploaded {} ({}) as {}",
        record.name,
        record.display_size(),
        record.id
    )?;
    Ok(())
}

/// `delete`: remove a document. An unknown id is reported, not an error.
///
/// # Errors
///
/// Returns [`Error::CorruptData`] if the stored collection cannot be read, or
/// [`Error::Persistence`] if the removal cannot be stored.
pub fn handle_delete<B: KeyValueBackend, W: Write>(
    store: &DocumentStore<B>,
    cmd: &DeleteCommand,
    out: &mut W,
) -> Result<()> {
    if store.remove_by_id(&cmd.id)? {
        writeln!(out, "Deleted {}", cmd.id)?;
    } else {
        writeln!(out, "No document with id {}; nothing deleted.", cmd.id)?;
    }
    Ok(())
}

/// `seed`: load the demo dataset if the collection is empty.
///
/// # Errors
///
/// Returns [`Error::Persistence`] if the dataset cannot be stored.
pub fn handle_seed<B: KeyValueBackend, W: Write>(
    store: &DocumentStore<B>,
    out: &mut W,
) -> Result<()> {
    if store.initialize_if_empty()? {
        writeln!(out, "Loaded {} demo documents.", store.count())?;
    } else {
        writeln!(out, "Documents already stored; nothing loaded.")?;
    }
    Ok(())
}

/// `reset`: replace every document with the demo dataset.
///
/// Does nothing unless confirmed with `--yes`.
///
/// # Errors
///
/// Returns [`Error::Persistence`] if the dataset cannot be stored.
pub fn handle_reset<B: KeyValueBackend, W: Write>(
    store: &DocumentStore<B>,
    cmd: &ResetCommand,
    out: &mut W,
) -> Result<()> {
    if !cmd.yes {
        let count = store.count();
        writeln!(
            out,
            "This will delete all {count} stored document(s) and load the demo dataset."
        )?;
        writeln!(out, "Use --yes to confirm.")?;
        return Ok(());
    }

    let samples = store.reset_to_sample_set()?;
    writeln!(out, "Reset to {} demo documents.", samples.len())?;
    Ok(())
}

/// `stats`: print collection statistics.
///
/// # Errors
///
/// Returns an output error.
pub fn handle_stats<B: KeyValueBackend, W: Write>(
    store: &DocumentStore<B>,
    cmd: &StatsCommand,
    out: &mut W,
) -> Result<()> {
    let stats = store.stats();

    if cmd.json {
        let by_category: serde_json::Map<String, serde_json::Value> = stats
            .by_category
            .iter()
            .map(|(c, n)| (c.label().to_string(), (*n).into()))
            .collect();
        let value = serde_json::json!({
            "total_records": stats.total_records,
            "total_bytes": stats.total_bytes,
            "by_category": by_category,
            "oldest_upload": stats.oldest_upload,
            "newest_upload": stats.newest_upload,
            "storage_bytes": stats.storage_bytes,
        });
        serde_json::to_writer_pretty(&mut *out, &value)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Documents:     {}", stats.total_records)?;
    writeln!(out, "Total size:    {} bytes", stats.total_bytes)?;
    if let (Some(oldest), Some(newest)) = (stats.oldest_upload, stats.newest_upload) {
        writeln!(out, "Oldest upload: {}", oldest.format("%Y-%m-%d"))?;
        writeln!(out, "Newest upload: {}", newest.format("%Y-%m-%d"))?;
    }
    if let Some(bytes) = stats.storage_bytes {
        writeln!(out, "Database size: {bytes} bytes")?;
    }
    writeln!(out)?;
    for (category, n) in &stats.by_category {
        writeln!(out, "  {:<20} {n}", category.label())?;
    }
    Ok(())
}

/// `categories`: print the fixed category list.
///
/// # Errors
///
/// Returns an output error.
pub fn handle_categories<W: Write>(out: &mut W) -> Result<()> {
    for category in DocumentCategory::ALL {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

/// `config`: show or check configuration.
///
/// # Errors
///
/// Returns an output or serialization error.
pub fn handle_config<W: Write>(config: &Config, cmd: ConfigCommand, out: &mut W) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                serde_json::to_writer_pretty(&mut *out, config)?;
                writeln!(out)?;
            } else {
                writeln!(out, "Current Configuration")?;
                writeln!(out, "=====================")?;
                writeln!(out)?;
                writeln!(out, "[Storage]")?;
                writeln!(out, "  Database path:      {}", config.database_path().display())?;
                writeln!(out, "  Storage key:        {}", config.storage.storage_key)?;
                writeln!(out, "  Seed on first run:  {}", config.storage.seed_on_first_run)?;
                writeln!(out, "  Strict reads:       {}", config.storage.strict_reads)?;
                writeln!(out)?;
                writeln!(out, "[Upload]")?;
                writeln!(out, "  Max size (bytes):   {}", config.upload.max_size_bytes)?;
                writeln!(out, "  Allowed type:       {}", config.upload.allowed_mime_type)?;
            }
        }
        ConfigCommand::Path => {
            writeln!(out, "{}", Config::default_config_path().display())?;
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            writeln!(out, "Validating configuration: {}", path.display())?;
            match Config::load_from(Some(path)) {
                Ok(_) => writeln!(out, "Configuration is valid.")?,
                Err(e) => writeln!(out, "Configuration error: {e}")?,
            }
        }
    }
    Ok(())
}
