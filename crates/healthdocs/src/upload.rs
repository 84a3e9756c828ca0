//! Upload preparation.
//!
//! Turns a file on disk into a [`NewDocument`] ready for the store, applying
//! the same checks the upload form does: the file must be of the allowed type
//! (detected from its magic bytes, not its extension), fit under the size
//! limit, and carry a category.

use std::io::Read;
use std::path::Path;

use base64::Engine as _;
use regex::Regex;
use tracing::debug;

use crate::config::UploadConfig;
use crate::error::{Error, Result};
use crate::record::{DocumentCategory, NewDocument};

/// Fallback MIME type for content we don't recognize.
const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Detect a MIME type from the first bytes of a file.
#[must_use]
pub fn sniff_mime_type(header: &[u8]) -> &'static str {
    match header {
        [0x25, 0x50, 0x44, 0x46, ..] => "application/pdf",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => "image/tiff",
        _ => UNKNOWN_MIME_TYPE,
    }
}

/// Build a `data:` URL embedding `bytes`.
#[must_use]
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime_type};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Checks candidate documents against the upload rules.
#[derive(Debug)]
pub struct UploadValidator {
    max_size_bytes: u64,
    allowed_mime_type: String,
    payload: Regex,
}

impl UploadValidator {
    /// Build a validator for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if the allowed MIME type cannot be
    /// turned into a payload pattern.
    pub fn new(config: &UploadConfig) -> Result<Self> {
        let pattern = format!(
            r"^(data:{}(;[^,]*)?,|file://.+)",
            regex::escape(&config.allowed_mime_type)
        );
        let payload = Regex::new(&pattern).map_err(|e| Error::ConfigValidation {
            message: format!("cannot build payload pattern: {e}"),
        })?;

        Ok(Self {
            max_size_bytes: config.max_size_bytes,
            allowed_mime_type: config.allowed_mime_type.clone(),
            payload,
        })
    }

    /// Largest accepted size in bytes.
    #[must_use]
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Check the MIME type and size of a file before reading it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] describing the first rule broken.
    pub fn check_file(&self, mime_type: &str, size: u64) -> Result<()> {
        if mime_type != self.allowed_mime_type {
            return Err(Error::invalid_document(format!(
                "expected a {} file, got {mime_type}",
                self.allowed_mime_type
            )));
        }
        if size > self.max_size_bytes {
            return Err(Error::invalid_document(format!(
                "file size {size} bytes exceeds the limit of {} bytes",
                self.max_size_bytes
            )));
        }
        Ok(())
    }

    /// Validate a complete candidate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] describing the first rule broken.
    pub fn validate(&self, document: &NewDocument) -> Result<()> {
        if document.name.trim().is_empty() {
            return Err(Error::invalid_document("file name is empty"));
        }
        self.check_file(&document.mime_type, document.size)?;
        if !self.payload.is_match(&document.payload) {
            return Err(Error::invalid_document(
                "payload must be a data URL of the allowed type or a file:// reference",
            ));
        }
        Ok(())
    }

    /// Read `path` and build a validated candidate document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or
    /// [`Error::InvalidDocument`] if it breaks an upload rule.
    pub fn prepare(
        &self,
        path: &Path,
        category: DocumentCategory,
        description: Option<&str>,
    ) -> Result<NewDocument> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(Error::invalid_document(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let mut file = std::fs::File::open(path)?;
        let mut header = [0u8; 8];
        let read = file.read(&mut header)?;
        let mime_type = sniff_mime_type(&header[..read]);
        debug!(path = %path.display(), mime_type, size = metadata.len(), "sniffed upload");

        // Size and type are checked before the content is read in full.
        self.check_file(mime_type, metadata.len())?;

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let document = NewDocument {
            name,
            size: bytes.len() as u64,
            mime_type: mime_type.to_string(),
            payload: data_url(mime_type, &bytes),
            category,
            description: description.unwrap_or_default().trim().to_string(),
        };
        self.validate(&document)?;
        Ok(document)
    }
}

/// Read `path` and build a candidate document using `config`'s rules.
///
/// # Errors
///
/// See [`UploadValidator::prepare`].
pub fn prepare_upload(
    path: &Path,
    category: DocumentCategory,
    description: Option<&str>,
    config: &UploadConfig,
) -> Result<NewDocument> {
    UploadValidator::new(config)?.prepare(path, category, description)
}
