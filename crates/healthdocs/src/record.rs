//! Core document record types for healthdocs.
//!
//! This module defines the metadata kept for every uploaded document and the
//! fixed set of categories a document can be filed under.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// MIME type of every document this store accepts.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// The category a document is filed under.
///
/// Serialized as its human-readable label, so stored collections stay
/// readable by anything that understood the original layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentCategory {
    /// Results of a general examination or checkup.
    #[serde(rename = "Medical Report")]
    MedicalReport,
    /// Laboratory test results.
    #[serde(rename = "Lab Results")]
    LabResults,
    /// A medication prescription.
    #[serde(rename = "Prescription")]
    Prescription,
    /// Insurance policy or claim paperwork.
    #[serde(rename = "Insurance Document")]
    InsuranceDocument,
    /// Immunization record.
    #[serde(rename = "Vaccination Record")]
    VaccinationRecord,
    /// Summary issued on leaving hospital care.
    #[serde(rename = "Discharge Summary")]
    DischargeSummary,
    /// Referral to a specialist.
    #[serde(rename = "Referral Letter")]
    ReferralLetter,
    /// Anything else.
    #[serde(rename = "Other")]
    Other,
}

impl DocumentCategory {
    /// Every category, in display order.
    pub const ALL: [DocumentCategory; 8] = [
        Self::MedicalReport,
        Self::LabResults,
        Self::Prescription,
        Self::InsuranceDocument,
        Self::VaccinationRecord,
        Self::DischargeSummary,
        Self::ReferralLetter,
        Self::Other,
    ];

    /// The display label, identical to the serialized form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::MedicalReport => "Medical Report",
            Self::LabResults => "Lab Results",
            Self::Prescription => "Prescription",
            Self::InsuranceDocument => "Insurance Document",
            Self::VaccinationRecord => "Vaccination Record",
            Self::DischargeSummary => "Discharge Summary",
            Self::ReferralLetter => "Referral Letter",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DocumentCategory {
    type Err = Error;

    /// Parse a category from its label, ignoring case and treating `-`/`_`
    /// as spaces (`lab-results`, `LAB_RESULTS` and `Lab Results` all match).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();

        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// Metadata for one uploaded document.
///
/// Records are immutable once created; the store only ever inserts and
/// removes whole records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Opaque unique identifier.
    pub id: String,

    /// Original file name.
    pub name: String,

    /// Size of the file in bytes.
    ///
    /// Older collections may hold fractional sizes; they are rounded on read.
    #[serde(deserialize_with = "deserialize_size")]
    pub size: u64,

    /// MIME type of the file.
    #[serde(rename = "type")]
    pub mime_type: String,

    /// When the document was uploaded.
    pub upload_date: DateTime<Utc>,

    /// Reference to the file content (a `data:` URL or `file://` reference).
    #[serde(rename = "url")]
    pub payload: String,

    /// Category the document is filed under.
    pub category: DocumentCategory,

    /// Free-text description; empty when none was given.
    #[serde(default)]
    pub description: String,
}

impl DocumentRecord {
    /// Check the invariants every stored record must hold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] for an empty id or a blank name.
    pub fn validate(&self) -> Result<(), Error> {
        if self.id.trim().is_empty() {
            return Err(Error::invalid_document("document id is empty"));
        }
        if self.name.trim().is_empty() {
            return Err(Error::invalid_document("document name is empty"));
        }
        Ok(())
    }

    /// Check if the description is present.
    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Check whether `query` occurs in the name or description, ignoring case.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }

    /// Human-readable size, e.g. `1.50 MB`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn display_size(&self) -> String {
        const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

        if self.size == 0 {
            return "0 Bytes".to_string();
        }

        let mut value = self.size as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }

        if unit == 0 {
            format!("{} {}", self.size, UNITS[0])
        } else {
            format!("{value:.2} {}", UNITS[unit])
        }
    }
}

/// Accept any non-negative JSON number as a byte size, rounding fractions.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn deserialize_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(size) = number.as_u64() {
        return Ok(size);
    }

    match number.as_f64() {
        Some(size) if size.is_finite() && size >= 0.0 && size < u64::MAX as f64 => {
            Ok(size.round() as u64)
        }
        _ => Err(de::Error::custom(format!(
            "invalid document size {number}, expected a non-negative number"
        ))),
    }
}

/// A document the upload flow wants stored.
///
/// Carries everything except the fields the store assigns itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    /// Original file name.
    pub name: String,
    /// Size of the file in bytes.
    pub size: u64,
    /// MIME type of the file.
    pub mime_type: String,
    /// Reference to the file content.
    pub payload: String,
    /// Category chosen by the user.
    pub category: DocumentCategory,
    /// Optional free-text description.
    pub description: String,
}

impl NewDocument {
    /// Create a candidate PDF document with an empty description.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        size: u64,
        payload: impl Into<String>,
        category: DocumentCategory,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: PDF_MIME_TYPE.to_string(),
            payload: payload.into(),
            category,
            description: String::new(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Turn the candidate into a record with a fresh id and the current time.
    #[must_use]
    pub fn into_record(self) -> DocumentRecord {
        DocumentRecord {
            id: generate_id(),
            name: self.name,
            size: self.size,
            mime_type: self.mime_type,
            upload_date: Utc::now(),
            payload: self.payload,
            category: self.category,
            description: self.description,
        }
    }
}

/// Generate a new opaque record id.
#[must_use]
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}
