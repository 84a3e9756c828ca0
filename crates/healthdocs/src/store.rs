//! The document record store.
//!
//! All records live as one serialized collection under a single backend key.
//! Every operation is a read of that key followed by at most one full
//! rewrite, so the last writer wins and no partial updates are possible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{DocumentCategory, DocumentRecord, NewDocument};
use crate::sample;
use crate::storage::KeyValueBackend;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "uploads";

/// Version written into the persisted envelope.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    records: &'a [DocumentRecord],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    records: Vec<DocumentRecord>,
}

/// Store for document metadata records.
///
/// Generic over the backend so tests can run against [`MemoryBackend`] and
/// the CLI against [`SqliteBackend`].
///
/// [`MemoryBackend`]: crate::storage::MemoryBackend
/// [`SqliteBackend`]: crate::storage::SqliteBackend
#[derive(Debug)]
pub struct DocumentStore<B> {
    backend: B,
    key: String,
}

impl<B: KeyValueBackend> DocumentStore<B> {
    /// Create a store using the default storage key.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Create a store that keeps its collection under `key`.
    #[must_use]
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// The storage key holding the collection.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consume the store, returning the backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Read all records, most recently created first.
    ///
    /// Accepts both the versioned envelope and a bare JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptData`] if the stored value cannot be decoded,
    /// or the backend's error if the read itself fails.
    pub fn try_list_all(&self) -> Result<Vec<DocumentRecord>> {
        match self.backend.get(&self.key)? {
            Some(raw) => self.decode(&raw),
            None => Ok(Vec::new()),
        }
    }

    /// Read all records, most recently created first.
    ///
    /// Never fails: an absent key, undecodable content or a failed read all
    /// yield an empty collection.
    #[must_use]
    pub fn list_all(&self) -> Vec<DocumentRecord> {
        self.try_list_all().unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "treating unreadable document collection as empty");
            Vec::new()
        })
    }

    /// Add a record to the front of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] if the record has an empty id or
    /// name, [`Error::DuplicateId`] if a record with the same id is stored,
    /// [`Error::CorruptData`] if the stored collection cannot be read, or
    /// [`Error::Persistence`] if the write fails. On failure the stored
    /// collection is unchanged.
    pub fn append(&self, record: DocumentRecord) -> Result<()> {
        record.validate()?;

        let mut records = self.load_for_write()?;
        if records.iter().any(|r| r.id == record.id) {
            return Err(Error::DuplicateId(record.id));
        }

        debug!(id = %record.id, name = %record.name, "appending document");
        records.insert(0, record);
        self.write(&records)
    }

    /// Assign an id and upload date to `document` and append it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] for a blank name, or any error
    /// [`append`](Self::append) returns.
    pub fn upload(&self, document: NewDocument) -> Result<DocumentRecord> {
        let record = document.into_record();
        self.append(record.clone())?;
        info!(id = %record.id, category = %record.category, "stored uploaded document");
        Ok(record)
    }

    /// Remove the record with `id`.
    ///
    /// Returns whether a record was removed; an unknown id leaves the stored
    /// collection untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptData`] if the stored collection cannot be read,
    /// or [`Error::Persistence`] if the write fails.
    pub fn remove_by_id(&self, id: &str) -> Result<bool> {
        let mut records = self.load_for_write()?;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            debug!(id, "no document to remove");
            return Ok(false);
        }

        self.write(&records)?;
        info!(id, "removed document");
        Ok(true)
    }

    /// Replace the whole collection with the demo dataset.
    ///
    /// Destroys every stored record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the write fails.
    pub fn reset_to_sample_set(&self) -> Result<Vec<DocumentRecord>> {
        let samples = sample::sample_documents();
        info!(count = samples.len(), "resetting collection to demo dataset");
        self.write(&samples)?;
        Ok(samples)
    }

    /// Seed the demo dataset if the collection is absent or empty.
    ///
    /// Returns `true` if the dataset was written. Stored content that cannot
    /// be decoded is left in place and nothing is seeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read, or
    /// [`Error::Persistence`] if the write fails.
    pub fn initialize_if_empty(&self) -> Result<bool> {
        match self.try_list_all() {
            Ok(records) if records.is_empty() => {}
            Ok(_) => {
                debug!("documents already present, skipping demo seeding");
                return Ok(false);
            }
            Err(e) if e.is_corrupt_data() => {
                warn!(key = %self.key, error = %e, "not seeding over unreadable document collection");
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        let samples = sample::sample_documents();
        info!(count = samples.len(), "seeding demo dataset");
        self.write(&samples)?;
        Ok(true)
    }

    /// Remove the storage key entirely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the backend rejects the removal.
    pub fn clear(&self) -> Result<()> {
        self.backend
            .remove(&self.key)
            .map_err(|e| Error::persistence(&self.key, e))?;
        info!(key = %self.key, "cleared document collection");
        Ok(())
    }

    /// Look up one record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<DocumentRecord> {
        self.list_all().into_iter().find(|r| r.id == id)
    }

    /// The `limit` most recently created records.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<DocumentRecord> {
        self.query(&ListQuery::default().limit(limit))
    }

    /// Records filed under `category`, in collection order.
    #[must_use]
    pub fn by_category(&self, category: DocumentCategory) -> Vec<DocumentRecord> {
        self.query(&ListQuery::default().category(category))
    }

    /// Records whose name or description contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<DocumentRecord> {
        self.query(&ListQuery::default().search(query))
    }

    /// Records matching every filter in `query`, in collection order.
    #[must_use]
    pub fn query(&self, query: &ListQuery) -> Vec<DocumentRecord> {
        query.apply(self.list_all())
    }

    /// Strict variant of [`query`](Self::query).
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`try_list_all`](Self::try_list_all).
    pub fn try_query(&self, query: &ListQuery) -> Result<Vec<DocumentRecord>> {
        Ok(query.apply(self.try_list_all()?))
    }

    /// Number of stored records.
    #[must_use]
    pub fn count(&self) -> usize {
        self.list_all().len()
    }

    /// Summary statistics over the stored collection.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats::from_records(&self.list_all());
        stats.storage_bytes = self.backend.size_on_disk();
        stats
    }

    /// Read the collection for a read-modify-write.
    ///
    /// Unlike [`list_all`](Self::list_all), nothing unreadable is mistaken
    /// for an empty collection, so a write never replaces content it could
    /// not decode.
    fn load_for_write(&self) -> Result<Vec<DocumentRecord>> {
        self.try_list_all().map_err(|e| {
            warn!(key = %self.key, error = %e, "refusing to rewrite unreadable document collection");
            e
        })
    }

    fn decode(&self, raw: &str) -> Result<Vec<DocumentRecord>> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| Error::corrupt_data(&self.key, e.to_string()))?;

        let records = match value {
            Value::Array(_) => serde_json::from_value(value)
                .map_err(|e| Error::corrupt_data(&self.key, e.to_string()))?,
            Value::Object(_) => {
                let envelope: Envelope = serde_json::from_value(value)
                    .map_err(|e| Error::corrupt_data(&self.key, e.to_string()))?;
                if envelope.version > FORMAT_VERSION {
                    return Err(Error::corrupt_data(
                        &self.key,
                        format!(
                            "format version {} is newer than supported version {FORMAT_VERSION}",
                            envelope.version
                        ),
                    ));
                }
                envelope.records
            }
            other => {
                return Err(Error::corrupt_data(
                    &self.key,
                    format!("expected an array or object, found {}", json_kind(&other)),
                ))
            }
        };

        Ok(records)
    }

    fn write(&self, records: &[DocumentRecord]) -> Result<()> {
        let envelope = EnvelopeRef {
            version: FORMAT_VERSION,
            records,
        };
        let raw =
            serde_json::to_string(&envelope).map_err(|e| Error::persistence(&self.key, e.into()))?;

        self.backend
            .set(&self.key, &raw)
            .map_err(|e| Error::persistence(&self.key, e))?;
        debug!(key = %self.key, count = records.len(), bytes = raw.len(), "wrote document collection");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Filters for listing records.
///
/// Filters combine; `limit` applies after the others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Only records in this category.
    pub category: Option<DocumentCategory>,
    /// Only records whose name or description contains this text.
    pub search: Option<String>,
    /// At most this many records.
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Restrict to `category`.
    #[must_use]
    pub fn category(mut self, category: DocumentCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Restrict to records matching `text`.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Keep at most `limit` records.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filter `records`, preserving order.
    #[must_use]
    pub fn apply(&self, mut records: Vec<DocumentRecord>) -> Vec<DocumentRecord> {
        if let Some(category) = self.category {
            records.retain(|r| r.category == category);
        }
        if let Some(text) = &self.search {
            records.retain(|r| r.matches(text));
        }
        if let Some(limit) = self.limit {
            records.truncate(limit);
        }
        records
    }
}

/// Statistics about the stored collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total number of records.
    pub total_records: usize,
    /// Sum of all record sizes in bytes.
    pub total_bytes: u64,
    /// Record count per category, every category listed in display order.
    pub by_category: Vec<(DocumentCategory, usize)>,
    /// Upload date of the oldest record.
    pub oldest_upload: Option<DateTime<Utc>>,
    /// Upload date of the newest record.
    pub newest_upload: Option<DateTime<Utc>>,
    /// Size of the backing database on disk, if the backend has one.
    pub storage_bytes: Option<u64>,
}

impl StoreStats {
    /// Compute statistics over `records`.
    #[must_use]
    pub fn from_records(records: &[DocumentRecord]) -> Self {
        let by_category = DocumentCategory::ALL
            .into_iter()
            .map(|category| {
                let n = records.iter().filter(|r| r.category == category).count();
                (category, n)
            })
            .collect();

        Self {
            total_records: records.len(),
            total_bytes: records.iter().map(|r| r.size).sum(),
            by_category,
            oldest_upload: records.iter().map(|r| r.upload_date).min(),
            newest_upload: records.iter().map(|r| r.upload_date).max(),
            storage_bytes: None,
        }
    }

    /// Number of records in `category`.
    #[must_use]
    pub fn count_for(&self, category: DocumentCategory) -> usize {
        self.by_category
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, n)| *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{sample_documents, SAMPLE_COUNT};
    use crate::storage::{MemoryBackend, SqliteBackend};

    fn create_test_store() -> DocumentStore<MemoryBackend> {
        DocumentStore::new(MemoryBackend::new())
    }

    fn candidate(name: &str, category: DocumentCategory) -> NewDocument {
        NewDocument::new(
            name,
            2048,
            "data:application/pdf;base64,JVBERi0=",
            category,
        )
    }

    fn ids(records: &[DocumentRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = create_test_store();
        assert!(store.list_all().is_empty());
        assert!(store.try_list_all().unwrap().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_appends_list_most_recent_first() {
        let store = create_test_store();

        let mut appended = Vec::new();
        for i in 0..5 {
            let record = store
                .upload(candidate(&format!("doc-{i}.pdf"), DocumentCategory::Other))
                .unwrap();
            appended.push(record.id);
        }
        appended.reverse();

        assert_eq!(ids(&store.list_all()), appended);
    }

    #[test]
    fn test_append_round_trip_preserves_fields() {
        let store = create_test_store();
        let doc = candidate("Discharge.pdf", DocumentCategory::DischargeSummary)
            .with_description("Outpatient procedure");

        let stored = store.upload(doc.clone()).unwrap();
        let listed = store.list_all();
        assert_eq!(listed.len(), 1);

        let record = &listed[0];
        assert_eq!(record, &stored);
        assert_eq!(record.name, doc.name);
        assert_eq!(record.size, doc.size);
        assert_eq!(record.mime_type, doc.mime_type);
        assert_eq!(record.payload, doc.payload);
        assert_eq!(record.category, doc.category);
        assert_eq!(record.description, doc.description);
        assert!(!record.id.is_empty());
        assert!(record.upload_date <= Utc::now());
    }

    #[test]
    fn test_append_explicit_record() {
        let store = create_test_store();
        let mut record = sample_documents().remove(0);
        record.id = "custom-1".to_string();

        store.append(record.clone()).unwrap();
        assert_eq!(store.get("custom-1"), Some(record));
    }

    #[test]
    fn test_append_duplicate_id_rejected() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();

        let duplicate = sample_documents().remove(2);
        let err = store.append(duplicate).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(ref id) if id == "pdf-003"));
        assert_eq!(store.count(), SAMPLE_COUNT);
    }

    #[test]
    fn test_remove_by_id() {
        let store = create_test_store();
        let a = store.upload(candidate("a.pdf", DocumentCategory::Other)).unwrap();
        let b = store.upload(candidate("b.pdf", DocumentCategory::Other)).unwrap();

        assert!(store.remove_by_id(&a.id).unwrap());
        let remaining = store.list_all();
        assert_eq!(ids(&remaining), vec![b.id]);
        assert!(store.get(&a.id).is_none());
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();
        let before = store.backend().get(DEFAULT_STORAGE_KEY).unwrap();

        assert!(!store.remove_by_id("does-not-exist").unwrap());
        assert!(!store.remove_by_id("does-not-exist").unwrap());

        let after = store.backend().get(DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_remove_on_empty_store_does_not_write() {
        let store = create_test_store();
        assert!(!store.remove_by_id("anything").unwrap());
        assert!(store.backend().get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_reset_returns_demo_set_regardless_of_prior_state() {
        let store = create_test_store();
        store.upload(candidate("mine.pdf", DocumentCategory::Prescription)).unwrap();
        store.remove_by_id("pdf-001").unwrap();

        let returned = store.reset_to_sample_set().unwrap();
        assert_eq!(returned, sample_documents());
        assert_eq!(store.list_all(), sample_documents());
    }

    #[test]
    fn test_initialize_if_empty_seeds_once() {
        let store = create_test_store();

        assert!(store.initialize_if_empty().unwrap());
        assert_eq!(store.list_all(), sample_documents());

        assert!(!store.initialize_if_empty().unwrap());
        assert_eq!(store.count(), SAMPLE_COUNT);
    }

    #[test]
    fn test_initialize_if_empty_keeps_user_data() {
        let store = create_test_store();
        let mine = store.upload(candidate("mine.pdf", DocumentCategory::Other)).unwrap();

        assert!(!store.initialize_if_empty().unwrap());
        assert_eq!(store.list_all(), vec![mine]);
    }

    #[test]
    fn test_initialize_if_empty_seeds_explicit_empty_array() {
        let backend = MemoryBackend::new();
        backend.insert_raw(DEFAULT_STORAGE_KEY, "[]");
        let store = DocumentStore::new(backend);

        assert!(store.initialize_if_empty().unwrap());
        assert_eq!(store.count(), SAMPLE_COUNT);
    }

    #[test]
    fn test_demo_scenario_remove_pdf_003() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();
        assert_eq!(store.list_all().len(), 8);

        assert!(store.remove_by_id("pdf-003").unwrap());
        let records = store.list_all();
        assert_eq!(records.len(), 7);
        assert!(records.iter().all(|r| r.id != "pdf-003"));
    }

    #[test]
    fn test_malformed_content_lists_as_empty() {
        for raw in [
            "not json",
            "{\"records\": 5}",
            "42",
            "null",
            "\"uploads\"",
            "[{\"id\": 1}]",
            "[{\"id\":\"x\",\"name\":\"a.pdf\",\"size\":1,\"type\":\"application/pdf\",\"uploadDate\":\"2024-01-01T00:00:00Z\",\"url\":\"data:,\",\"category\":\"Dental\"}]",
        ] {
            let backend = MemoryBackend::new();
            backend.insert_raw(DEFAULT_STORAGE_KEY, raw);
            let store = DocumentStore::new(backend);

            assert!(store.list_all().is_empty(), "expected empty for {raw}");
            let err = store.try_list_all().unwrap_err();
            assert!(err.is_corrupt_data(), "expected corrupt data for {raw}");
        }
    }

    #[test]
    fn test_newer_format_version_is_corrupt() {
        let backend = MemoryBackend::new();
        backend.insert_raw(DEFAULT_STORAGE_KEY, r#"{"version": 99, "records": []}"#);
        let store = DocumentStore::new(backend);

        let err = store.try_list_all().unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
        assert!(store.list_all().is_empty());
    }

    /// A collection as the browser app left it: bare array, fractional
    /// sizes, millisecond timestamps.
    const BROWSER_COLLECTION: &str = r#"[
        {"id":"k3j9x2m1q","name":"MRI Report.pdf","size":1000,"type":"application/pdf",
         "uploadDate":"2024-05-02T08:12:45.123Z","url":"data:application/pdf;base64,JVBERi0=",
         "category":"Medical Report","description":""},
        {"id":"pdf-005","name":"Insurance Policy - Health Coverage.pdf","size":2306867.2,
         "type":"application/pdf","uploadDate":"2024-01-15T09:45:00Z",
         "url":"data:application/pdf;base64,JVBERi0=","category":"Insurance Document",
         "description":"Annual health insurance policy and coverage details."},
        {"id":"pdf-007","name":"Hospital Discharge Summary.pdf","size":1153433.6,
         "type":"application/pdf","uploadDate":"2024-03-22T16:15:00.000Z",
         "url":"data:application/pdf;base64,JVBERi0=","category":"Discharge Summary",
         "description":"Discharge summary following minor outpatient procedure."}
    ]"#;

    fn store_with_raw(raw: &str) -> DocumentStore<MemoryBackend> {
        let backend = MemoryBackend::new();
        backend.insert_raw(DEFAULT_STORAGE_KEY, raw);
        DocumentStore::new(backend)
    }

    fn stored_raw<B: KeyValueBackend>(store: &DocumentStore<B>) -> Option<String> {
        store.backend().get(store.key()).unwrap()
    }

    /// Backend whose reads always fail.
    #[derive(Debug)]
    struct UnreadableBackend;

    impl KeyValueBackend for UnreadableBackend {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::internal("disk unavailable"))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            panic!("write attempted after a failed read");
        }

        fn remove(&self, _key: &str) -> Result<()> {
            panic!("remove attempted after a failed read");
        }
    }

    #[test]
    fn test_browser_collection_is_readable() {
        let store = store_with_raw(BROWSER_COLLECTION);

        let records = store.try_list_all().unwrap();
        assert_eq!(ids(&records), vec!["k3j9x2m1q", "pdf-005", "pdf-007"]);
        assert_eq!(records[0].size, 1000);
        assert_eq!(records[1].size, 2_306_867);
        assert_eq!(records[2].size, 1_153_434);
        assert_eq!(records[0].upload_date.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_browser_collection_is_not_reseeded() {
        let store = store_with_raw(BROWSER_COLLECTION);

        assert!(!store.initialize_if_empty().unwrap());
        assert!(store.get("k3j9x2m1q").is_some());
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_legacy_bare_array_upgrades_on_write() {
        let store = store_with_raw(BROWSER_COLLECTION);

        // Next write upgrades to the versioned envelope
        assert!(store.remove_by_id("pdf-007").unwrap());
        let raw = stored_raw(&store).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], FORMAT_VERSION);
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
        assert_eq!(value["records"][1]["size"], 2_306_867);
    }

    #[test]
    fn test_newer_version_survives_initialize_if_empty() {
        let raw = r#"{"version":2,"records":[{"id":"keep"}]}"#;
        let store = store_with_raw(raw);

        assert!(!store.initialize_if_empty().unwrap());
        assert_eq!(stored_raw(&store).as_deref(), Some(raw));
    }

    #[test]
    fn test_writes_refuse_to_overwrite_unreadable_content() {
        for raw in ["{{{{", r#"{"version":2,"records":[{"id":"keep"}]}"#] {
            let store = store_with_raw(raw);

            let err = store
                .upload(candidate("a.pdf", DocumentCategory::Other))
                .unwrap_err();
            assert!(err.is_corrupt_data(), "append over {raw}");

            let err = store.remove_by_id("keep").unwrap_err();
            assert!(err.is_corrupt_data(), "remove over {raw}");

            assert_eq!(stored_raw(&store).as_deref(), Some(raw));
        }
    }

    #[test]
    fn test_reset_recovers_unreadable_content() {
        let store = store_with_raw("{{{{");
        store.reset_to_sample_set().unwrap();
        assert_eq!(store.try_list_all().unwrap(), sample_documents());
    }

    #[test]
    fn test_backend_read_failure_is_not_overwritten() {
        let store = DocumentStore::new(UnreadableBackend);

        assert!(store.list_all().is_empty());
        assert!(matches!(
            store.initialize_if_empty().unwrap_err(),
            Error::Internal(_)
        ));
        assert!(matches!(
            store
                .upload(candidate("a.pdf", DocumentCategory::Other))
                .unwrap_err(),
            Error::Internal(_)
        ));
        assert!(matches!(
            store.remove_by_id("pdf-001").unwrap_err(),
            Error::Internal(_)
        ));
    }

    #[test]
    fn test_blank_name_rejected() {
        let store = create_test_store();

        let err = store
            .upload(candidate("  ", DocumentCategory::Other))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDocument { .. }));

        let mut record = sample_documents().remove(0);
        record.name = String::new();
        assert!(store.append(record).is_err());
        assert!(stored_raw(&store).is_none());
    }

    #[test]
    fn test_quota_failure_surfaces_persistence_error() {
        let store = DocumentStore::new(MemoryBackend::with_quota(200));
        let big = NewDocument::new(
            "huge.pdf",
            10,
            format!("data:application/pdf;base64,{}", "A".repeat(1000)),
            DocumentCategory::Other,
        );

        let err = store.upload(big).unwrap_err();
        assert!(err.is_persistence_error());
        match err {
            Error::Persistence { key, source } => {
                assert_eq!(key, DEFAULT_STORAGE_KEY);
                assert!(matches!(*source, Error::QuotaExceeded { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn test_quota_failure_leaves_previous_collection() {
        let store = DocumentStore::new(MemoryBackend::with_quota(2_000));
        let small = store.upload(candidate("small.pdf", DocumentCategory::Other)).unwrap();

        let big = NewDocument::new(
            "big.pdf",
            10,
            format!("data:application/pdf;base64,{}", "A".repeat(4_000)),
            DocumentCategory::Other,
        );
        assert!(store.upload(big).is_err());
        assert_eq!(store.list_all(), vec![small]);
    }

    #[test]
    fn test_reset_fails_when_demo_set_exceeds_quota() {
        let store = DocumentStore::new(MemoryBackend::with_quota(64));
        let err = store.reset_to_sample_set().unwrap_err();
        assert!(err.is_persistence_error());
    }

    #[test]
    fn test_custom_key_isolated() {
        let backend = MemoryBackend::new();
        let store_a = DocumentStore::with_key(&backend, "a");
        let store_b = DocumentStore::with_key(&backend, "b");

        store_a.initialize_if_empty().unwrap();
        assert_eq!(store_a.key(), "a");
        assert_eq!(store_a.count(), SAMPLE_COUNT);
        assert_eq!(store_b.count(), 0);
    }

    #[test]
    fn test_clear_removes_key() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();
        store.clear().unwrap();

        assert!(store.backend().get(DEFAULT_STORAGE_KEY).unwrap().is_none());
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn test_recent() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();
        let newest = store.upload(candidate("new.pdf", DocumentCategory::Other)).unwrap();

        let recent = store.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0], newest);
        assert_eq!(recent[1].id, "pdf-001");
        assert!(store.recent(0).is_empty());
        assert_eq!(store.recent(100).len(), SAMPLE_COUNT + 1);
    }

    #[test]
    fn test_by_category() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();

        let labs = store.by_category(DocumentCategory::LabResults);
        assert_eq!(ids(&labs), vec!["pdf-002", "pdf-008"]);
        assert!(store.by_category(DocumentCategory::Other).is_empty());
    }

    #[test]
    fn test_search() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();

        assert_eq!(ids(&store.search("cholesterol")), vec!["pdf-008"]);
        assert_eq!(ids(&store.search("LAB RESULTS")), vec!["pdf-002", "pdf-008"]);
        assert!(store.search("dental").is_empty());
        assert_eq!(store.search("").len(), SAMPLE_COUNT);
    }

    #[test]
    fn test_query_combines_filters() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();

        let query = ListQuery::default()
            .category(DocumentCategory::LabResults)
            .search("panel");
        assert_eq!(ids(&store.query(&query)), vec!["pdf-002", "pdf-008"]);
        assert_eq!(ids(&store.query(&query.limit(1))), vec!["pdf-002"]);
        assert_eq!(store.query(&ListQuery::default()).len(), SAMPLE_COUNT);
    }

    #[test]
    fn test_try_query_reports_corruption() {
        let store = store_with_raw("[1, 2]");
        assert!(store.query(&ListQuery::default()).is_empty());
        assert!(store
            .try_query(&ListQuery::default())
            .unwrap_err()
            .is_corrupt_data());
    }

    #[test]
    fn test_stats_empty() {
        let stats = create_test_store().stats();
        assert_eq!(stats.total_records, 0);
        assert_eq!(stats.total_bytes, 0);
        assert_eq!(stats.by_category.len(), DocumentCategory::ALL.len());
        assert!(stats.oldest_upload.is_none());
        assert!(stats.newest_upload.is_none());
        assert!(stats.storage_bytes.is_none());
    }

    #[test]
    fn test_stats_demo_set() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();
        let stats = store.stats();

        let samples = sample_documents();
        assert_eq!(stats.total_records, SAMPLE_COUNT);
        assert_eq!(
            stats.total_bytes,
            samples.iter().map(|r| r.size).sum::<u64>()
        );
        assert_eq!(stats.count_for(DocumentCategory::LabResults), 2);
        assert_eq!(stats.count_for(DocumentCategory::Other), 0);
        assert_eq!(stats.oldest_upload, Some(samples[0].upload_date));
        assert_eq!(stats.newest_upload, Some(samples[7].upload_date));
    }

    #[test]
    fn test_sqlite_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("documents.db");

        let uploaded = {
            let store = DocumentStore::new(SqliteBackend::open(&db_path).unwrap());
            store.initialize_if_empty().unwrap();
            store.remove_by_id("pdf-003").unwrap();
            store.upload(candidate("new.pdf", DocumentCategory::Other)).unwrap()
        };

        let store = DocumentStore::new(SqliteBackend::open(&db_path).unwrap());
        let records = store.list_all();
        assert_eq!(records.len(), SAMPLE_COUNT);
        assert_eq!(records[0], uploaded);
        assert!(store.get("pdf-003").is_none());
        assert!(!store.initialize_if_empty().unwrap());
        assert!(store.stats().storage_bytes.is_some_and(|bytes| bytes > 0));
    }

    #[test]
    fn test_into_backend() {
        let store = create_test_store();
        store.initialize_if_empty().unwrap();
        let backend = store.into_backend();
        assert!(backend.get(DEFAULT_STORAGE_KEY).unwrap().is_some());
    }
}
