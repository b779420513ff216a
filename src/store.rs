use crate::catalog;
use crate::errors::TrackerError;
use crate::models::{Database, Entry, Meta, SCHEMA_VERSION};
use serde_json::Value;
use tracing::{debug, info, warn};

/// In-memory copy of the persisted document. Entries stay sorted by date
/// with at most one entry per date.
#[derive(Debug, Clone)]
pub struct EntryStore {
    db: Database,
}

impl EntryStore {
    pub fn new(created: impl Into<String>) -> Self {
        Self {
            db: Database::empty(created),
        }
    }

    pub fn meta(&self) -> &Meta {
        &self.db.meta
    }

    pub fn entries(&self) -> &[Entry] {
        &self.db.entries
    }

    pub fn len(&self) -> usize {
        self.db.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.entries.is_empty()
    }

    /// Last write wins for a given date.
    pub fn upsert(&mut self, entry: Entry) {
        match self.db.entries.iter_mut().find(|existing| existing.date == entry.date) {
            Some(existing) => *existing = entry,
            None => self.db.entries.push(entry),
        }
        self.sort();
    }

    pub fn sort(&mut self) {
        // ISO dates are zero padded, so string order is date order.
        self.db.entries.sort_by(|a, b| a.date.cmp(&b.date));
    }

    pub fn latest(&self) -> Option<&Entry> {
        self.db.entries.last()
    }

    /// Replaces the whole database with the parsed document. The store is
    /// left untouched when the bytes are rejected.
    pub fn load(&mut self, bytes: &[u8], today: &str) -> Result<(), TrackerError> {
        let db = parse_database(bytes, today)?;
        info!(entries = db.entries.len(), version = db.meta.version, "database loaded");
        self.db = db;
        self.sort();
        self.merge_duplicate_dates();
        Ok(())
    }

    /// Keeps the last entry written for each date. Expects sorted entries;
    /// the sort is stable, so document order decides among equal dates.
    fn merge_duplicate_dates(&mut self) {
        let before = self.db.entries.len();
        self.db.entries.reverse();
        self.db.entries.dedup_by(|later, earlier| later.date == earlier.date);
        self.db.entries.reverse();
        let dropped = before - self.db.entries.len();
        if dropped > 0 {
            warn!(dropped, "merged duplicate entries for the same date");
        }
    }

    pub fn save(&self) -> Result<Vec<u8>, TrackerError> {
        Ok(serde_json::to_vec_pretty(&self.db)?)
    }
}

fn parse_database(bytes: &[u8], today: &str) -> Result<Database, TrackerError> {
    let mut doc: Value = serde_json::from_slice(bytes)
        .map_err(|err| TrackerError::InvalidFormat(err.to_string()))?;

    let Some(root) = doc.as_object_mut() else {
        return Err(TrackerError::InvalidFormat("top-level value is not an object".into()));
    };
    if !root.get("entries").is_some_and(Value::is_array) {
        return Err(TrackerError::InvalidFormat("'entries' is not an array".into()));
    }

    migrate(root, today);

    serde_json::from_value(doc).map_err(|err| TrackerError::InvalidFormat(err.to_string()))
}

/// Brings an older document up to the current schema in place. Version 1
/// files only differ in lacking the supplement metrics, which are optional,
/// so the upgrade is a version bump. Derived fields that older tools wrote
/// into every entry are dropped from documents of any version.
fn migrate(root: &mut serde_json::Map<String, Value>, today: &str) {
    let meta = root
        .entry("meta")
        .or_insert_with(|| Value::Object(Default::default()));
    if !meta.is_object() {
        *meta = Value::Object(Default::default());
    }
    if let Some(meta) = meta.as_object_mut() {
        let version = meta.get("version").and_then(Value::as_u64).unwrap_or(1);
        if version < u64::from(SCHEMA_VERSION) {
            debug!(from = version, to = SCHEMA_VERSION, "migrating database schema");
            meta.insert("version".into(), Value::from(SCHEMA_VERSION));
        }
        if !meta.get("created").is_some_and(Value::is_string) {
            meta.insert("created".into(), Value::from(today));
        }
    }

    if let Some(entries) = root.get_mut("entries").and_then(Value::as_array_mut) {
        for entry in entries.iter_mut().filter_map(Value::as_object_mut) {
            entry.retain(|key, _| !catalog::is_derived_key(key));
        }
    }
}
