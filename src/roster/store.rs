//! Roster store
//!
//! Owns the ordered record list and mirrors it to a [`KeyValueStore`] after
//! every mutation. Writes are whole-roster overwrites; nothing is incremental.

use tracing::{debug, info, warn};

use super::record::AssignmentRecord;
use crate::admin::AdminCapability;
use crate::error::{RosterError, Result};
use crate::storage::KeyValueStore;

/// Serialize a roster to its stored JSON form
pub fn encode_roster(records: &[AssignmentRecord]) -> Result<String> {
    serde_json::to_string(records).map_err(|e| RosterError::Serialization {
        reason: e.to_string(),
    })
}

/// Parse a stored roster
pub fn decode_roster(key: &str, json: &str) -> Result<Vec<AssignmentRecord>> {
    serde_json::from_str(json).map_err(|e| RosterError::StorageParse {
        key: key.into(),
        reason: e.to_string(),
    })
}

/// Ordered collection of assignment records backed by persistent storage
pub struct RosterStore<S: KeyValueStore> {
    backend: S,
    key: String,
    records: Vec<AssignmentRecord>,
}

impl<S: KeyValueStore> RosterStore<S> {
    /// Load the roster stored under `key`
    ///
    /// A missing, unreadable, or malformed value yields an empty roster.
    pub fn load(backend: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = read_records(&backend, &key);
        info!("Loaded roster with {} records from {}", records.len(), key);
        Self {
            backend,
            key,
            records,
        }
    }

    /// Re-read the roster from storage, discarding the in-memory copy
    pub fn reload(&mut self) {
        self.records = read_records(&self.backend, &self.key);
        debug!("Reloaded roster, {} records", self.records.len());
    }

    /// All records in insertion order
    pub fn records(&self) -> &[AssignmentRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the roster is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of members currently in `group`
    pub fn count_in_group(&self, group: u32) -> usize {
        self.records.iter().filter(|r| r.group == group).count()
    }

    /// Members of `group`, earliest assignment first
    pub fn members_of(&self, group: u32) -> Vec<&AssignmentRecord> {
        let mut members: Vec<_> = self.records.iter().filter(|r| r.group == group).collect();
        members.sort_by_key(|r| r.assigned_at_ms);
        members
    }

    /// Look up a record by identity
    pub fn find(&self, identity: &str) -> Option<&AssignmentRecord> {
        self.records.iter().find(|r| r.identity == identity)
    }

    /// Storage key this roster is mirrored to
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Write the full roster to storage, replacing any prior value
    pub fn persist(&self) -> Result<()> {
        let json = encode_roster(&self.records)?;
        self.backend.set(&self.key, &json)?;
        debug!("Persisted {} records to {}", self.records.len(), self.key);
        Ok(())
    }

    /// Append a record and persist
    pub fn append(&mut self, record: AssignmentRecord) -> Result<()> {
        self.records.push(record);
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove the first record with `identity` and persist
    ///
    /// Only one record is dropped even if a concurrent writer in another
    /// instance left two records sharing the identity.
    pub fn remove(
        &mut self,
        _admin: &AdminCapability<'_>,
        identity: &str,
    ) -> Result<AssignmentRecord> {
        let position = self
            .records
            .iter()
            .position(|r| r.identity == identity)
            .ok_or_else(|| RosterError::UnknownRecord {
                identity: identity.into(),
            })?;

        let previous = self.records.clone();
        let removed = self.records.remove(position);

        if let Err(e) = self.persist() {
            self.records = previous;
            return Err(e);
        }

        info!("Removed {} from group {}", removed.identity, removed.group);
        Ok(removed)
    }

    /// Drop every record and persist the empty roster
    pub fn clear(&mut self, _admin: &AdminCapability<'_>) -> Result<()> {
        let previous = std::mem::take(&mut self.records);
        if let Err(e) = self.persist() {
            self.records = previous;
            return Err(e);
        }
        info!("Cleared roster ({} records dropped)", previous.len());
        Ok(())
    }
}

fn read_records<S: KeyValueStore>(backend: &S, key: &str) -> Vec<AssignmentRecord> {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read stored roster: {}", e);
            return Vec::new();
        }
    };

    match decode_roster(key, &raw) {
        Ok(records) => records,
        Err(e) => {
            warn!("{}", e);
            Vec::new()
        }
    }
}
