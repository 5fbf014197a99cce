//! Flat-file store of VRChat bindings keyed by platform user id.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use vrc_bind_core::write_json_pretty_atomic;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One persisted binding between a platform user and a VRChat session.
pub struct UserRecord {
    pub qq_id: String,
    pub vrc_username: String,
    #[serde(default)]
    pub cookies: Vec<String>,
}

/// Whole-file JSON store: loaded once, rewritten on every mutation.
pub struct UserStore {
    path: PathBuf,
    records: BTreeMap<String, UserRecord>,
}

impl UserStore {
    /// Loads the store at `path`; a missing file yields an empty store.
    pub fn load(path: PathBuf) -> Result<Self> {
        let records = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read user store {}", path.display()))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str::<BTreeMap<String, UserRecord>>(&raw).with_context(|| {
                    format!("failed to parse user store {}", path.display())
                })?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(
            path = %path.display(),
            records = records.len(),
            "loaded vrchat user store"
        );
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, user_id: &str) -> Option<&UserRecord> {
        self.records.get(user_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts or replaces the record under its `qq_id` and flushes to disk.
    ///
    /// The in-memory map is updated even when the write fails; the error is
    /// returned to the caller.
    pub fn upsert(&mut self, record: UserRecord) -> Result<()> {
        self.records.insert(record.qq_id.clone(), record);
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        write_json_pretty_atomic(&self.path, &self.records)
            .with_context(|| format!("failed to write user store {}", self.path.display()))
    }
}
