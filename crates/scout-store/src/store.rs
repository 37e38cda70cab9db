//! The keyed replay store.
//!
//! The backing artifact is one JSON object mapping replay ids to full replay
//! documents. It is the sole persistent state of the system and is treated as
//! a load → merge → persist critical section per process; no locking
//! discipline exists for concurrent runs against the same file.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset};
use scout_types::ReplayRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::paths::atomic_write_json;

/// In-memory view of the backing artifact.
#[derive(Debug)]
pub struct ReplayStore {
    path: PathBuf,
    records: HashMap<String, ReplayRecord>,
}

impl ReplayStore {
    /// Load the store wholesale. Fails if the artifact is missing or
    /// malformed: an empty store must be created explicitly via [`init`],
    /// not implied, so a mistyped path cannot silently discard history.
    ///
    /// [`init`]: ReplayStore::init
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| {
            format!(
                "read store {} (run `init-store` first for a fresh store)",
                path.display()
            )
        })?;
        let records: HashMap<String, ReplayRecord> = serde_json::from_str(&text)
            .with_context(|| format!("parse store {}", path.display()))?;
        debug!(count = records.len(), "loaded store");
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Create a fresh empty store artifact. Refuses to clobber an existing one.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            bail!("store {} already exists", path.display());
        }
        let empty: HashMap<String, ReplayRecord> = HashMap::new();
        atomic_write_json(path, &empty)
    }

    /// Insert every record whose replay id is not already present.
    /// First-write-wins: an already-stored id is skipped, never overwritten,
    /// so re-running the same ingestion is a no-op. Returns the insert count.
    pub fn merge_insert(&mut self, records: Vec<ReplayRecord>) -> usize {
        let mut inserted = 0;
        for record in records {
            if self.records.contains_key(&record.id) {
                debug!(id = %record.id, "replay already stored, skipping");
                continue;
            }
            self.records.insert(record.id.clone(), record);
            inserted += 1;
        }
        inserted
    }

    /// Rewrite the backing artifact wholesale from the in-memory mapping.
    /// Callers do this exactly once at the end of a mutating run; the write
    /// is atomic so a crash never corrupts the previous state.
    pub fn persist(&self) -> Result<()> {
        atomic_write_json(&self.path, &self.records)
            .with_context(|| format!("persist store {}", self.path.display()))
    }

    /// The newest replay date across all stored records. Catch-up ingestion
    /// resumes one day before this to tolerate out-of-order remote records
    /// near the boundary.
    pub fn newest_date(&self) -> Option<DateTime<FixedOffset>> {
        self.records
            .values()
            .filter_map(ReplayRecord::parsed_date)
            .max()
    }

    /// Stored records sorted chronologically (records without a parseable
    /// date sort first). This is the query path's input order.
    pub fn records_by_date(&self) -> Vec<ReplayRecord> {
        let mut dated: Vec<(Option<DateTime<FixedOffset>>, &ReplayRecord)> = self
            .records
            .values()
            .map(|r| (r.parsed_date(), r))
            .collect();
        dated.sort_by_key(|(date, _)| *date);
        dated.into_iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, replay_id: &str) -> Option<&ReplayRecord> {
        self.records.get(replay_id)
    }
}
