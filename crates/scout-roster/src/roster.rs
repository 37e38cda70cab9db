//! Roster file parsing and name lookups.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use scout_types::ReplayRecord;
use std::path::Path;

/// One tracked player from the roster configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedEntity {
    /// Display name, unique within the roster.
    pub name: String,
    /// Platform-scoped account id. Roster files written by hand sometimes
    /// carry this as a bare number.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Platform tag (`steam`, `epic`, ...).
    pub platform: String,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    data: Vec<TrackedEntity>,
}

/// The immutable set of tracked players.
#[derive(Debug, Clone)]
pub struct Roster {
    entries: Vec<TrackedEntity>,
}

impl Roster {
    /// Load the roster from its JSON file. A missing or malformed roster is
    /// fatal; every operation needs identity resolution.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read roster file {}", path.display()))?;
        let file: RosterFile = serde_json::from_str(&text)
            .with_context(|| format!("parse roster file {}", path.display()))?;
        Ok(Self {
            entries: file.data,
        })
    }

    /// Build a roster from in-memory entries (tests, embedding callers).
    pub fn from_entries(entries: Vec<TrackedEntity>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TrackedEntity] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find(&self, name: &str) -> Option<&TrackedEntity> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// The `platform:id` identifier the listing endpoint expects.
    /// `None` means the name is not in the roster; callers log and treat it
    /// as "no matching player", never as a fatal error.
    pub fn resolve_remote_id(&self, name: &str) -> Option<String> {
        self.find(name)
            .map(|e| format!("{}:{}", e.platform, e.id))
    }

    /// The bare id used to match against player entries embedded in replays.
    pub fn resolve_store_id(&self, name: &str) -> Option<&str> {
        self.find(name).map(|e| e.id.as_str())
    }

    /// How many distinct tracked players appear in a replay, across both
    /// teams. Malformed team substructure counts nobody.
    pub fn tracked_count(&self, replay: &ReplayRecord) -> usize {
        self.entries
            .iter()
            .filter(|e| replay.has_player_id(&e.id))
            .count()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(i64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Roster {
        let file: RosterFile = serde_json::from_value(json!({
            "data": [
                { "name": "alpha", "id": "111", "platform": "steam" },
                { "name": "beta", "id": 222, "platform": "epic" }
            ]
        }))
        .unwrap();
        Roster::from_entries(file.data)
    }

    #[test]
    fn test_remote_and_store_ids_are_distinct_namespaces() {
        let roster = sample();
        assert_eq!(roster.resolve_remote_id("alpha").as_deref(), Some("steam:111"));
        assert_eq!(roster.resolve_store_id("alpha"), Some("111"));
        // Numeric ids in the file normalize to strings.
        assert_eq!(roster.resolve_remote_id("beta").as_deref(), Some("epic:222"));
    }

    #[test]
    fn test_unknown_name_is_not_found() {
        let roster = sample();
        assert_eq!(roster.resolve_remote_id("nobody"), None);
        assert_eq!(roster.resolve_store_id("nobody"), None);
    }

    #[test]
    fn test_tracked_count() {
        let roster = sample();
        let replay: ReplayRecord = serde_json::from_value(json!({
            "id": "r1",
            "blue": { "players": [
                { "id": { "platform": "steam", "id": "111" } },
                { "id": { "platform": "steam", "id": "999" } }
            ]},
            "orange": { "players": [
                { "id": { "platform": "epic", "id": "222" } }
            ]}
        }))
        .unwrap();
        assert_eq!(roster.tracked_count(&replay), 2);

        let bare: ReplayRecord = serde_json::from_value(json!({ "id": "r2" })).unwrap();
        assert_eq!(roster.tracked_count(&bare), 0);
    }
}
