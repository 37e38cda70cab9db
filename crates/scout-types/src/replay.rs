//! Replay document model.
//!
//! Replays arrive from the remote API as semi-structured JSON. Team and player
//! substructures can be partially absent (forfeits, malformed uploads), so every
//! field except the replay id is optional and the accessors here degrade absence
//! to empty/zero/`None` instead of erroring. Downstream filter/sort/report code
//! goes through these accessors and never needs defensive error handling.
//!
//! Unknown remote fields are preserved through a flattened `extra` map so the
//! store round-trips the full remote document.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Side of the pitch a team played on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Team {
    Blue,
    Orange,
}

/// Player identity as embedded in a replay. The `platform:id` pair used by the
/// listing endpoint and the bare `id` used inside replay documents are distinct
/// namespaces; this struct carries both halves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One participant in a replay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_name: Option<String>,
    /// Per-player stats block; only present on detail fetches. Kept opaque,
    /// read through [`PlayerEntry::avg_speed`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PlayerEntry {
    /// The replay-embedded player identifier (store-id namespace).
    pub fn store_id(&self) -> Option<&str> {
        self.id.as_ref()?.id.as_deref()
    }

    /// Average movement speed from the detail stats block, if present.
    pub fn avg_speed(&self) -> Option<f64> {
        self.stats
            .as_ref()?
            .get("movement")?
            .get("avg_speed")?
            .as_f64()
    }
}

/// One team's slice of a replay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamSide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PlayerEntry>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl TeamSide {
    /// Players on this side, empty when the substructure is absent.
    pub fn players(&self) -> &[PlayerEntry] {
        self.players.as_deref().unwrap_or(&[])
    }
}

/// One recorded match as returned by the remote listing or detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayRecord {
    /// Globally unique replay id, assigned by the remote source.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    /// Match duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overtime: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue: Option<TeamSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orange: Option<TeamSide>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ReplayRecord {
    /// Parse the replay date. Accepts RFC3339 as well as offsets without a
    /// colon (the remote emits both over its history).
    pub fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
            .ok()
    }

    fn side(&self, team: Team) -> Option<&TeamSide> {
        match team {
            Team::Blue => self.blue.as_ref(),
            Team::Orange => self.orange.as_ref(),
        }
    }

    /// Goals scored by a team, zero when unreported.
    pub fn goals(&self, team: Team) -> i64 {
        self.side(team).and_then(|s| s.goals).unwrap_or(0)
    }

    /// Players on one team, empty when the substructure is absent.
    pub fn players_on(&self, team: Team) -> &[PlayerEntry] {
        self.side(team).map(TeamSide::players).unwrap_or(&[])
    }

    /// All players across both teams.
    pub fn all_players(&self) -> impl Iterator<Item = &PlayerEntry> {
        self.players_on(Team::Blue)
            .iter()
            .chain(self.players_on(Team::Orange).iter())
    }

    /// Whether a player with the given store-id participated.
    pub fn has_player_id(&self, store_id: &str) -> bool {
        self.all_players()
            .any(|p| p.store_id() == Some(store_id))
    }

    /// Which team a player with the given store-id was on.
    pub fn team_of(&self, store_id: &str) -> Option<Team> {
        for team in [Team::Blue, Team::Orange] {
            if self
                .players_on(team)
                .iter()
                .any(|p| p.store_id() == Some(store_id))
            {
                return Some(team);
            }
        }
        None
    }

    /// In-replay score of the player with the given store-id.
    pub fn player_score(&self, store_id: &str) -> Option<i64> {
        self.all_players()
            .find(|p| p.store_id() == Some(store_id))?
            .score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn replay(value: Value) -> ReplayRecord {
        serde_json::from_value(value).expect("replay should deserialize")
    }

    #[test]
    fn test_absent_substructure_degrades_to_defaults() {
        let r = replay(json!({ "id": "abc" }));
        assert_eq!(r.goals(Team::Blue), 0);
        assert!(r.players_on(Team::Orange).is_empty());
        assert_eq!(r.all_players().count(), 0);
        assert!(!r.has_player_id("76561198000000000"));
        assert!(r.parsed_date().is_none());
    }

    #[test]
    fn test_player_lookup_uses_embedded_id() {
        let r = replay(json!({
            "id": "abc",
            "blue": {
                "goals": 3,
                "players": [
                    { "id": { "platform": "steam", "id": "111" }, "name": "alpha", "score": 540 }
                ]
            },
            "orange": {
                "goals": 1,
                "players": [
                    { "id": { "platform": "epic", "id": "222" }, "name": "beta", "score": 120 }
                ]
            }
        }));
        assert!(r.has_player_id("111"));
        assert_eq!(r.team_of("222"), Some(Team::Orange));
        assert_eq!(r.player_score("111"), Some(540));
        assert_eq!(r.player_score("999"), None);
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let raw = json!({
            "id": "abc",
            "date": "2024-03-01T18:30:00+01:00",
            "map_code": "stadium_p",
            "uploader": { "name": "someone" }
        });
        let r = replay(raw.clone());
        let back = serde_json::to_value(&r).unwrap();
        assert_eq!(back.get("map_code"), raw.get("map_code"));
        assert_eq!(back.get("uploader"), raw.get("uploader"));
    }

    #[test]
    fn test_date_parsing_accepts_compact_offset() {
        let r = replay(json!({ "id": "abc", "date": "2024-03-01T18:30:00+0100" }));
        assert!(r.parsed_date().is_some());
        let r = replay(json!({ "id": "abc", "date": "2024-03-01T18:30:00+01:00" }));
        assert!(r.parsed_date().is_some());
        let r = replay(json!({ "id": "abc", "date": "not a date" }));
        assert!(r.parsed_date().is_none());
    }

    #[test]
    fn test_avg_speed_from_stats_block() {
        let r = replay(json!({
            "id": "abc",
            "blue": { "players": [{
                "id": { "platform": "steam", "id": "111" },
                "stats": { "movement": { "avg_speed": 1450.5 } }
            }]}
        }));
        let p = r.all_players().next().unwrap();
        assert_eq!(p.avg_speed(), Some(1450.5));

        let r = replay(json!({
            "id": "abc",
            "blue": { "players": [{ "id": { "id": "111" }, "stats": {} }] }
        }));
        let p = r.all_players().next().unwrap();
        assert_eq!(p.avg_speed(), None);
    }
}
