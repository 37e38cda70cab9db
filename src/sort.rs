//! Sort strategies and per-replay enrichment.
//!
//! Each strategy computes one key per replay, then the filtered sequence is
//! stably sorted ascending by that key. Keys are an explicit tagged value:
//! a replay whose key cannot be computed carries [`SortKey::Unset`] and sorts
//! last, instead of smuggling a `-1`-style sentinel through the comparison.
//!
//! `avg_speed` and `car` need data the listing endpoint does not return, so
//! they fetch the full replay document per record through [`DetailSource`];
//! one failed fetch logs a marker and degrades that record to `Unset`, it
//! never aborts the batch.

use scout_roster::Roster;
use scout_transport::{ApiError, DetailSource};
use scout_types::ReplayRecord;
use std::cmp::Ordering;
use tracing::{info, warn};

/// How to order the filtered sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortStrategy {
    /// Named participant's in-replay score. Stored data only.
    Score,
    /// Best score-per-minute over tracked players present; drops replays
    /// with no computable value.
    Spm,
    /// Best tracked score strictly above 1000; drops non-qualifying replays.
    Thousand,
    /// Named participant's average movement speed (detail fetch).
    AvgSpeed,
    /// Named participant's car (detail fetch, lexical order).
    Car,
}

impl SortStrategy {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "score" => Some(SortStrategy::Score),
            "spm" => Some(SortStrategy::Spm),
            "thousand" => Some(SortStrategy::Thousand),
            "avg_speed" => Some(SortStrategy::AvgSpeed),
            "car" => Some(SortStrategy::Car),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            SortStrategy::Score => "score",
            SortStrategy::Spm => "spm",
            SortStrategy::Thousand => "thousand",
            SortStrategy::AvgSpeed => "avg_speed",
            SortStrategy::Car => "car",
        }
    }

    /// Whether the key is relative to one named participant.
    pub fn needs_participant(self) -> bool {
        matches!(
            self,
            SortStrategy::Score | SortStrategy::AvgSpeed | SortStrategy::Car
        )
    }

    /// Whether computing the key requires per-replay detail fetches.
    pub fn needs_detail(self) -> bool {
        matches!(self, SortStrategy::AvgSpeed | SortStrategy::Car)
    }
}

/// A computed sort key. `Unset` always sorts last.
#[derive(Debug, Clone)]
pub enum SortKey {
    Number(f64),
    Text(String),
    Unset,
}

impl SortKey {
    fn class(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Text(_) => 1,
            SortKey::Unset => 2,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.class().cmp(&other.class()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// A replay paired with its transient sort key. The key never reaches the
/// store; persistence only ever sees raw records.
#[derive(Debug)]
pub struct RankedReplay {
    pub key: SortKey,
    pub replay: ReplayRecord,
}

/// Compute keys and order the sequence. With no strategy the chronological
/// input order is preserved and every key is `Unset`.
pub fn rank(
    roster: &Roster,
    strategy: Option<SortStrategy>,
    participant: Option<&str>,
    details: &dyn DetailSource,
    replays: Vec<ReplayRecord>,
) -> Vec<RankedReplay> {
    let Some(strategy) = strategy else {
        return replays
            .into_iter()
            .map(|replay| RankedReplay {
                key: SortKey::Unset,
                replay,
            })
            .collect();
    };

    let participant_id = participant.and_then(|name| {
        let id = roster.resolve_store_id(name);
        if id.is_none() {
            warn!(player = %name, "not in roster, sort keys will be unset");
        }
        id.map(str::to_string)
    });

    let total = replays.len();
    let mut ranked: Vec<RankedReplay> = Vec::with_capacity(total);
    for (i, replay) in replays.into_iter().enumerate() {
        let key = match strategy {
            SortStrategy::Score => score_key(&replay, participant_id.as_deref()),
            SortStrategy::Spm => match spm_key(roster, &replay) {
                Some(v) => SortKey::Number(v),
                // Re-filtering strategy: nothing computable, drop the replay.
                None => continue,
            },
            SortStrategy::Thousand => match thousand_key(roster, &replay) {
                Some(v) => SortKey::Number(v),
                None => continue,
            },
            SortStrategy::AvgSpeed | SortStrategy::Car => {
                info!("{}/{}: requesting details for {}", i + 1, total, replay.id);
                detail_key(strategy, details, &replay, participant_id.as_deref())
            }
        };
        ranked.push(RankedReplay { key, replay });
    }

    // Vec::sort_by is stable: equal keys keep their pre-sort relative order.
    ranked.sort_by(|a, b| a.key.cmp(&b.key));
    ranked
}

fn score_key(replay: &ReplayRecord, participant_id: Option<&str>) -> SortKey {
    participant_id
        .and_then(|id| replay.player_score(id))
        .map(|s| SortKey::Number(s as f64))
        .unwrap_or(SortKey::Unset)
}

/// Best score-per-minute across tracked players in this replay.
fn spm_key(roster: &Roster, replay: &ReplayRecord) -> Option<f64> {
    let duration = replay.duration.filter(|d| *d > 0)? as f64;
    roster
        .entries()
        .iter()
        .filter_map(|e| replay.player_score(&e.id))
        .map(|score| score as f64 / (duration / 60.0))
        .max_by(f64::total_cmp)
}

/// Best tracked score strictly above 1000.
fn thousand_key(roster: &Roster, replay: &ReplayRecord) -> Option<f64> {
    roster
        .entries()
        .iter()
        .filter_map(|e| replay.player_score(&e.id))
        .filter(|score| *score > 1000)
        .map(|score| score as f64)
        .max_by(f64::total_cmp)
}

fn detail_key(
    strategy: SortStrategy,
    details: &dyn DetailSource,
    replay: &ReplayRecord,
    participant_id: Option<&str>,
) -> SortKey {
    let Some(id) = participant_id else {
        return SortKey::Unset;
    };

    let detail = match details.fetch_detail(&replay.id) {
        Ok(d) => d,
        Err(e) => {
            warn!(replay = %replay.id, error = %e, "detail fetch failed, key unset");
            return SortKey::Unset;
        }
    };

    let player = detail.all_players().find(|p| p.store_id() == Some(id));
    let key = match strategy {
        SortStrategy::AvgSpeed => player
            .and_then(|p| p.avg_speed())
            .map(SortKey::Number),
        SortStrategy::Car => player
            .and_then(|p| p.car_name.clone())
            .map(SortKey::Text),
        _ => None,
    };
    key.unwrap_or_else(|| {
        warn!(replay = %replay.id, "participant or stat missing in detail, key unset");
        SortKey::Unset
    })
}

/// Detail source for strategies that never fetch. Calling it is a bug, but a
/// bug that degrades to an unset key rather than a crash.
pub struct LocalOnly;

impl DetailSource for LocalOnly {
    fn fetch_detail(&self, _replay_id: &str) -> Result<ReplayRecord, ApiError> {
        Err(ApiError::Decode("no detail source configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_roster::TrackedEntity;
    use serde_json::json;
    use std::collections::HashMap;

    fn roster() -> Roster {
        Roster::from_entries(vec![
            TrackedEntity {
                name: "alpha".into(),
                id: "111".into(),
                platform: "steam".into(),
            },
            TrackedEntity {
                name: "beta".into(),
                id: "222".into(),
                platform: "epic".into(),
            },
        ])
    }

    fn replay(value: serde_json::Value) -> ReplayRecord {
        serde_json::from_value(value).unwrap()
    }

    fn scored(id: &str, player_id: &str, score: i64) -> ReplayRecord {
        replay(json!({
            "id": id,
            "blue": { "players": [{ "id": { "id": player_id }, "score": score }] }
        }))
    }

    struct FakeDetails(HashMap<String, ReplayRecord>);

    impl DetailSource for FakeDetails {
        fn fetch_detail(&self, replay_id: &str) -> Result<ReplayRecord, ApiError> {
            self.0
                .get(replay_id)
                .cloned()
                .ok_or_else(|| ApiError::Transient("connection reset".into()))
        }
    }

    #[test]
    fn test_no_strategy_preserves_order() {
        let ranked = rank(
            &roster(),
            None,
            None,
            &LocalOnly,
            vec![scored("r1", "111", 900), scored("r2", "111", 100)],
        );
        let ids: Vec<_> = ranked.iter().map(|r| r.replay.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
        assert!(matches!(ranked[0].key, SortKey::Unset));
    }

    #[test]
    fn test_score_sort_is_stable_on_ties() {
        let ranked = rank(
            &roster(),
            Some(SortStrategy::Score),
            Some("alpha"),
            &LocalOnly,
            vec![
                scored("first", "111", 500),
                scored("second", "111", 500),
                scored("low", "111", 100),
            ],
        );
        let ids: Vec<_> = ranked.iter().map(|r| r.replay.id.as_str()).collect();
        // Ascending, and the two 500s keep their relative order.
        assert_eq!(ids, vec!["low", "first", "second"]);
    }

    #[test]
    fn test_missing_participant_score_sorts_last() {
        let ranked = rank(
            &roster(),
            Some(SortStrategy::Score),
            Some("alpha"),
            &LocalOnly,
            vec![scored("other", "999", 900), scored("mine", "111", 100)],
        );
        let ids: Vec<_> = ranked.iter().map(|r| r.replay.id.as_str()).collect();
        assert_eq!(ids, vec!["mine", "other"]);
        assert!(matches!(ranked[1].key, SortKey::Unset));
    }

    #[test]
    fn test_spm_computation() {
        let r = replay(json!({
            "id": "r1",
            "duration": 600,
            "blue": { "players": [{ "id": { "id": "111" }, "score": 1200 }] }
        }));
        let ranked = rank(&roster(), Some(SortStrategy::Spm), None, &LocalOnly, vec![r]);
        assert_eq!(ranked.len(), 1);
        match ranked[0].key {
            SortKey::Number(v) => assert!((v - 120.0).abs() < f64::EPSILON),
            _ => panic!("expected numeric key"),
        }
    }

    #[test]
    fn test_spm_takes_best_tracked_value_and_drops_untracked() {
        let both = replay(json!({
            "id": "both",
            "duration": 300,
            "blue": { "players": [{ "id": { "id": "111" }, "score": 250 }] },
            "orange": { "players": [{ "id": { "id": "222" }, "score": 600 }] }
        }));
        let untracked = replay(json!({
            "id": "untracked",
            "duration": 300,
            "blue": { "players": [{ "id": { "id": "999" }, "score": 900 }] }
        }));
        let no_duration = replay(json!({
            "id": "no-duration",
            "blue": { "players": [{ "id": { "id": "111" }, "score": 900 }] }
        }));
        let ranked = rank(
            &roster(),
            Some(SortStrategy::Spm),
            None,
            &LocalOnly,
            vec![both, untracked, no_duration],
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].replay.id, "both");
        match ranked[0].key {
            SortKey::Number(v) => assert!((v - 120.0).abs() < f64::EPSILON),
            _ => panic!("expected numeric key"),
        }
    }

    #[test]
    fn test_thousand_requires_strictly_over_1000() {
        let ranked = rank(
            &roster(),
            Some(SortStrategy::Thousand),
            None,
            &LocalOnly,
            vec![
                scored("exactly", "111", 1000),
                scored("over", "111", 1001),
                scored("under", "222", 400),
            ],
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].replay.id, "over");
    }

    #[test]
    fn test_avg_speed_enrichment_and_failure_degradation() {
        let detail = replay(json!({
            "id": "r1",
            "blue": { "players": [{
                "id": { "id": "111" },
                "stats": { "movement": { "avg_speed": 1450.0 } }
            }]}
        }));
        let mut details = HashMap::new();
        details.insert("r1".to_string(), detail);
        let fake = FakeDetails(details);

        let ranked = rank(
            &roster(),
            Some(SortStrategy::AvgSpeed),
            Some("alpha"),
            &fake,
            vec![
                replay(json!({ "id": "unfetchable" })),
                replay(json!({ "id": "r1" })),
            ],
        );
        assert_eq!(ranked.len(), 2);
        // The fetched key sorts first, the failed fetch degrades to Unset last.
        assert_eq!(ranked[0].replay.id, "r1");
        assert!(matches!(ranked[0].key, SortKey::Number(_)));
        assert_eq!(ranked[1].replay.id, "unfetchable");
        assert!(matches!(ranked[1].key, SortKey::Unset));
    }

    #[test]
    fn test_car_sorts_lexically() {
        let mk_detail = |id: &str, car: &str| {
            replay(json!({
                "id": id,
                "blue": { "players": [{ "id": { "id": "111" }, "car_name": car }] }
            }))
        };
        let mut details = HashMap::new();
        details.insert("r1".to_string(), mk_detail("r1", "Octane"));
        details.insert("r2".to_string(), mk_detail("r2", "Dominus"));
        let fake = FakeDetails(details);

        let ranked = rank(
            &roster(),
            Some(SortStrategy::Car),
            Some("alpha"),
            &fake,
            vec![replay(json!({ "id": "r1" })), replay(json!({ "id": "r2" }))],
        );
        let ids: Vec<_> = ranked.iter().map(|r| r.replay.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r1"]);
    }
}
