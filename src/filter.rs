//! Conjunction filter over stored replays.
//!
//! Every supplied criterion must hold; unset criteria are no-ops. A record
//! missing the substructure a predicate needs is non-matching for that
//! predicate — malformed remote data degrades filtering, it never aborts the
//! pass.

use chrono::{DateTime, Months, Utc};
use scout_roster::Roster;
use scout_types::{GameMode, ReplayRecord};
use tracing::warn;

/// The filter conjunction for one report run.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Keep only replays from the last N months.
    pub months_back: Option<u32>,
    /// Keep only one game mode.
    pub mode: Option<GameMode>,
    /// Drop private-lobby replays.
    pub exclude_private: bool,
    /// Tracked player names that must all appear in the replay (0..=2 in
    /// practice, but any number works).
    pub participants: Vec<String>,
    /// Stacked-lobby threshold: minimum distinct tracked players present.
    pub min_tracked: Option<usize>,
}

/// Apply the conjunction, preserving input order.
pub fn apply(
    roster: &Roster,
    criteria: &FilterCriteria,
    records: Vec<ReplayRecord>,
) -> Vec<ReplayRecord> {
    apply_at(Utc::now(), roster, criteria, records)
}

fn apply_at(
    now: DateTime<Utc>,
    roster: &Roster,
    criteria: &FilterCriteria,
    records: Vec<ReplayRecord>,
) -> Vec<ReplayRecord> {
    let floor = criteria
        .months_back
        .and_then(|months| now.checked_sub_months(Months::new(months)));

    // Resolve participant names once; a name missing from the roster matches
    // nothing (logged, not fatal).
    let mut participant_ids = Vec::new();
    for name in &criteria.participants {
        match roster.resolve_store_id(name) {
            Some(id) => participant_ids.push(id.to_string()),
            None => {
                warn!(player = %name, "not in roster, participant filter will match nothing");
                return Vec::new();
            }
        }
    }

    records
        .into_iter()
        .filter(|r| matches(roster, criteria, floor, &participant_ids, r))
        .collect()
}

fn matches(
    roster: &Roster,
    criteria: &FilterCriteria,
    floor: Option<DateTime<Utc>>,
    participant_ids: &[String],
    replay: &ReplayRecord,
) -> bool {
    if let Some(floor) = floor {
        // An unparseable date cannot prove recency.
        match replay.parsed_date() {
            Some(date) if date.with_timezone(&Utc) >= floor => {}
            _ => return false,
        }
    }

    if let Some(mode) = criteria.mode {
        let classified = replay
            .playlist_id
            .as_deref()
            .and_then(GameMode::from_playlist_id);
        if classified != Some(mode) {
            return false;
        }
    }

    if criteria.exclude_private
        && replay.playlist_id.as_deref().and_then(GameMode::from_playlist_id)
            == Some(GameMode::Private)
    {
        return false;
    }

    for id in participant_ids {
        if !replay.has_player_id(id) {
            return false;
        }
    }

    if let Some(k) = criteria.min_tracked {
        if roster.tracked_count(replay) < k {
            return false;
        }
    }

    true
}
