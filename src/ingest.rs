//! The unified ingestion operation.
//!
//! One operation covers both "refresh one player" and "catch-up everyone":
//! it is parameterized by scope (one tracked player or the whole roster) and
//! by date floor (explicit, or derived from the newest stored replay). The
//! store is mutated in memory here and persisted exactly once by the caller,
//! keeping load → merge → persist a single critical section per run.

use crate::AppContext;
use anyhow::{anyhow, Result};
use chrono::Days;
use scout_store::ReplayStore;
use scout_transport::ListQuery;
use scout_types::GameMode;
use tracing::{info, warn};

/// Which tracked players to ingest for.
#[derive(Debug, Clone)]
pub enum IngestScope {
    Entity(String),
    AllEntities,
}

/// Where the fetch starts from.
#[derive(Debug, Clone)]
pub enum IngestFloor {
    /// Explicit RFC3339 date floor.
    After(String),
    /// One day before the newest stored replay, tolerating the remote's
    /// slightly out-of-order records near the boundary. An empty store means
    /// no floor (full backfill).
    FromStore,
}

/// What one ingestion run did.
#[derive(Debug, Default)]
pub struct IngestSummary {
    /// Replays fetched across all pages and players.
    pub fetched: usize,
    /// Replays actually new to the store.
    pub inserted: usize,
    /// False when any player's pagination ended early on a transient failure.
    pub complete: bool,
}

/// Fetch and merge. Fatal request errors abort the run; transient exhaustion
/// keeps partial results and is reflected in the summary.
pub fn run(
    ctx: &AppContext,
    store: &mut ReplayStore,
    scope: IngestScope,
    floor: IngestFloor,
    mode: Option<GameMode>,
) -> Result<IngestSummary> {
    let after = derive_floor(store, &floor);
    if let Some(after) = &after {
        info!(%after, "ingesting replays after date floor");
    }

    let names: Vec<String> = match scope {
        IngestScope::Entity(name) => vec![name],
        IngestScope::AllEntities => ctx
            .roster
            .entries()
            .iter()
            .map(|e| e.name.clone())
            .collect(),
    };

    let mut summary = IngestSummary {
        complete: true,
        ..Default::default()
    };

    for name in names {
        let Some(player_id) = ctx.roster.resolve_remote_id(&name) else {
            warn!(player = %name, "not in roster, skipping ingestion");
            continue;
        };

        info!(player = %name, "fetching replay listing");
        let query = ListQuery {
            player_id: Some(player_id),
            playlist: mode.map(|m| m.playlist_id().to_string()),
            replay_date_after: after.clone(),
        };
        let collected = ctx
            .client
            .collect_replays(&query)
            .map_err(|e| anyhow!("fetch replays for {}: {}", name, e))?;

        summary.fetched += collected.replays.len();
        summary.complete &= collected.complete;

        let inserted = store.merge_insert(collected.replays);
        info!(player = %name, inserted, "merged into store");
        summary.inserted += inserted;
    }

    Ok(summary)
}

fn derive_floor(store: &ReplayStore, floor: &IngestFloor) -> Option<String> {
    match floor {
        IngestFloor::After(date) => Some(date.clone()),
        IngestFloor::FromStore => store
            .newest_date()
            .and_then(|d| d.checked_sub_days(Days::new(1)))
            .map(|d| d.to_rfc3339()),
    }
}
