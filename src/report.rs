//! Report rendering and the per-run output artifact.
//!
//! Each replay in final order becomes one text line, printed to stdout and
//! appended to a session-scoped file named after the active query parameters
//! and the run timestamp. Appending within a run, fresh file per session.

use crate::filter::FilterCriteria;
use crate::sort::{RankedReplay, SortKey, SortStrategy};
use anyhow::{Context, Result};
use chrono::Local;
use scout_roster::Roster;
use scout_store::ensure_parent_dirs;
use scout_types::Team;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Canonical link prefix for rendered replays.
const REPLAY_LINK_BASE: &str = "ballchasing.com/replay";

/// Writes report lines to stdout and the run artifact.
pub struct Reporter {
    out: File,
    path: PathBuf,
}

impl Reporter {
    /// Open a fresh artifact for this run under `report_dir`.
    pub fn create(report_dir: &Path, label: &str) -> Result<Self> {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let path = report_dir.join(format!("{}-{}.txt", label, stamp));
        ensure_parent_dirs(&path)?;
        let out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open report artifact {}", path.display()))?;
        Ok(Self { out, path })
    }

    /// Print one line and append it to the artifact.
    pub fn emit(&mut self, line: &str) -> Result<()> {
        println!("{}", line);
        writeln!(self.out, "{}", line).context("append to report artifact")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Artifact stem derived from the active query parameters, so runs with the
/// same parameters group together on disk.
pub fn report_label(criteria: &FilterCriteria, strategy: Option<SortStrategy>) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (i, name) in criteria.participants.iter().enumerate() {
        parts.push(format!("p{}_{}", i + 1, name));
    }
    if let Some(mode) = criteria.mode {
        parts.push(mode.short_code().to_string());
    }
    if let Some(months) = criteria.months_back {
        parts.push(format!("m{}", months));
    }
    if criteria.exclude_private {
        parts.push("nopriv".to_string());
    }
    if let Some(k) = criteria.min_tracked {
        parts.push(format!("sl{}", k));
    }
    if let Some(strategy) = strategy {
        parts.push(format!("sort_{}", strategy.as_code()));
    }
    if parts.is_empty() {
        "all".to_string()
    } else {
        parts.join("-")
    }
}

/// Render one replay line. `keyed` controls whether the sort-key column is
/// shown at all (a keyless run prints a blank column, not a dash).
pub fn render_line(
    roster: &Roster,
    participant: Option<&str>,
    ranked: &RankedReplay,
    keyed: bool,
) -> String {
    let replay = &ranked.replay;

    let Some(date) = replay.date.as_deref() else {
        // Nothing worth formatting without a date; keep the link so the
        // replay is still reachable.
        return format!("(unrenderable) {}/{}", REPLAY_LINK_BASE, replay.id);
    };

    let key = if keyed {
        match &ranked.key {
            SortKey::Number(v) if v.fract() == 0.0 => format!("{:.0}", v),
            SortKey::Number(v) => format!("{:.2}", v),
            SortKey::Text(s) => s.clone(),
            SortKey::Unset => "-".to_string(),
        }
    } else {
        String::new()
    };

    let overtime = match (replay.overtime, replay.duration) {
        (Some(true), Some(secs)) => format!("(ot {:.1})", secs as f64 / 60.0),
        (Some(true), None) => "(ot)".to_string(),
        _ => String::new(),
    };

    let mode = replay
        .playlist_id
        .as_deref()
        .and_then(scout_types::GameMode::from_playlist_id)
        .map(|m| m.short_code())
        .unwrap_or("");

    let outcome = participant
        .and_then(|name| roster.resolve_store_id(name))
        .and_then(|id| win_loss(replay, id))
        .unwrap_or("");

    let score_line = format!(
        "{:>2} - {:<2}",
        replay.goals(Team::Blue),
        replay.goals(Team::Orange)
    );

    format!(
        "{:<8}{:<5}{:<9}- ({}) {}: {} {}vs   {}| {}/{}",
        key,
        outcome,
        overtime,
        mode,
        &date[..date.len().min(10)],
        score_line,
        team_names(replay, Team::Blue),
        team_names(replay, Team::Orange),
        REPLAY_LINK_BASE,
        replay.id
    )
}

/// WIN/LOSS relative to the named participant's team; a tie or an absent
/// participant yields no marker.
fn win_loss(replay: &scout_types::ReplayRecord, store_id: &str) -> Option<&'static str> {
    let team = replay.team_of(store_id)?;
    let (mine, theirs) = match team {
        Team::Blue => (replay.goals(Team::Blue), replay.goals(Team::Orange)),
        Team::Orange => (replay.goals(Team::Orange), replay.goals(Team::Blue)),
    };
    match mine.cmp(&theirs) {
        std::cmp::Ordering::Greater => Some("WIN"),
        std::cmp::Ordering::Less => Some("LOSS"),
        std::cmp::Ordering::Equal => None,
    }
}

fn team_names(replay: &scout_types::ReplayRecord, team: Team) -> String {
    let mut names = String::new();
    for player in replay.players_on(team) {
        let name: String = player
            .name
            .as_deref()
            .unwrap_or("?")
            .chars()
            .take(12)
            .collect();
        names.push_str(&format!("{:<12}", name));
    }
    names
}
