//! Command-line surface.
//!
//! Parsing is plumbing: everything here is handed to the pipeline as plain
//! pre-parsed values.

use crate::sort::SortStrategy;
use clap::{Parser, Subcommand};
use scout_types::GameMode;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Roster configuration file (tracked players).
    #[arg(long, value_name = "PATH", default_value = "players.json", global = true)]
    pub roster: PathBuf,

    /// Backing store artifact.
    #[arg(long, value_name = "PATH", default_value = "replays.json", global = true)]
    pub store: PathBuf,

    /// Directory for per-run report artifacts.
    #[arg(long, value_name = "DIR", default_value = "reports", global = true)]
    pub report_dir: PathBuf,

    /// Number of retries for transient network failures.
    #[arg(long, default_value_t = 3, global = true)]
    pub retries: usize,

    /// Initial retry backoff in milliseconds.
    #[arg(long, default_value_t = 500, global = true)]
    pub retry_initial_ms: u64,

    /// Maximum retry backoff in milliseconds.
    #[arg(long, default_value_t = 5000, global = true)]
    pub retry_max_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch new replays for one tracked player and merge them into the store.
    Ingest {
        /// Tracked player name.
        #[arg(long, value_name = "NAME")]
        player: String,

        /// Only fetch replays after this RFC3339 date.
        #[arg(long, value_name = "RFC3339")]
        after: Option<String>,

        /// Restrict the fetch to one game mode (1, 2, 3 or p).
        #[arg(long, value_name = "MODE", value_parser = parse_mode)]
        mode: Option<GameMode>,
    },

    /// Catch-up ingestion for every tracked player, resuming one day before
    /// the newest stored replay.
    Backfill,

    /// Filter, sort and print stored replays.
    Report {
        /// First participant filter (also the reference player for
        /// score/avg_speed/car sorts and the win/loss column).
        #[arg(long, value_name = "NAME")]
        p1: Option<String>,

        /// Second participant filter.
        #[arg(long, value_name = "NAME")]
        p2: Option<String>,

        /// Date floor: keep replays from the last N months.
        #[arg(long, value_name = "N")]
        months: Option<u32>,

        /// Keep only one game mode (1, 2, 3 or p).
        #[arg(long, value_name = "MODE", value_parser = parse_mode)]
        mode: Option<GameMode>,

        /// Drop private-lobby replays.
        #[arg(long, default_value_t = false)]
        exclude_private: bool,

        /// Keep only replays with at least K tracked players present.
        #[arg(long, value_name = "K")]
        stacked: Option<usize>,

        /// Sort strategy: score, spm, thousand, avg_speed or car.
        #[arg(long, value_name = "STRATEGY", value_parser = parse_sort)]
        sort: Option<SortStrategy>,
    },

    /// Connectivity check against the remote API.
    Ping,

    /// Create a fresh empty store artifact.
    InitStore,
}

fn parse_mode(s: &str) -> Result<GameMode, String> {
    GameMode::from_code(s).ok_or_else(|| format!("unknown game mode '{}' (use 1, 2, 3 or p)", s))
}

fn parse_sort(s: &str) -> Result<SortStrategy, String> {
    SortStrategy::from_code(s).ok_or_else(|| {
        format!(
            "unknown sort strategy '{}' (use score, spm, thousand, avg_speed or car)",
            s
        )
    })
}

impl Cli {
    /// Validate cross-argument requirements clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Command::Report { p1, sort, .. } = &self.command {
            if let Some(strategy) = sort {
                if strategy.needs_participant() && p1.is_none() {
                    return Err(format!(
                        "--sort {} needs a reference player; supply --p1",
                        strategy.as_code()
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_sorts_require_p1() {
        let cli = Cli::parse_from(["replay-scout", "report", "--sort", "score"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["replay-scout", "report", "--sort", "score", "--p1", "alpha"]);
        assert!(cli.validate().is_ok());

        // spm ranges over all tracked players, no reference needed.
        let cli = Cli::parse_from(["replay-scout", "report", "--sort", "spm"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_mode_parsing() {
        let cli = Cli::parse_from(["replay-scout", "report", "--mode", "2"]);
        match cli.command {
            Command::Report { mode, .. } => assert_eq!(mode, Some(GameMode::Doubles)),
            _ => unreachable!(),
        }
        assert!(Cli::try_parse_from(["replay-scout", "report", "--mode", "9"]).is_err());
    }
}
