//! The fixed game-mode table.
//!
//! Ranked playlists carry well-known ids; unranked and private lobbies can
//! carry arbitrary strings. Filtering only ever matches against this table,
//! anything else is "unclassified" and matches no mode.

/// A matchmaking category a replay belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameMode {
    Duels,
    Doubles,
    Standard,
    Private,
}

impl GameMode {
    /// Parse the single-character mode codes used on the operational surface
    /// (`1`, `2`, `3`, `p`). Full playlist ids are accepted too.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" | "ranked-duels" => Some(GameMode::Duels),
            "2" | "ranked-doubles" => Some(GameMode::Doubles),
            "3" | "ranked-standard" => Some(GameMode::Standard),
            "p" | "private" => Some(GameMode::Private),
            _ => None,
        }
    }

    /// Classify a replay's raw playlist id, `None` for unranked/arbitrary ids.
    pub fn from_playlist_id(playlist_id: &str) -> Option<Self> {
        match playlist_id {
            "ranked-duels" => Some(GameMode::Duels),
            "ranked-doubles" => Some(GameMode::Doubles),
            "ranked-standard" => Some(GameMode::Standard),
            "private" => Some(GameMode::Private),
            _ => None,
        }
    }

    /// The playlist id the listing endpoint expects as a query parameter.
    pub fn playlist_id(self) -> &'static str {
        match self {
            GameMode::Duels => "ranked-duels",
            GameMode::Doubles => "ranked-doubles",
            GameMode::Standard => "ranked-standard",
            GameMode::Private => "private",
        }
    }

    /// Short code used in report lines.
    pub fn short_code(self) -> &'static str {
        match self {
            GameMode::Duels => "1v1",
            GameMode::Doubles => "2v2",
            GameMode::Standard => "3v3",
            GameMode::Private => "pri",
        }
    }
}
