//! Leaderboard
//!
//! Raw entries come from the remote store unordered, with any number of
//! entries per name. The ranked board keeps each player's best entry,
//! sorted by score (desc) then regressions (asc).

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::BOARD_ROWS;
use crate::sim::RoundResult;

/// One score submission, as sent to and received from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawItem")]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    /// Decoy hits ("regressions" on the wire)
    #[serde(rename = "regressions")]
    pub penalties: u32,
    /// ISO-8601 creation time
    #[serde(rename = "date")]
    pub timestamp: String,
}

/// Wire shape of a stored item; the store may name the timestamp either way
#[derive(Debug, Deserialize)]
struct RawItem {
    name: String,
    #[serde(default)]
    score: Option<u32>,
    #[serde(default, alias = "penalties")]
    regressions: Option<u32>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, rename = "createdAt")]
    created_at: Option<String>,
}

impl From<RawItem> for LeaderboardEntry {
    fn from(item: RawItem) -> Self {
        Self {
            name: item.name,
            score: item.score.unwrap_or(0),
            penalties: item.regressions.unwrap_or(0),
            timestamp: item
                .date
                .filter(|d| !d.is_empty())
                .or(item.created_at)
                .unwrap_or_default(),
        }
    }
}

impl LeaderboardEntry {
    /// Submission for a finished round; None for a zero-score round
    pub fn from_round(result: &RoundResult, timestamp: String) -> Option<Self> {
        if result.score == 0 {
            return None;
        }
        Some(Self {
            name: result.player.as_str().to_string(),
            score: result.score,
            penalties: result.penalties,
            timestamp,
        })
    }
}

impl fmt::Display for LeaderboardEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({} reg)", self.name, self.score, self.penalties)
    }
}

/// Decode a GET payload (`{ "items": [...] }`)
///
/// A body that is not JSON is an error. A missing or non-array `items`
/// field means "no entries", and items that don't decode are skipped.
pub fn parse_payload(body: &str) -> Result<Vec<LeaderboardEntry>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let Some(items) = value.get("items").and_then(|v| v.as_array()) else {
        log::warn!("Leaderboard payload has no item list, treating as empty");
        return Ok(Vec::new());
    };

    let entries: Vec<LeaderboardEntry> = items
        .iter()
        .filter_map(|item| LeaderboardEntry::deserialize(item).ok())
        .collect();
    if entries.len() < items.len() {
        log::debug!("Skipped {} malformed leaderboard items", items.len() - entries.len());
    }
    Ok(entries)
}

/// Rank raw entries: best entry per name, score desc then regressions asc
///
/// The sort is stable, so exact ties keep their arrival order.
pub fn reduce(mut raw: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    raw.sort_by(|a, b| b.score.cmp(&a.score).then(a.penalties.cmp(&b.penalties)));

    let mut seen = HashSet::new();
    raw.retain(|entry| seen.insert(entry.name.clone()));
    raw
}

/// Deduplicated, ordered board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedLeaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl RankedLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a raw fetch
    pub fn from_raw(raw: Vec<LeaderboardEntry>) -> Self {
        Self {
            entries: reduce(raw),
        }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Check if the board is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First three places
    pub fn podium(&self) -> &[LeaderboardEntry] {
        &self.entries[..self.entries.len().min(3)]
    }

    /// Places 4 through `BOARD_ROWS`, with their 1-indexed rank
    pub fn table_rows(&self) -> impl Iterator<Item = (usize, &LeaderboardEntry)> {
        self.entries
            .iter()
            .enumerate()
            .skip(3)
            .take(BOARD_ROWS.saturating_sub(3))
            .map(|(i, e)| (i + 1, e))
    }

    /// 1-indexed rank of a player
    pub fn rank_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name).map(|i| i + 1)
    }
}

/// Board view state around fetches
///
/// Overlapping fetches are not fenced: whichever completes last wins.
/// `loading` stays set while any fetch is outstanding.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub board: RankedLeaderboard,
    pub loading: bool,
    /// Last fetch error, cleared when a new fetch starts
    pub error: Option<String>,
    in_flight: u32,
    fetches_completed: u32,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a fetch as started
    pub fn begin_fetch(&mut self) {
        self.in_flight += 1;
        self.loading = true;
        self.error = None;
    }

    /// Apply a completed fetch; on error the previous board stays
    pub fn finish_fetch<E: fmt::Display>(&mut self, result: Result<Vec<LeaderboardEntry>, E>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.loading = self.in_flight > 0;
        self.fetches_completed += 1;

        match result {
            Ok(raw) => {
                self.board = RankedLeaderboard::from_raw(raw);
                self.error = None;
                log::info!("Leaderboard refreshed ({} players)", self.board.len());
            }
            Err(e) => {
                log::warn!("Leaderboard fetch failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Number of fetches that have completed (either way)
    pub fn fetches_completed(&self) -> u32 {
        self.fetches_completed
    }
}

/// Format a timestamp as a relative date string
pub fn format_date(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(timestamp) else {
        return "-".to_string();
    };
    let then = then.with_timezone(&Utc);
    let diff = now.signed_duration_since(then);

    let days = diff.num_days();
    let hours = diff.num_hours();
    let mins = diff.num_minutes();

    if days >= 1 {
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else {
            format!("{}/{}/{:02}", then.month(), then.day(), then.year() % 100)
        }
    } else if hours >= 1 {
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if mins >= 1 {
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
