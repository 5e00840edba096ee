//! High score table
//!
//! Top 10 results, descending by score, persisted as one whitespace-separated
//! line per entry:
//!
//! `name score game_secs dot_diameter final_speed_ms`
//!
//! The file is rewritten in full after every game over. Losing it only loses
//! the leaderboard; gameplay never depends on it.

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Maximum number of entries kept in the table
pub const MAX_HIGH_SCORES: usize = 10;

/// Player names are capped at this many characters
pub const MAX_NAME_LEN: usize = 16;

/// One finished round on the leaderboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreEntry {
    /// Player name, already sanitized for the space-separated format
    pub name: String,
    /// Final score
    pub score: u32,
    /// Round length in seconds
    pub game_secs: u32,
    /// Dot diameter in pixels (affects movement distance)
    pub dot_diameter: u32,
    /// Dot update interval at the end of the round, in milliseconds
    pub final_speed_ms: u32,
}

/// Capacity-bounded leaderboard, kept descending by score
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScoreTable {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScoreTable {
    /// Create an empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the table (useful for deciding whether to
    /// prompt the player for a name)
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Insert a result, keeping the table descending by score and capped at
    /// [`MAX_HIGH_SCORES`].
    ///
    /// Equal scores rank below the entries already holding them; a tying
    /// score against a full table whose tail it doesn't strictly beat is
    /// dropped. Returns the 1-indexed rank, or None when nothing was added.
    pub fn insert(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None if self.entries.len() < MAX_HIGH_SCORES => {
                self.entries.push(entry);
                self.entries.len()
            }
            None => return None,
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Read a table from `path`.
    ///
    /// Lines that don't hold exactly five well-formed fields are skipped with
    /// a warning; the rest of the file still loads. A missing file surfaces
    /// as `ErrorKind::NotFound` so the caller can start fresh.
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(&line) {
                Some(entry) => entries.push(entry),
                None => log::warn!(
                    "{}:{}: skipping malformed high score line {:?}",
                    path.display(),
                    index + 1,
                    line
                ),
            }
        }
        log::info!("Loaded {} high scores", entries.len());
        Ok(Self { entries })
    }

    /// Write the table to `path`, overwriting in full.
    ///
    /// Entries with empty names are dropped rather than corrupting the
    /// space-separated format.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = String::new();
        for e in self.entries.iter().filter(|e| !e.name.is_empty()) {
            out.push_str(&format!(
                "{} {} {} {} {}\n",
                e.name, e.score, e.game_secs, e.dot_diameter, e.final_speed_ms
            ));
        }
        fs::write(path, out)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Parse one `name score game_secs dot_diameter final_speed_ms` line
fn parse_line(line: &str) -> Option<HighScoreEntry> {
    let mut fields = line.split_whitespace();
    let entry = HighScoreEntry {
        name: fields.next()?.to_string(),
        score: fields.next()?.parse().ok()?,
        game_secs: fields.next()?.parse().ok()?,
        dot_diameter: fields.next()?.parse().ok()?,
        final_speed_ms: fields.next()?.parse().ok()?,
    };
    if fields.next().is_some() {
        return None;
    }
    Some(entry)
}

/// Make a player name safe for the space-separated file format: whitespace
/// becomes underscores and the length is capped at [`MAX_NAME_LEN`].
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .take(MAX_NAME_LEN)
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}
