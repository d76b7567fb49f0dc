use serde::{Deserialize, Serialize};

use crate::domain::{Circle, Feedback, GuessRange, Hint, RgbHex, RoundPhase, ScoreEntry, SessionId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientRequest {
    SpawnCircle,
    ConfigureRange {
        min: i64,
        max: i64,
    },
    SetMaxAttempts {
        max_attempts: u32,
    },
    SetHintsEnabled {
        enabled: bool,
    },
    Guess {
        value: i64,
    },
    RequestHint,
    NewGame,
    Reveal,
    ResetLeaderboard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: SessionId,
}

/// Where and how the host draws one circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleOverlay {
    pub left_pct: u8,
    pub top_pct: u8,
    pub diameter_px: u8,
    pub color_hex: RgbHex,
}

impl From<&Circle> for CircleOverlay {
    fn from(circle: &Circle) -> Self {
        Self {
            left_pct: circle.x,
            top_pct: circle.y,
            diameter_px: circle.size,
            color_hex: circle.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub score: u32,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub range: GuessRange,
    pub max_attempts: u32,
    pub hints_enabled: bool,
    pub phase: RoundPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Feedback>,
    pub attempt_count: u32,
    pub attempt_history: Vec<i64>,
    pub hints_used: u32,
    pub closeness_pct: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_score: Option<u32>,
    pub leaderboard: Vec<LeaderboardRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    CircleSpawned {
        overlay: CircleOverlay,
        total: usize,
    },
    RangeConfigured {
        range: GuessRange,
        new_round: bool,
    },
    SettingsUpdated {
        max_attempts: u32,
        hints_enabled: bool,
    },
    GuessEvaluated {
        feedback: Feedback,
        attempt_count: u32,
        celebrate: bool,
    },
    HintGiven {
        hint: Hint,
        text: String,
        attempt_count: u32,
    },
    GameStarted {
        range: GuessRange,
    },
    NumberRevealed {
        secret: i64,
    },
    LeaderboardReset,
}

/// Ledger entries as the host lists them.
pub fn leaderboard_rows(entries: &[ScoreEntry]) -> Vec<LeaderboardRow> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| LeaderboardRow {
            rank: idx + 1,
            score: entry.score,
            timestamp: entry.timestamp.clone(),
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
