use shared::{
    domain::{GuessRange, ScoreEntry},
    protocol::{leaderboard_rows, GameView},
};

use crate::game::NumberGame;

pub const LEADERBOARD_SIZE: usize = 5;

/// How close the last guess landed, 0-100. Zero before any guess.
pub fn closeness_pct(last_guess: Option<i64>, secret: i64, range: GuessRange) -> u8 {
    let Some(last) = last_guess else {
        return 0;
    };
    let distance = last.abs_diff(secret) as f64;
    let width = range.width().max(1) as f64;
    let closeness = (1.0 - distance / width).clamp(0.0, 1.0);
    (closeness * 100.0).round() as u8
}

pub fn best_score(ledger: &[ScoreEntry]) -> Option<u32> {
    ledger.iter().map(|entry| entry.score).min()
}

/// Lowest scores first. Ties keep the order they were recorded in.
pub fn top_scores(ledger: &[ScoreEntry], limit: usize) -> Vec<ScoreEntry> {
    let mut sorted = ledger.to_vec();
    sorted.sort_by_key(|entry| entry.score);
    sorted.truncate(limit);
    sorted
}

impl NumberGame {
    pub fn closeness_pct(&self) -> u8 {
        closeness_pct(
            self.attempt_history().last().copied(),
            self.secret(),
            self.range(),
        )
    }

    pub fn best_score(&self) -> Option<u32> {
        best_score(self.ledger())
    }

    pub fn leaderboard(&self) -> Vec<ScoreEntry> {
        top_scores(self.ledger(), LEADERBOARD_SIZE)
    }

    pub fn view(&self) -> GameView {
        GameView {
            range: self.range(),
            max_attempts: self.max_attempts(),
            hints_enabled: self.hints_enabled(),
            phase: self.phase(),
            message: self.message(),
            attempt_count: self.attempt_count(),
            attempt_history: self.attempt_history().to_vec(),
            hints_used: self.hints_used(),
            closeness_pct: self.closeness_pct(),
            best_score: self.best_score(),
            leaderboard: leaderboard_rows(&self.leaderboard()),
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
