use chrono::{Local, NaiveDateTime};
use rand::Rng;
use shared::domain::{Feedback, GuessRange, Hint, RoundPhase, ScoreEntry};
use tracing::{debug, info};

use crate::error::GameError;

/// Highest accepted attempt limit. Zero still means unlimited.
pub const MAX_ATTEMPTS_CEILING: u32 = 20;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Host-provided knobs. Construction validates them, so a `GameSettings`
/// is always usable as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    range: GuessRange,
    max_attempts: u32,
    hints_enabled: bool,
}

impl GameSettings {
    pub fn new(
        range: GuessRange,
        max_attempts: u32,
        hints_enabled: bool,
    ) -> Result<Self, GameError> {
        validate_range(range.min, range.max)?;
        validate_max_attempts(max_attempts)?;
        Ok(Self {
            range,
            max_attempts,
            hints_enabled,
        })
    }

    pub fn range(&self) -> GuessRange {
        self.range
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn hints_enabled(&self) -> bool {
        self.hints_enabled
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            range: GuessRange::default(),
            max_attempts: 0,
            hints_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessOutcome {
    pub feedback: Feedback,
    pub attempt_count: u32,
    /// Set on a win; the host plays its celebration.
    pub celebrate: bool,
}

/// One session's guessing game: the current round plus the score ledger and
/// configuration that outlive it.
#[derive(Debug, Clone)]
pub struct NumberGame {
    range: GuessRange,
    max_attempts: u32,
    hints_enabled: bool,
    secret: i64,
    attempt_count: u32,
    attempt_history: Vec<i64>,
    hints_used: u32,
    message: Option<Feedback>,
    phase: RoundPhase,
    ledger: Vec<ScoreEntry>,
}

impl NumberGame {
    pub fn new<R: Rng + ?Sized>(settings: GameSettings, rng: &mut R) -> Self {
        let range = settings.range;
        Self {
            range,
            max_attempts: settings.max_attempts,
            hints_enabled: settings.hints_enabled,
            secret: draw_secret(range, rng),
            attempt_count: 0,
            attempt_history: Vec::new(),
            hints_used: 0,
            message: None,
            phase: RoundPhase::InRound,
            ledger: Vec::new(),
        }
    }

    /// Applies a new range. Returns `true` when the range changed and a new
    /// round was drawn, `false` when it matched the stored one.
    pub fn configure_range<R: Rng + ?Sized>(
        &mut self,
        min: i64,
        max: i64,
        rng: &mut R,
    ) -> Result<bool, GameError> {
        validate_range(min, max)?;
        let range = GuessRange { min, max };
        if range == self.range {
            return Ok(false);
        }
        self.range = range;
        self.start_round(rng);
        debug!(%range, "range changed, new round");
        Ok(true)
    }

    pub fn set_max_attempts(&mut self, max_attempts: u32) -> Result<(), GameError> {
        validate_max_attempts(max_attempts)?;
        self.max_attempts = max_attempts;
        Ok(())
    }

    pub fn set_hints_enabled(&mut self, enabled: bool) {
        self.hints_enabled = enabled;
    }

    pub fn guess(&mut self, value: i64) -> Result<GuessOutcome, GameError> {
        self.guess_at(value, Local::now().naive_local())
    }

    /// `guess` with an explicit clock for the ledger timestamp.
    pub fn guess_at(&mut self, value: i64, now: NaiveDateTime) -> Result<GuessOutcome, GameError> {
        if !self.range.contains(value) {
            return Err(GameError::OutOfRange {
                value,
                min: self.range.min,
                max: self.range.max,
            });
        }
        self.ensure_attempt_available()?;

        self.attempt_count += 1;
        self.attempt_history.push(value);

        let feedback = if value < self.secret {
            Feedback::Higher
        } else if value > self.secret {
            Feedback::Lower
        } else {
            Feedback::Won {
                attempts: self.attempt_count,
            }
        };
        self.message = Some(feedback);

        let celebrate = matches!(feedback, Feedback::Won { .. });
        if celebrate {
            self.ledger.push(ScoreEntry {
                score: self.attempt_count,
                timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            });
            self.phase = RoundPhase::Won;
            info!(attempts = self.attempt_count, "number found");
        } else {
            debug!(value, attempts = self.attempt_count, ?feedback, "guess evaluated");
        }

        Ok(GuessOutcome {
            feedback,
            attempt_count: self.attempt_count,
            celebrate,
        })
    }

    /// Spends one attempt on a hint whose tier is the running hint count.
    pub fn request_hint(&mut self) -> Result<Hint, GameError> {
        if !self.hints_enabled {
            return Err(GameError::HintsDisabled);
        }
        self.ensure_attempt_available()?;

        self.hints_used += 1;
        self.attempt_count += 1;
        let hint = hint_for(self.hints_used, self.secret, self.range);
        debug!(tier = self.hints_used, attempts = self.attempt_count, "hint given");
        Ok(hint)
    }

    pub fn new_game<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.start_round(rng);
        debug!(range = %self.range, "new game");
    }

    /// Gives up on the round: clears history and message, keeps the secret,
    /// attempt count and hint count. A `new_game` is needed for a fresh round.
    pub fn reveal(&mut self) -> i64 {
        self.attempt_history.clear();
        self.message = None;
        self.phase = RoundPhase::Abandoned;
        debug!(secret = self.secret, "number revealed");
        self.secret
    }

    pub fn reset_leaderboard(&mut self) {
        self.ledger.clear();
        debug!("leaderboard reset");
    }

    pub fn range(&self) -> GuessRange {
        self.range
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn hints_enabled(&self) -> bool {
        self.hints_enabled
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn attempt_history(&self) -> &[i64] {
        &self.attempt_history
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn message(&self) -> Option<Feedback> {
        self.message
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn ledger(&self) -> &[ScoreEntry] {
        &self.ledger
    }

    pub(crate) fn secret(&self) -> i64 {
        self.secret
    }

    #[cfg(test)]
    pub(crate) fn set_secret(&mut self, secret: i64) {
        self.secret = secret;
    }

    fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.secret = draw_secret(self.range, rng);
        self.attempt_count = 0;
        self.attempt_history.clear();
        self.hints_used = 0;
        self.message = None;
        self.phase = RoundPhase::InRound;
    }

    fn ensure_attempt_available(&self) -> Result<(), GameError> {
        if self.max_attempts > 0 && self.attempt_count >= self.max_attempts {
            return Err(GameError::AttemptLimitReached {
                max_attempts: self.max_attempts,
            });
        }
        Ok(())
    }
}

/// Hint text for the given tier. Tier 3 and above always use the same window.
pub fn hint_for(tier: u32, secret: i64, range: GuessRange) -> Hint {
    match tier {
        0 | 1 => Hint::Parity {
            even: secret.rem_euclid(2) == 0,
        },
        2 => Hint::DivisibleByThree {
            divisible: secret.rem_euclid(3) == 0,
        },
        _ => {
            let span = i128::from((range.width() / 10).max(1));
            let secret = i128::from(secret);
            // Both bounds are clamped into the range, so they fit back into i64.
            Hint::Window {
                low: (secret - span).max(i128::from(range.min)) as i64,
                high: (secret + span).min(i128::from(range.max)) as i64,
            }
        }
    }
}

fn draw_secret<R: Rng + ?Sized>(range: GuessRange, rng: &mut R) -> i64 {
    rng.gen_range(range.min..=range.max)
}

fn validate_range(min: i64, max: i64) -> Result<(), GameError> {
    if min >= max {
        return Err(GameError::InvalidRange { min, max });
    }
    Ok(())
}

fn validate_max_attempts(max_attempts: u32) -> Result<(), GameError> {
    if max_attempts > MAX_ATTEMPTS_CEILING {
        return Err(GameError::MaxAttemptsTooHigh {
            requested: max_attempts,
            ceiling: MAX_ATTEMPTS_CEILING,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/game_tests.rs"]
mod tests;
