use std::collections::HashMap;

use rand::{rngs::StdRng, SeedableRng};
use shared::{
    domain::{Circle, SessionId},
    protocol::{ClientRequest, ServerEvent},
};
use tracing::{debug, info};

use crate::{
    circles::CircleBoard,
    error::GameError,
    game::{GameSettings, NumberGame},
};

/// Everything one user touches. Hosts hand each interaction to [`Session::apply`].
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    circles: CircleBoard,
    game: NumberGame,
    rng: StdRng,
}

impl Session {
    pub fn new(id: SessionId, settings: GameSettings) -> Self {
        Self::with_rng(id, settings, StdRng::from_entropy())
    }

    pub fn with_rng(id: SessionId, settings: GameSettings, mut rng: StdRng) -> Self {
        let game = NumberGame::new(settings, &mut rng);
        Self {
            id,
            circles: CircleBoard::default(),
            game,
            rng,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn circles(&self) -> &CircleBoard {
        &self.circles
    }

    pub fn game(&self) -> &NumberGame {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut NumberGame {
        &mut self.game
    }

    pub fn spawn_circle(&mut self) -> Circle {
        self.circles.spawn(&mut self.rng)
    }

    pub fn apply(&mut self, request: ClientRequest) -> Result<ServerEvent, GameError> {
        debug!(session_id = %self.id, ?request, "applying request");
        let event = match request {
            ClientRequest::SpawnCircle => {
                let circle = self.spawn_circle();
                ServerEvent::CircleSpawned {
                    overlay: (&circle).into(),
                    total: self.circles.len(),
                }
            }
            ClientRequest::ConfigureRange { min, max } => {
                let new_round = self.game.configure_range(min, max, &mut self.rng)?;
                ServerEvent::RangeConfigured {
                    range: self.game.range(),
                    new_round,
                }
            }
            ClientRequest::SetMaxAttempts { max_attempts } => {
                self.update_settings(Some(max_attempts), None)?
            }
            ClientRequest::SetHintsEnabled { enabled } => self.update_settings(None, Some(enabled))?,
            ClientRequest::Guess { value } => {
                let outcome = self.game.guess(value)?;
                ServerEvent::GuessEvaluated {
                    feedback: outcome.feedback,
                    attempt_count: outcome.attempt_count,
                    celebrate: outcome.celebrate,
                }
            }
            ClientRequest::RequestHint => {
                let hint = self.game.request_hint()?;
                ServerEvent::HintGiven {
                    text: hint.to_string(),
                    hint,
                    attempt_count: self.game.attempt_count(),
                }
            }
            ClientRequest::NewGame => {
                self.game.new_game(&mut self.rng);
                ServerEvent::GameStarted {
                    range: self.game.range(),
                }
            }
            ClientRequest::Reveal => ServerEvent::NumberRevealed {
                secret: self.game.reveal(),
            },
            ClientRequest::ResetLeaderboard => {
                self.game.reset_leaderboard();
                ServerEvent::LeaderboardReset
            }
        };
        Ok(event)
    }

    /// Applies whichever settings are given. A rejected attempt limit leaves both untouched.
    pub fn update_settings(
        &mut self,
        max_attempts: Option<u32>,
        hints_enabled: Option<bool>,
    ) -> Result<ServerEvent, GameError> {
        if let Some(max_attempts) = max_attempts {
            self.game.set_max_attempts(max_attempts)?;
        }
        if let Some(enabled) = hints_enabled {
            self.game.set_hints_enabled(enabled);
        }
        Ok(ServerEvent::SettingsUpdated {
            max_attempts: self.game.max_attempts(),
            hints_enabled: self.game.hints_enabled(),
        })
    }
}

/// Live sessions keyed by id. A session exists from first access until [`SessionStore::end`].
#[derive(Debug, Default)]
pub struct SessionStore {
    settings: GameSettings,
    sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            sessions: HashMap::new(),
        }
    }

    pub fn create(&mut self) -> SessionId {
        let id = SessionId::new();
        self.get_or_create(id);
        id
    }

    pub fn get_or_create(&mut self, id: SessionId) -> &mut Session {
        let settings = self.settings;
        self.sessions.entry(id).or_insert_with(|| {
            info!(session_id = %id, "session started");
            Session::new(id, settings)
        })
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Drops the session and all of its state. Returns `false` if it was unknown.
    pub fn end(&mut self, id: SessionId) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "session ended");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
