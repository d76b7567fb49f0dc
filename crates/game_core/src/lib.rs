//! Logic for the circle spawner and the number guessing game.
//!
//! Hosts own a [`SessionStore`], look up the caller's [`Session`] and feed it
//! one [`shared::protocol::ClientRequest`] per interaction.

pub mod circles;
pub mod error;
pub mod game;
pub mod session;
pub mod view;

pub use circles::CircleBoard;
pub use error::GameError;
pub use game::{GameSettings, GuessOutcome, NumberGame, MAX_ATTEMPTS_CEILING};
pub use session::{Session, SessionStore};
