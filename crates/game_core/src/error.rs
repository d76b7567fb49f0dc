use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

/// Rejections from the game transitions. None of them mutate state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("min ({min}) must be less than max ({max})")]
    InvalidRange { min: i64, max: i64 },
    #[error("attempt limit {requested} exceeds the allowed maximum of {ceiling}")]
    MaxAttemptsTooHigh { requested: u32, ceiling: u32 },
    #[error("attempt limit of {max_attempts} reached; start a new game to try again")]
    AttemptLimitReached { max_attempts: u32 },
    #[error("hints are disabled")]
    HintsDisabled,
    #[error("guess {value} is outside {min}-{max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
}

impl GameError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::InvalidRange { .. } | GameError::MaxAttemptsTooHigh { .. } => {
                ErrorCode::Configuration
            }
            GameError::AttemptLimitReached { .. } => ErrorCode::AttemptLimit,
            GameError::HintsDisabled => ErrorCode::HintsDisabled,
            GameError::OutOfRange { .. } => ErrorCode::Validation,
        }
    }
}

impl From<GameError> for ApiError {
    fn from(value: GameError) -> Self {
        ApiError::new(value.code(), value.to_string())
    }
}
