use thiserror::Error;

/// Everything that can go wrong inside the game rules.
///
/// `InvalidIntent` is recoverable: the caller re-prompts. `IllegalMove` is
/// turned into a blocked-move event by the tick; the player stays put.
/// `OutOfRange` means a caller skipped validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid choice '{0}'")]
    InvalidIntent(char),

    #[error("can't move to ({row}, {col})")]
    IllegalMove { row: usize, col: usize },

    #[error("cell ({row}, {col}) is outside the {side}x{side} board")]
    OutOfRange { row: usize, col: usize, side: usize },

    #[error("dimension {0} is outside the range 10-50")]
    InvalidDimension(i64),
}

pub type Result<T> = std::result::Result<T, GameError>;
