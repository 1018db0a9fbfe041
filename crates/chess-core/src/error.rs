//! Core error types

use thiserror::Error;

use crate::screen::Screen;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Cannot {action} from the {from} screen")]
    InvalidTransition { from: Screen, action: &'static str },

    #[error("Invalid square: {0}")]
    InvalidSquare(String),
}
