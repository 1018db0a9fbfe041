//! Chess domain core: the rules adapter over shakmaty, the move log and its
//! classifier, game-state derivation and the menu/screen flow.

pub mod error;
pub mod material;
pub mod move_log;
pub mod pgn;
pub mod rules;
pub mod screen;
pub mod settings;
pub mod status;

pub use error::CoreError;
pub use move_log::{MoveLog, MoveLogEntry};
pub use rules::{AppliedMove, Game};
pub use screen::{Screen, ScreenFlow};
pub use settings::{GameMode, GameSettings, PlayerColor};
pub use status::{GameStatus, TurnOwner, TurnState};
