//! Game-state derivation: whose turn it is, who owns that turn and whether
//! the game is over.

use serde::{Deserialize, Serialize};

use crate::rules::Game;
use crate::settings::{GameSettings, PlayerColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Checkmate,
    Stalemate,
    Draw,
    Check,
    Playing,
}

impl GameStatus {
    /// First matching condition wins: checkmate, stalemate, draw, check.
    pub fn of(game: &Game) -> Self {
        if game.is_checkmate() {
            GameStatus::Checkmate
        } else if game.is_stalemate() {
            GameStatus::Stalemate
        } else if game.is_draw() {
            GameStatus::Draw
        } else if game.is_check() {
            GameStatus::Check
        } else {
            GameStatus::Playing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GameStatus::Checkmate => "Checkmate",
            GameStatus::Stalemate => "Stalemate",
            GameStatus::Draw => "Draw",
            GameStatus::Check => "Check",
            GameStatus::Playing => "Playing",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Stalemate | GameStatus::Draw
        )
    }
}

/// Who is expected to supply the next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnOwner {
    Human,
    Engine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnState {
    pub turn: PlayerColor,
    pub owner: TurnOwner,
    pub is_human_turn: bool,
    pub is_game_over: bool,
    pub status: GameStatus,
}

impl TurnState {
    pub fn derive(game: &Game, settings: &GameSettings) -> Self {
        let turn = PlayerColor::from(game.turn());
        let owner = if settings.is_vs_engine() && settings.engine_color == Some(turn) {
            TurnOwner::Engine
        } else {
            TurnOwner::Human
        };
        let is_human_turn = if settings.is_vs_engine() {
            settings.human_color == Some(turn)
        } else {
            true
        };
        let status = GameStatus::of(game);

        Self {
            turn,
            owner,
            is_human_turn,
            is_game_over: status.is_terminal(),
            status,
        }
    }

    /// True when the controller should ask the opponent heuristic for a move.
    pub fn engine_to_move(&self) -> bool {
        self.owner == TurnOwner::Engine && !self.is_game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameMode;

    #[test]
    fn test_status_playing_at_start() {
        let game = Game::new_game();
        assert_eq!(GameStatus::of(&game), GameStatus::Playing);
        assert_eq!(GameStatus::of(&game).label(), "Playing");
    }

    #[test]
    fn test_status_check() {
        let game = Game::load("4k3/8/8/8/8/8/8/4K2R b - - 0 1").unwrap();
        assert_eq!(GameStatus::of(&game), GameStatus::Playing);
        let game = Game::load("4k2R/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(GameStatus::of(&game), GameStatus::Check);
    }

    #[test]
    fn test_status_checkmate_beats_check() {
        let game =
            Game::load("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert!(game.is_check());
        assert_eq!(GameStatus::of(&game), GameStatus::Checkmate);
        assert!(GameStatus::of(&game).is_terminal());
    }

    #[test]
    fn test_status_stalemate() {
        let game = Game::load("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(GameStatus::of(&game), GameStatus::Stalemate);
    }

    #[test]
    fn test_status_draw_by_fifty_moves() {
        let game = Game::load("4k3/8/8/8/8/8/4P3/4K2R w - - 100 80").unwrap();
        assert_eq!(GameStatus::of(&game), GameStatus::Draw);
    }

    #[test]
    fn test_human_vs_human_is_always_human_turn() {
        let mut game = Game::new_game();
        let settings = GameSettings::default();
        assert!(TurnState::derive(&game, &settings).is_human_turn);
        game.apply("e2e4").unwrap();
        let state = TurnState::derive(&game, &settings);
        assert!(state.is_human_turn);
        assert_eq!(state.turn, PlayerColor::Black);
        assert!(!state.engine_to_move());
    }

    #[test]
    fn test_engine_turn_ownership() {
        let mut game = Game::new_game();
        let settings =
            GameSettings::for_mode(GameMode::HumanVsEngineBasic).with_human_color(PlayerColor::White);
        let state = TurnState::derive(&game, &settings);
        assert!(state.is_human_turn);
        assert_eq!(state.owner, TurnOwner::Human);

        game.apply("e2e4").unwrap();
        let state = TurnState::derive(&game, &settings);
        assert!(!state.is_human_turn);
        assert_eq!(state.owner, TurnOwner::Engine);
        assert!(state.engine_to_move());
    }

    #[test]
    fn test_engine_does_not_move_in_finished_game() {
        let game = Game::load("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let settings =
            GameSettings::for_mode(GameMode::HumanVsEngineBasic).with_human_color(PlayerColor::White);
        let state = TurnState::derive(&game, &settings);
        assert_eq!(state.owner, TurnOwner::Engine);
        assert!(state.is_game_over);
        assert!(!state.engine_to_move());
    }
}
