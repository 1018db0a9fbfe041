//! Local material evaluation used whenever remote analysis is unavailable.

use chess_core::material::{piece_value, Material};
use chess_core::{Game, MoveLogEntry, PlayerColor};
use shakmaty::{CastlingMode, Position};

use crate::analysis::{AnalysisResult, Priority, SideBetter, SuggestedMove};

/// Moves offered by the fallback on the human's turn.
pub const FALLBACK_SUGGESTIONS: usize = 2;

/// `50 + 2 × (white − black)`. Not clamped: a lopsided position can report a
/// value below 0 or above 100.
pub fn winning_percentage(material: Material) -> f64 {
    50.0 + 2.0 * f64::from(material.diff())
}

fn piece_name(letter: &str) -> &str {
    match letter {
        "p" => "pawn",
        "n" => "knight",
        "b" => "bishop",
        "r" => "rook",
        "q" => "queen",
        "k" => "king",
        other => other,
    }
}

fn evaluation_sentence(material: Material) -> String {
    match SideBetter::from_diff(material.diff()) {
        SideBetter::White => format!(
            "White is ahead in material ({} to {})",
            material.white, material.black
        ),
        SideBetter::Black => format!(
            "Black is ahead in material ({} to {})",
            material.black, material.white
        ),
        SideBetter::Equal => "Material is equal".to_string(),
    }
}

fn opponent_commentary(last_move: Option<&MoveLogEntry>) -> String {
    match last_move {
        None => "Game just started".to_string(),
        Some(entry) => match &entry.captured {
            Some(captured) => format!(
                "{} {} took a {} on {}",
                entry.color.name(),
                piece_name(&entry.piece),
                piece_name(captured),
                entry.to
            ),
            None => format!(
                "{} moved the {} to {} to control space",
                entry.color.name(),
                piece_name(&entry.piece),
                entry.to
            ),
        },
    }
}

/// Deterministic analysis from material alone.
pub fn fallback_analysis(
    game: &Game,
    last_move: Option<&MoveLogEntry>,
    human_color: PlayerColor,
) -> AnalysisResult {
    let material = Material::count(game.position().board());

    let suggested_moves = if PlayerColor::from(game.turn()) == human_color {
        game.legal_moves(None)
            .iter()
            .take(FALLBACK_SUGGESTIONS)
            .map(|m| {
                let role = m.role();
                SuggestedMove {
                    mv: m.to_uci(CastlingMode::Standard).to_string(),
                    explanation: format!(
                        "Develop the {} to {} (material value {})",
                        piece_name(&role.char().to_string()),
                        m.to(),
                        piece_value(role)
                    ),
                    priority: Priority::Low,
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    AnalysisResult {
        position_evaluation: evaluation_sentence(material),
        winning_percentage: winning_percentage(material),
        side_better: SideBetter::from_diff(material.diff()),
        opponent_move_analysis: opponent_commentary(last_move),
        suggested_moves,
    }
}
