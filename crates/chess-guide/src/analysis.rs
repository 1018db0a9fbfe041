//! The analysis result shown in guided mode and the parser for the
//! collaborator's JSON reply.

use serde::{Deserialize, Serialize};

use chess_core::{Game, PlayerColor};

use crate::error::GuideError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideBetter {
    White,
    Black,
    Equal,
}

impl SideBetter {
    /// Sign of a white-minus-black difference.
    pub fn from_diff(diff: i32) -> Self {
        match diff.signum() {
            1 => SideBetter::White,
            -1 => SideBetter::Black,
            _ => SideBetter::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedMove {
    /// UCI, e.g. `g1f3`
    #[serde(rename = "move")]
    pub mv: String,
    pub explanation: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub position_evaluation: String,
    /// White's winning chances, 0-100 for remote results. The material
    /// fallback is not clamped and may leave that range.
    pub winning_percentage: f64,
    pub side_better: SideBetter,
    pub opponent_move_analysis: String,
    #[serde(default)]
    pub suggested_moves: Vec<SuggestedMove>,
}

impl AnalysisResult {
    /// Drop suggestions that cannot be played in `game`, and all of them when
    /// the side to move is not `human_color`.
    pub fn restrict_to(mut self, game: &Game, human_color: PlayerColor) -> Self {
        if PlayerColor::from(game.turn()) != human_color {
            self.suggested_moves.clear();
            return self;
        }
        let legal = game.legal_uci();
        self.suggested_moves.retain(|s| {
            let mv = s.mv.trim().to_ascii_lowercase();
            legal
                .iter()
                .any(|l| *l == mv || (l.starts_with(&mv) && l.len() == mv.len() + 1))
        });
        self
    }
}

/// Strip a surrounding Markdown code fence, with or without a language tag.
fn strip_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse the collaborator's reply. Anything that is not a complete result
/// object with a percentage in 0..=100 is rejected.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, GuideError> {
    let body = strip_fence(text);
    if body.is_empty() {
        return Err(GuideError::EmptyResponse);
    }

    let result: AnalysisResult = serde_json::from_str(body)?;

    if !(0.0..=100.0).contains(&result.winning_percentage) {
        return Err(GuideError::Malformed(format!(
            "winningPercentage out of range: {}",
            result.winning_percentage
        )));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "positionEvaluation": "Balanced opening",
        "winningPercentage": 52,
        "sideBetter": "equal",
        "opponentMoveAnalysis": "e5 mirrors your center claim",
        "suggestedMoves": [
            {"move": "g1f3", "explanation": "Develops and hits e5", "priority": "high"},
            {"move": "e1e3", "explanation": "Not a move", "priority": "low"}
        ]
    }"#;

    #[test]
    fn test_parse_plain_json() {
        let result = parse_analysis(SAMPLE).unwrap();
        assert_eq!(result.winning_percentage, 52.0);
        assert_eq!(result.side_better, SideBetter::Equal);
        assert_eq!(result.suggested_moves[0].priority, Priority::High);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{SAMPLE}\n```");
        assert!(parse_analysis(&fenced).is_ok());
    }

    #[test]
    fn test_parse_rejects_prose_and_out_of_range() {
        assert!(matches!(
            parse_analysis("I think white is better."),
            Err(GuideError::Json(_))
        ));
        assert!(matches!(parse_analysis("   "), Err(GuideError::EmptyResponse)));

        let bad = SAMPLE.replace("52", "140");
        assert!(matches!(parse_analysis(&bad), Err(GuideError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_side() {
        let bad = SAMPLE.replace("\"equal\"", "\"nobody\"");
        assert!(parse_analysis(&bad).is_err());
    }

    #[test]
    fn test_restrict_drops_illegal_suggestions() {
        let mut game = Game::new_game();
        game.apply("e2e4").unwrap();
        game.apply("e7e5").unwrap();
        let result = parse_analysis(SAMPLE).unwrap().restrict_to(&game, PlayerColor::White);
        assert_eq!(result.suggested_moves.len(), 1);
        assert_eq!(result.suggested_moves[0].mv, "g1f3");
    }

    #[test]
    fn test_restrict_clears_on_opponent_turn() {
        let mut game = Game::new_game();
        game.apply("e2e4").unwrap();
        let result = parse_analysis(SAMPLE).unwrap().restrict_to(&game, PlayerColor::White);
        assert!(result.suggested_moves.is_empty());
    }

    #[test]
    fn test_serializes_move_field() {
        let result = parse_analysis(SAMPLE).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["suggestedMoves"][0]["move"], "g1f3");
        assert_eq!(json["sideBetter"], "equal");
    }
}
