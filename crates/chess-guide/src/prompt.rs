use chess_core::pgn::history_text;
use chess_core::{Game, PlayerColor};

use crate::orchestrator::AnalysisRequest;

/// Number of legal moves listed in the prompt.
pub const PROMPT_MOVE_LIMIT: usize = 8;

/// Build the analysis prompt for `request`, already loaded into `game`.
pub fn build_prompt(request: &AnalysisRequest, game: &Game) -> String {
    let to_move = PlayerColor::from(game.turn());
    let human = request.human_color;
    let for_human = to_move == human;

    let moves: Vec<String> = game
        .legal_uci()
        .into_iter()
        .take(PROMPT_MOVE_LIMIT)
        .collect();
    let moves = moves.join(", ");

    let status = if game.is_checkmate() {
        " (CHECKMATE)"
    } else if game.is_stalemate() {
        " (STALEMATE)"
    } else if game.is_check() {
        " (CHECK)"
    } else {
        ""
    };

    let last_move = request
        .last_move
        .as_ref()
        .map(|m| m.notation.as_str())
        .unwrap_or("Opening position");

    let history = history_text(&request.history);
    let history = if history.is_empty() { "none" } else { history.as_str() };

    let focus = if for_human {
        format!(
            "It is the human's turn. Suggest up to three moves for {} chosen ONLY from: {moves}.\n\
             Use from+to squares (e2e4, g1f3) and rank them high, medium, low.",
            human.name().to_uppercase()
        )
    } else {
        format!(
            "It is the opponent's turn ({}). DO NOT suggest moves: return an empty \
             suggestedMoves array.\nExplain the opponent's threats and what the human \
             should watch for next.",
            to_move.name().to_uppercase()
        )
    };

    format!(
        "You are a grandmaster coaching a club player who plays {human_up}.\n\
         \n\
         POSITION (FEN): {fen}{status}\n\
         SIDE TO MOVE: {to_move_up}\n\
         HUMAN COLOR: {human_up}\n\
         GAME HISTORY: {history}\n\
         LAST MOVE: {last_move}\n\
         LEGAL MOVES FOR {to_move_up}: {moves}\n\
         PIECES: {board}\n\
         \n\
         Evaluate material, king safety, piece activity and immediate tactics.\n\
         {focus}\n\
         \n\
         Return ONLY valid JSON in this shape:\n\
         {{\n\
           \"positionEvaluation\": \"who stands better and why\",\n\
           \"winningPercentage\": number_between_0_and_100_for_white,\n\
           \"sideBetter\": \"white\" | \"black\" | \"equal\",\n\
           \"opponentMoveAnalysis\": \"what the last move threatens or concedes\",\n\
           \"suggestedMoves\": [{{\"move\": \"e2e4\", \"explanation\": \"...\", \"priority\": \"high\"}}]\n\
         }}",
        human_up = human.name().to_uppercase(),
        fen = request.fen,
        to_move_up = to_move.name().to_uppercase(),
        board = game.board_description(),
    )
}
