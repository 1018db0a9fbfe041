//! Rules adapter over shakmaty.
//!
//! Everything that needs legality, check detection or FEN handling goes
//! through `Game`; the rest of the workspace never mutates a position itself.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::uci::UciMove;
use shakmaty::{
    CastlingMode, CastlingSide, Chess, Color, EnPassantMode, File, Move, Piece, Position, Rank,
    Role, Square,
};

use crate::error::CoreError;

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value at which the fifty-move rule applies.
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Result of applying one legal move, as reported by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub color: Color,
    pub role: Role,
    pub from: Square,
    /// Destination of the moving piece (the king's square for castling).
    pub to: Square,
    pub capture: Option<Role>,
    pub promotion: Option<Role>,
    pub castle: Option<CastlingSide>,
    pub en_passant: bool,
    /// SAN including the `+`/`#` suffix.
    pub san: String,
    pub uci: String,
}

/// Live game state: a position plus the repetition history needed for
/// threefold detection.
#[derive(Debug, Clone)]
pub struct Game {
    pos: Chess,
    seen: Vec<String>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new_game()
    }
}

impl Game {
    pub fn new_game() -> Self {
        Self::from_position(Chess::default())
    }

    /// Load a position from FEN. Repetition history starts fresh.
    pub fn load(fen: &str) -> Result<Self, CoreError> {
        let invalid = |reason: String| CoreError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let setup: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let pos: Chess = setup
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;
        Ok(Self::from_position(pos))
    }

    /// Load a position, tolerating inconsistent castling rights, en passant
    /// squares, excess material and impossible checks.
    pub fn load_lenient(fen: &str) -> Result<Self, CoreError> {
        let invalid = |reason: String| CoreError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };
        let setup: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
        let pos: Chess = setup
            .into_position::<Chess>(CastlingMode::Standard)
            .or_else(|e| e.ignore_invalid_castling_rights())
            .or_else(|e| e.ignore_invalid_ep_square())
            .or_else(|e| e.ignore_too_much_material())
            .or_else(|e| e.ignore_impossible_check())
            .map_err(|e| invalid(format!("{e}")))?;
        Ok(Self::from_position(pos))
    }

    fn from_position(pos: Chess) -> Self {
        let mut game = Self {
            pos,
            seen: Vec::new(),
        };
        let key = game.repetition_key();
        game.seen.push(key);
        game
    }

    pub fn position(&self) -> &Chess {
        &self.pos
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    /// FEN without the move counters; equal keys mean a repeated position.
    fn repetition_key(&self) -> String {
        let fen = self.fen();
        fen.split(' ').take(4).collect::<Vec<_>>().join(" ")
    }

    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.pos.board().piece_at(square)
    }

    /// Legal moves, optionally restricted to those starting on `from`.
    pub fn legal_moves(&self, from: Option<Square>) -> Vec<Move> {
        self.pos
            .legal_moves()
            .into_iter()
            .filter(|m| from.is_none() || m.from() == from)
            .collect()
    }

    /// All legal moves in UCI notation (`e2e4`, `e7e8q`).
    pub fn legal_uci(&self) -> Vec<String> {
        self.pos
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }

    /// Resolve a UCI string to a legal move in the current position.
    pub fn find_move(&self, uci: &str) -> Option<Move> {
        let parsed: UciMove = uci.trim().parse().ok()?;
        parsed.to_move(&self.pos).ok()
    }

    /// Apply a UCI move. Returns `None` when it is malformed or illegal;
    /// the position is left untouched in that case.
    pub fn apply(&mut self, uci: &str) -> Option<AppliedMove> {
        let mv = self.find_move(uci)?;
        self.apply_move(&mv)
    }

    /// Apply a move produced by `legal_moves`. Illegal moves return `None`.
    pub fn apply_move(&mut self, mv: &Move) -> Option<AppliedMove> {
        if !self.pos.legal_moves().contains(mv) {
            return None;
        }

        let color = self.pos.turn();
        let from = mv.from()?;
        let castle = match mv {
            Move::Castle { king, rook } => Some(if rook.file() > king.file() {
                CastlingSide::KingSide
            } else {
                CastlingSide::QueenSide
            }),
            _ => None,
        };
        // shakmaty reports the rook square as the target of a castling move
        let to = match castle {
            Some(CastlingSide::KingSide) => Square::from_coords(File::G, from.rank()),
            Some(CastlingSide::QueenSide) => Square::from_coords(File::C, from.rank()),
            None => mv.to(),
        };
        let san = San::from_move(&self.pos, mv.clone()).to_string();
        let uci = mv.to_uci(CastlingMode::Standard).to_string();

        self.pos.play_unchecked(mv.clone());
        let key = self.repetition_key();
        self.seen.push(key);

        let suffix = if self.pos.is_checkmate() {
            "#"
        } else if self.pos.is_check() {
            "+"
        } else {
            ""
        };

        Some(AppliedMove {
            color,
            role: mv.role(),
            from,
            to,
            capture: mv.capture(),
            promotion: mv.promotion(),
            castle,
            en_passant: mv.is_en_passant(),
            san: format!("{san}{suffix}"),
            uci,
        })
    }

    pub fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.pos.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.pos.is_insufficient_material()
    }

    pub fn is_threefold_repetition(&self) -> bool {
        match self.seen.last() {
            Some(current) => self.seen.iter().filter(|k| *k == current).count() >= 3,
            None => false,
        }
    }

    /// Draw by insufficient material, the fifty-move rule or threefold
    /// repetition. Stalemate is reported separately.
    pub fn is_draw(&self) -> bool {
        self.is_insufficient_material()
            || self.pos.halfmoves() >= FIFTY_MOVE_HALFMOVES
            || self.is_threefold_repetition()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_stalemate() || self.is_draw()
    }

    /// Occupied squares as `e1:K e8:k ...`, rank 8 first.
    pub fn board_description(&self) -> String {
        let board = self.pos.board();
        let mut parts = Vec::new();
        for rank in (0..8u32).rev() {
            for file in 0..8u32 {
                let sq = Square::from_coords(File::new(file), Rank::new(rank));
                if let Some(piece) = board.piece_at(sq) {
                    parts.push(format!("{sq}:{}", piece.char()));
                }
            }
        }
        parts.join(" ")
    }
}

/// Whether moving a piece of `role` to `to` needs a promotion choice.
pub fn is_promotion_square(role: Role, color: Color, to: Square) -> bool {
    role == Role::Pawn
        && match color {
            Color::White => to.rank() == Rank::Eighth,
            Color::Black => to.rank() == Rank::First,
        }
}
