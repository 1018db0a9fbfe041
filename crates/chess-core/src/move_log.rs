//! Move log and the classifier that turns an applied move into a log entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shakmaty::{CastlingSide, Role};

use crate::rules::{AppliedMove, Game};
use crate::settings::PlayerColor;

/// One applied move, annotated with the state it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveLogEntry {
    pub move_number: u32,
    pub color: PlayerColor,
    /// Lowercase piece letter (`p`, `n`, `b`, `r`, `q`, `k`).
    pub piece: String,
    pub from: String,
    pub to: String,
    /// SAN, e.g. `Nf3`, `exd5`, `O-O`, `Qh4#`.
    pub notation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured: Option<String>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_castling: bool,
    pub is_en_passant: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Move number for the ply at `index` (0-based): `ceil((index + 1) / 2)`.
/// A white move and the black reply share a number.
pub fn sequence_number(index: usize) -> u32 {
    (index as u32 + 2) / 2
}

fn role_letter(role: Role) -> String {
    role.char().to_string()
}

fn piece_name(letter: &str) -> &str {
    match letter {
        "p" => "Pawn",
        "n" => "Knight",
        "b" => "Bishop",
        "r" => "Rook",
        "q" => "Queen",
        "k" => "King",
        other => other,
    }
}

/// Build the log entry for `applied`, which produced the position in `after`.
///
/// Check, checkmate and stalemate describe the resulting position, so they
/// are read from `after` rather than from the move. `log_len` is the number of
/// entries already in the log.
pub fn classify(applied: &AppliedMove, after: &Game, log_len: usize) -> MoveLogEntry {
    MoveLogEntry {
        move_number: sequence_number(log_len),
        color: PlayerColor::from(applied.color),
        piece: role_letter(applied.role),
        from: applied.from.to_string(),
        to: applied.to.to_string(),
        notation: applied.san.clone(),
        captured: applied.capture.map(role_letter),
        is_check: after.is_check(),
        is_checkmate: after.is_checkmate(),
        is_stalemate: after.is_stalemate(),
        is_castling: applied.castle.is_some(),
        is_en_passant: applied.en_passant,
        promotion: applied.promotion.map(role_letter),
        timestamp: Utc::now(),
    }
}

impl MoveLogEntry {
    /// Castling side, derived from the destination file.
    pub fn castling_side(&self) -> Option<CastlingSide> {
        if !self.is_castling {
            return None;
        }
        if self.to.starts_with('g') {
            Some(CastlingSide::KingSide)
        } else {
            Some(CastlingSide::QueenSide)
        }
    }

    /// Plain-language description for the move log panel.
    pub fn describe(&self) -> String {
        let color = self.color.name();

        if let Some(side) = self.castling_side() {
            let side = match side {
                CastlingSide::KingSide => "kingside",
                CastlingSide::QueenSide => "queenside",
            };
            return format!("{color} castled {side}");
        }

        let mut description = format!("{color} {}", piece_name(&self.piece));
        match &self.captured {
            Some(captured) => {
                description.push_str(" captured ");
                description.push_str(piece_name(captured));
            }
            None => description.push_str(" moved"),
        }
        description.push_str(&format!(" {} → {}", self.from, self.to));

        if let Some(promotion) = &self.promotion {
            description.push_str(&format!(" (promoted to {})", piece_name(promotion)));
        }

        if self.is_checkmate {
            description.push_str(" - Checkmate!");
        } else if self.is_check {
            description.push_str(" - Check!");
        } else if self.is_stalemate {
            description.push_str(" - Stalemate!");
        }

        description
    }
}

/// Append-only record of the moves played since the last reset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MoveLog {
    entries: Vec<MoveLogEntry>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `applied` against the resulting game and append the entry.
    pub fn record(&mut self, applied: &AppliedMove, after: &Game) -> &MoveLogEntry {
        let entry = classify(applied, after, self.entries.len());
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&MoveLogEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[MoveLogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveLogEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut Game, log: &mut MoveLog, uci: &str) -> MoveLogEntry {
        let applied = game.apply(uci).expect("legal move");
        log.record(&applied, game).clone()
    }

    #[test]
    fn test_sequence_number() {
        assert_eq!(sequence_number(0), 1);
        assert_eq!(sequence_number(1), 1);
        assert_eq!(sequence_number(2), 2);
        assert_eq!(sequence_number(3), 2);
        assert_eq!(sequence_number(10), 6);
    }

    #[test]
    fn test_first_move_entry() {
        let mut game = Game::new_game();
        let mut log = MoveLog::new();
        let entry = play(&mut game, &mut log, "e2e4");

        assert_eq!(entry.move_number, 1);
        assert_eq!(entry.color, PlayerColor::White);
        assert_eq!(entry.piece, "p");
        assert_eq!(entry.from, "e2");
        assert_eq!(entry.to, "e4");
        assert_eq!(entry.notation, "e4");
        assert!(entry.captured.is_none());
        assert!(!entry.is_check);
        assert!(!entry.is_castling);
    }

    #[test]
    fn test_reply_shares_move_number() {
        let mut game = Game::new_game();
        let mut log = MoveLog::new();
        play(&mut game, &mut log, "e2e4");
        let reply = play(&mut game, &mut log, "d7d5");
        assert_eq!(reply.move_number, 1);
        assert_eq!(reply.color, PlayerColor::Black);

        let capture = play(&mut game, &mut log, "e4d5");
        assert_eq!(capture.move_number, 2);
        assert_eq!(capture.captured.as_deref(), Some("p"));
        assert_eq!(capture.notation, "exd5");
    }

    #[test]
    fn test_castling_entry_and_description() {
        let mut game =
            Game::load("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let mut log = MoveLog::new();
        let entry = play(&mut game, &mut log, "e1g1");
        assert!(entry.is_castling);
        assert_eq!(entry.castling_side(), Some(CastlingSide::KingSide));
        assert_eq!(entry.describe(), "White castled kingside");

        let entry = play(&mut game, &mut log, "e8c8");
        assert_eq!(entry.castling_side(), Some(CastlingSide::QueenSide));
        assert_eq!(entry.describe(), "Black castled queenside");
    }

    #[test]
    fn test_describe_capture_promotion_and_mate() {
        let entry = MoveLogEntry {
            move_number: 40,
            color: PlayerColor::White,
            piece: "p".into(),
            from: "b7".into(),
            to: "a8".into(),
            notation: "bxa8=Q#".into(),
            captured: Some("r".into()),
            is_check: true,
            is_checkmate: true,
            is_stalemate: false,
            is_castling: false,
            is_en_passant: false,
            promotion: Some("q".into()),
            timestamp: Utc::now(),
        };
        assert_eq!(
            entry.describe(),
            "White Pawn captured Rook b7 → a8 (promoted to Queen) - Checkmate!"
        );
    }

    #[test]
    fn test_check_flag_read_from_resulting_state() {
        let mut game = Game::load("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let mut log = MoveLog::new();
        let entry = play(&mut game, &mut log, "a1a8");
        assert!(entry.is_check);
        assert!(!entry.is_checkmate);
        assert_eq!(entry.describe(), "White Rook moved a1 → a8 - Check!");
    }

    #[test]
    fn test_clear_empties_log() {
        let mut game = Game::new_game();
        let mut log = MoveLog::new();
        play(&mut game, &mut log, "e2e4");
        log.clear();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let mut game = Game::new_game();
        let mut log = MoveLog::new();
        let entry = play(&mut game, &mut log, "g1f3");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["moveNumber"], 1);
        assert_eq!(json["color"], "white");
        assert_eq!(json["isCheck"], false);
        assert!(json.get("captured").is_none());
    }
}
