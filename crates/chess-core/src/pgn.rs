//! Move-history text: the compact form used in analysis prompts and the
//! voice context, and a PGN export of the log.

use chrono::{DateTime, Utc};

use crate::move_log::MoveLogEntry;
use crate::status::GameStatus;
use crate::settings::PlayerColor;

/// `1. e4 1... e5 2. Nf3`: every ply prefixed with its number.
pub fn history_text(entries: &[MoveLogEntry]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let dots = if i % 2 == 0 { "." } else { "..." };
            format!("{}{} {}", i / 2 + 1, dots, entry.notation)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// PGN result token for a finished (or unfinished) game.
pub fn result_token(status: GameStatus, side_to_move: PlayerColor) -> &'static str {
    match status {
        GameStatus::Checkmate => match side_to_move {
            PlayerColor::White => "0-1",
            PlayerColor::Black => "1-0",
        },
        GameStatus::Stalemate | GameStatus::Draw => "1/2-1/2",
        GameStatus::Check | GameStatus::Playing => "*",
    }
}

pub struct PgnHeaders<'a> {
    pub white: &'a str,
    pub black: &'a str,
    pub event: &'a str,
    pub date: DateTime<Utc>,
}

/// Render the log as PGN with the seven-tag roster.
pub fn to_pgn(entries: &[MoveLogEntry], headers: &PgnHeaders, result: &str) -> String {
    let mut pgn = String::new();
    let tags = [
        ("Event", headers.event.to_string()),
        ("Site", "?".to_string()),
        ("Date", headers.date.format("%Y.%m.%d").to_string()),
        ("Round", "-".to_string()),
        ("White", headers.white.to_string()),
        ("Black", headers.black.to_string()),
        ("Result", result.to_string()),
    ];
    for (key, value) in tags {
        pgn.push_str(&format!("[{key} \"{value}\"]\n"));
    }
    pgn.push('\n');

    let mut movetext = Vec::with_capacity(entries.len() + 1);
    for (i, entry) in entries.iter().enumerate() {
        if i % 2 == 0 {
            movetext.push(format!("{}. {}", i / 2 + 1, entry.notation));
        } else {
            movetext.push(entry.notation.clone());
        }
    }
    movetext.push(result.to_string());
    pgn.push_str(&movetext.join(" "));
    pgn.push('\n');
    pgn
}
