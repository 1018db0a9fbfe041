//! Integration tests: move classification and game-state derivation over
//! real move sequences.

mod common;

use chess_core::move_log::sequence_number;
use chess_core::{GameStatus, PlayerColor};
use rand::rngs::StdRng;
use rand::SeedableRng;

use common::{play, random_playout};

#[test]
fn test_log_length_and_numbering_for_random_games() {
    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (game, log) = random_playout(&mut rng, 80);

        let plies = log.len();
        assert!(plies == 80 || game.is_game_over(), "seed {seed} stopped early");

        for (i, entry) in log.iter().enumerate() {
            assert_eq!(entry.move_number, ((i + 1) as u32).div_ceil(2));
            assert_eq!(entry.move_number, sequence_number(i));
            let expected = if i % 2 == 0 {
                PlayerColor::White
            } else {
                PlayerColor::Black
            };
            assert_eq!(entry.color, expected);
        }
    }
}

#[test]
fn test_status_matches_precedence_for_random_games() {
    for seed in 100..125 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (game, _) = random_playout(&mut rng, 120);

        let expected = if game.is_checkmate() {
            GameStatus::Checkmate
        } else if game.is_stalemate() {
            GameStatus::Stalemate
        } else if game.is_draw() {
            GameStatus::Draw
        } else if game.is_check() {
            GameStatus::Check
        } else {
            GameStatus::Playing
        };
        assert_eq!(GameStatus::of(&game), expected, "seed {seed}");
    }
}

#[test]
fn test_first_move_entry() {
    let (_, log) = play(&["e2e4"]);
    let entry = log.last().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(entry.move_number, 1);
    assert_eq!(entry.color, PlayerColor::White);
    assert!(entry.captured.is_none());
    assert!(!entry.is_check);

    let json = serde_json::to_value(entry).unwrap();
    assert!(json.get("captured").is_none());
    assert_eq!(json["color"], "white");
}

#[test]
fn test_mate_in_one_entry() {
    // Scholar's mate: Qxf7#
    let (game, log) = play(&["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"]);
    let entry = log.last().unwrap();
    assert!(entry.is_checkmate);
    assert!(entry.is_check);
    assert_eq!(entry.captured.as_deref(), Some("p"));
    assert_eq!(entry.notation, "Qxf7#");
    assert_eq!(GameStatus::of(&game).label(), "Checkmate");
    assert_eq!(
        entry.describe(),
        "White Queen captured Pawn h5 → f7 - Checkmate!"
    );
}

#[test]
fn test_en_passant_entry() {
    let (_, log) = play(&["e2e4", "a7a6", "e4e5", "d7d5", "e5d6"]);
    let entry = log.last().unwrap();
    assert!(entry.is_en_passant);
    assert_eq!(entry.captured.as_deref(), Some("p"));
    assert_eq!(entry.notation, "exd6");
}
