//! The engine side: a deliberately weak, capture-hungry random mover.
//!
//! Policy, in order:
//! 1. any capture available → uniform among captures;
//! 2. otherwise, with probability 0.3, uniform among checking moves (if any);
//! 3. otherwise uniform among all legal moves.

use std::time::Duration;

use chess_core::Game;
use rand::seq::SliceRandom;
use rand::Rng;
use shakmaty::{CastlingMode, Move, Position};
use tracing::{debug, warn};

pub const CHECK_PROBABILITY: f64 = 0.3;

/// Uniform random pause before the engine answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkingDelay {
    pub min: Duration,
    pub max: Duration,
}

impl Default for ThinkingDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(500),
            max: Duration::from_millis(2000),
        }
    }
}

impl ThinkingDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if max <= min {
            return self.min;
        }
        Duration::from_millis(rng.gen_range(min..=max))
    }
}

fn gives_check(game: &Game, mv: &Move) -> bool {
    let mut after = game.position().clone();
    after.play_unchecked(mv.clone());
    after.is_check()
}

/// Pick a move with the capture/check-biased policy. `None` when the side to
/// move has no legal moves.
pub fn choose_move<R: Rng + ?Sized>(game: &Game, rng: &mut R) -> Option<Move> {
    let moves = game.legal_moves(None);
    if moves.is_empty() {
        return None;
    }

    let captures: Vec<&Move> = moves.iter().filter(|m| m.is_capture()).collect();
    if let Some(mv) = captures.choose(rng) {
        return Some((*mv).clone());
    }

    if rng.gen_bool(CHECK_PROBABILITY) {
        let checks: Vec<&Move> = moves.iter().filter(|m| gives_check(game, m)).collect();
        if let Some(mv) = checks.choose(rng) {
            return Some((*mv).clone());
        }
    }

    moves.choose(rng).cloned()
}

/// Uniform choice among all legal moves.
pub fn choose_random<R: Rng + ?Sized>(game: &Game, rng: &mut R) -> Option<Move> {
    game.legal_moves(None).choose(rng).cloned()
}

/// Pick a move for the position in `fen`, as a UCI string with an optional
/// promotion letter. A position that fails strict validation still gets a
/// uniformly random move if it can be loaded leniently.
pub fn choose_uci<R: Rng + ?Sized>(fen: &str, rng: &mut R) -> Option<String> {
    let mv = match Game::load(fen) {
        Ok(game) => choose_move(&game, rng),
        Err(e) => {
            warn!(error = %e, "Engine position rejected, falling back to random move");
            match Game::load_lenient(fen) {
                Ok(game) => choose_random(&game, rng),
                Err(e) => {
                    warn!(error = %e, "Engine position unusable");
                    None
                }
            }
        }
    }?;
    Some(mv.to_uci(CastlingMode::Standard).to_string())
}

/// The engine-side move source.
#[derive(Debug, Clone, Default)]
pub struct RandomMover {
    delay: ThinkingDelay,
}

impl RandomMover {
    pub fn new(delay: ThinkingDelay) -> Self {
        Self { delay }
    }

    /// Think for a while, then pick a move. `None` means there is nothing to
    /// play, not an error.
    pub async fn best_move(&self, fen: &str) -> Option<String> {
        let delay = self.delay.sample(&mut rand::thread_rng());
        debug!(?delay, "Engine thinking");
        tokio::time::sleep(delay).await;
        choose_uci(fen, &mut rand::thread_rng())
    }
}
