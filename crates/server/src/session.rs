//! The game controller: one screen flow, one game and everything the board
//! UI needs between requests.

use chrono::Utc;
use serde::Serialize;
use shakmaty::{Move, Role, Square};
use thiserror::Error;
use tracing::{debug, info};

use chess_core::pgn::{history_text, result_token, to_pgn, PgnHeaders};
use chess_core::rules::is_promotion_square;
use chess_core::{
    CoreError, Game, GameMode, GameSettings, GameStatus, MoveLog, MoveLogEntry, PlayerColor,
    Screen, ScreenFlow, TurnState,
};
use chess_guide::{
    AnalysisOutcome, AnalysisPanel, AnalysisRequest, AnalysisTicket, PanelView,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0} is not configured")]
    FeatureDisabled(&'static str),
}

/// Why a click or move did nothing. Never an error: the board just stays put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    NotInGame,
    EngineThinking,
    PromotionPending,
    GameOver,
    NotYourTurn,
    NoPromotionPending,
    IllegalMove,
    NotYourPiece,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum InputOutcome {
    Ignored { reason: IgnoreReason },
    Selected { square: String, targets: Vec<String> },
    Deselected,
    PromotionPending { from: String, to: String },
    Moved { entry: Box<MoveLogEntry> },
}

impl InputOutcome {
    fn ignored(reason: IgnoreReason) -> Self {
        InputOutcome::Ignored { reason }
    }

    pub fn moved(&self) -> bool {
        matches!(self, InputOutcome::Moved { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPromotion {
    from: Square,
    to: Square,
}

/// An engine move request; valid only while the game it was issued for is
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineTicket {
    epoch: u64,
    ply: usize,
    pub fen: String,
}

/// Where a move lands on the board. Castling targets the king's square.
fn destination(mv: &Move, turn: shakmaty::Color) -> Square {
    match mv.castling_side() {
        Some(side) => side.king_to(turn),
        None => mv.to(),
    }
}

fn parse_square(s: &str) -> Result<Square, CoreError> {
    s.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| CoreError::InvalidSquare(s.to_string()))
}

/// Promotion piece from a letter; anything but n/b/r/q is refused.
pub fn promotion_role(letter: char) -> Option<Role> {
    match Role::from_char(letter.to_ascii_lowercase())? {
        role @ (Role::Knight | Role::Bishop | Role::Rook | Role::Queen) => Some(role),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPromotionView {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub screen: Screen,
    pub settings: GameSettings,
    pub orientation: PlayerColor,
    pub fen: String,
    pub turn: TurnState,
    pub status_label: &'static str,
    pub engine_thinking: bool,
    pub selected: Option<String>,
    pub targets: Vec<String>,
    pub pending_promotion: Option<PendingPromotionView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogLine {
    #[serde(flatten)]
    pub entry: MoveLogEntry,
    pub player: &'static str,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub evaluation: String,
    pub winning_percentage: f64,
    pub suggested_moves: String,
}

/// What the voice assistant is told about the game.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessContext {
    pub game_mode: GameMode,
    pub human_color: Option<PlayerColor>,
    pub game_status: &'static str,
    pub move_history: String,
    pub last_move: Option<String>,
    pub current_turn: PlayerColor,
    pub analysis: Option<AnalysisSummary>,
}

pub struct GameSession {
    flow: ScreenFlow,
    game: Game,
    log: MoveLog,
    panel: AnalysisPanel,
    selected: Option<Square>,
    pending_promotion: Option<PendingPromotion>,
    engine_thinking: bool,
    epoch: u64,
    analysis_available: bool,
}

impl GameSession {
    /// `analysis_available` gates guided mode.
    pub fn new(analysis_available: bool) -> Self {
        Self {
            flow: ScreenFlow::new(),
            game: Game::new_game(),
            log: MoveLog::new(),
            panel: AnalysisPanel::new(),
            selected: None,
            pending_promotion: None,
            engine_thinking: false,
            epoch: 0,
            analysis_available,
        }
    }

    pub fn screen(&self) -> Screen {
        self.flow.screen()
    }

    pub fn settings(&self) -> &GameSettings {
        self.flow.settings()
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn panel(&self) -> &AnalysisPanel {
        &self.panel
    }

    pub fn is_engine_thinking(&self) -> bool {
        self.engine_thinking
    }

    pub fn turn_state(&self) -> TurnState {
        TurnState::derive(&self.game, self.flow.settings())
    }

    // ---- screen flow ----

    pub fn select_mode(&mut self, mode: GameMode) -> Result<Screen, SessionError> {
        if mode == GameMode::HumanVsEngineGuided && !self.analysis_available {
            return Err(SessionError::FeatureDisabled("Guided analysis"));
        }
        let screen = self.flow.select_mode(mode)?;
        info!(mode = mode.title(), "Mode selected");
        if screen == Screen::Game {
            self.reset();
        }
        Ok(screen)
    }

    pub fn select_color(&mut self, color: PlayerColor) -> Result<Screen, SessionError> {
        let screen = self.flow.select_color(color)?;
        info!(human = %color, "Color selected");
        self.reset();
        Ok(screen)
    }

    pub fn back_to_menu(&mut self) -> Result<Screen, SessionError> {
        let screen = self.flow.back_to_menu()?;
        self.reset();
        Ok(screen)
    }

    pub fn back_to_color_selection(&mut self) -> Result<Screen, SessionError> {
        let screen = self.flow.back_to_color_selection()?;
        self.reset();
        Ok(screen)
    }

    /// Start over: fresh board, empty log, no selection, and every
    /// outstanding engine move or analysis becomes stale.
    pub fn reset(&mut self) {
        self.game = Game::new_game();
        self.log.clear();
        self.panel.reset();
        self.selected = None;
        self.pending_promotion = None;
        self.engine_thinking = false;
        self.epoch += 1;
        debug!(epoch = self.epoch, "Session reset");
    }

    // ---- board input ----

    fn input_block(&self) -> Option<IgnoreReason> {
        if self.flow.screen() != Screen::Game {
            return Some(IgnoreReason::NotInGame);
        }
        if self.engine_thinking {
            return Some(IgnoreReason::EngineThinking);
        }
        if self.pending_promotion.is_some() {
            return Some(IgnoreReason::PromotionPending);
        }
        let turn = self.turn_state();
        if turn.is_game_over {
            return Some(IgnoreReason::GameOver);
        }
        if !turn.is_human_turn {
            return Some(IgnoreReason::NotYourTurn);
        }
        None
    }

    fn targets_from(&self, square: Square) -> Vec<Square> {
        let turn = self.game.turn();
        let mut targets: Vec<Square> = self
            .game
            .legal_moves(Some(square))
            .iter()
            .map(|m| destination(m, turn))
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }

    fn select(&mut self, square: Square) -> InputOutcome {
        let own_piece = self
            .game
            .piece_at(square)
            .is_some_and(|p| p.color == self.game.turn());
        if !own_piece {
            self.selected = None;
            return InputOutcome::ignored(IgnoreReason::NotYourPiece);
        }
        self.selected = Some(square);
        InputOutcome::Selected {
            square: square.to_string(),
            targets: self
                .targets_from(square)
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Board click: select, move, reselect or deselect.
    pub fn click(&mut self, square: &str) -> Result<InputOutcome, SessionError> {
        let square = parse_square(square)?;
        if let Some(reason) = self.input_block() {
            return Ok(InputOutcome::ignored(reason));
        }

        let Some(from) = self.selected else {
            return Ok(self.select(square));
        };

        if from == square {
            self.selected = None;
            return Ok(InputOutcome::Deselected);
        }

        if self.targets_from(from).contains(&square) {
            return Ok(self.move_to(from, square, None));
        }

        // Another own piece takes over the selection; anything else clears it.
        if self
            .game
            .piece_at(square)
            .is_some_and(|p| p.color == self.game.turn())
        {
            return Ok(self.select(square));
        }
        self.selected = None;
        Ok(InputOutcome::Deselected)
    }

    /// Play `from → to`, asking for a promotion piece when needed.
    fn move_to(&mut self, from: Square, to: Square, promotion: Option<Role>) -> InputOutcome {
        let turn = self.game.turn();
        let needs_promotion = self
            .game
            .piece_at(from)
            .is_some_and(|p| is_promotion_square(p.role, turn, to));

        if needs_promotion && promotion.is_none() {
            self.selected = None;
            self.pending_promotion = Some(PendingPromotion { from, to });
            return InputOutcome::PromotionPending {
                from: from.to_string(),
                to: to.to_string(),
            };
        }

        let candidate = self.game.legal_moves(Some(from)).into_iter().find(|m| {
            destination(m, turn) == to && m.promotion() == promotion.filter(|_| needs_promotion)
        });

        match candidate {
            Some(mv) => self.play(&mv),
            None => {
                self.selected = None;
                InputOutcome::ignored(IgnoreReason::IllegalMove)
            }
        }
    }

    /// Submit a move in UCI. A pawn reaching the last rank without a letter
    /// promotes to a queen.
    pub fn submit_uci(&mut self, uci: &str) -> Result<InputOutcome, SessionError> {
        if let Some(reason) = self.input_block() {
            return Ok(InputOutcome::ignored(reason));
        }
        let uci = uci.trim();
        if uci.len() > 5 {
            return Ok(InputOutcome::ignored(IgnoreReason::IllegalMove));
        }
        let (Some(from), Some(to)) = (uci.get(0..2), uci.get(2..4)) else {
            return Ok(InputOutcome::ignored(IgnoreReason::IllegalMove));
        };
        let from = parse_square(from)?;
        let to = parse_square(to)?;
        let promotion = match uci.chars().nth(4) {
            Some(letter) => match promotion_role(letter) {
                Some(role) => Some(role),
                None => return Ok(InputOutcome::ignored(IgnoreReason::IllegalMove)),
            },
            None => Some(Role::Queen),
        };
        Ok(self.move_to(from, to, promotion))
    }

    /// Finish a pending promotion with the chosen piece.
    pub fn choose_promotion(&mut self, letter: char) -> InputOutcome {
        let Some(pending) = self.pending_promotion else {
            return InputOutcome::ignored(IgnoreReason::NoPromotionPending);
        };
        let Some(role) = promotion_role(letter) else {
            return InputOutcome::ignored(IgnoreReason::IllegalMove);
        };
        self.pending_promotion = None;
        self.move_to(pending.from, pending.to, Some(role))
    }

    /// Dismiss a pending promotion without moving.
    pub fn cancel_promotion(&mut self) -> bool {
        self.pending_promotion.take().is_some()
    }

    fn play(&mut self, mv: &Move) -> InputOutcome {
        match self.game.apply_move(mv) {
            Some(applied) => {
                self.selected = None;
                let entry = self.log.record(&applied, &self.game).clone();
                info!(
                    ply = self.log.len(),
                    san = %entry.notation,
                    status = GameStatus::of(&self.game).label(),
                    "Move played"
                );
                InputOutcome::Moved {
                    entry: Box::new(entry),
                }
            }
            None => InputOutcome::ignored(IgnoreReason::IllegalMove),
        }
    }

    // ---- engine turn ----

    /// Claim the engine's turn if it is due. While claimed, human input is
    /// refused.
    pub fn begin_engine_turn(&mut self) -> Option<EngineTicket> {
        if self.flow.screen() != Screen::Game || self.engine_thinking {
            return None;
        }
        if !self.turn_state().engine_to_move() {
            return None;
        }
        self.engine_thinking = true;
        Some(EngineTicket {
            epoch: self.epoch,
            ply: self.log.len(),
            fen: self.game.fen(),
        })
    }

    /// Apply the engine's answer. Stale tickets are dropped; `None` from the
    /// engine means it does not move.
    pub fn finish_engine_turn(
        &mut self,
        ticket: &EngineTicket,
        uci: Option<&str>,
    ) -> Option<MoveLogEntry> {
        if ticket.epoch != self.epoch || ticket.ply != self.log.len() {
            debug!("Discarding stale engine move");
            return None;
        }
        self.engine_thinking = false;

        let mv = uci.and_then(|u| self.game.find_move(u))?;
        match self.play(&mv) {
            InputOutcome::Moved { entry } => Some(*entry),
            _ => None,
        }
    }

    // ---- analysis ----

    /// Start an analysis of the current position when guided mode is on and
    /// at least one move has been played.
    pub fn begin_analysis(&mut self) -> Option<(AnalysisTicket, AnalysisRequest)> {
        let settings = self.flow.settings();
        if self.flow.screen() != Screen::Game || !settings.guided || self.log.is_empty() {
            return None;
        }
        let human_color = settings.human_color?;
        let request = AnalysisRequest {
            fen: self.game.fen(),
            last_move: self.log.last().cloned(),
            human_color,
            history: self.log.entries().to_vec(),
        };
        Some((self.panel.begin(), request))
    }

    /// Publish an analysis. Returns false when it was requested before the
    /// last reset.
    pub fn finish_analysis(&mut self, ticket: AnalysisTicket, outcome: AnalysisOutcome) -> bool {
        self.panel.complete(ticket, outcome)
    }

    pub fn analysis_view(&self) -> PanelView {
        self.panel.view()
    }

    // ---- views ----

    pub fn view(&self) -> SessionView {
        let turn = self.turn_state();
        SessionView {
            screen: self.flow.screen(),
            settings: *self.flow.settings(),
            orientation: self.flow.settings().orientation(),
            fen: self.game.fen(),
            status_label: turn.status.label(),
            turn,
            engine_thinking: self.engine_thinking,
            selected: self.selected.map(|s| s.to_string()),
            targets: self
                .selected
                .map(|s| self.targets_from(s).iter().map(|t| t.to_string()).collect())
                .unwrap_or_default(),
            pending_promotion: self.pending_promotion.map(|p| PendingPromotionView {
                from: p.from.to_string(),
                to: p.to.to_string(),
            }),
        }
    }

    pub fn log_lines(&self) -> Vec<LogLine> {
        let settings = self.flow.settings();
        self.log
            .iter()
            .map(|entry| LogLine {
                player: settings.player_label(entry.color),
                description: entry.describe(),
                entry: entry.clone(),
            })
            .collect()
    }

    pub fn chess_context(&self) -> ChessContext {
        let settings = self.flow.settings();
        ChessContext {
            game_mode: settings.mode,
            human_color: settings.human_color,
            game_status: GameStatus::of(&self.game).label(),
            move_history: history_text(self.log.entries()),
            last_move: self.log.last().map(|e| e.notation.clone()),
            current_turn: PlayerColor::from(self.game.turn()),
            analysis: self.panel.result().map(|r| AnalysisSummary {
                evaluation: r.position_evaluation.clone(),
                winning_percentage: r.winning_percentage,
                suggested_moves: r
                    .suggested_moves
                    .iter()
                    .map(|s| s.mv.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }

    pub fn pgn(&self) -> String {
        let settings = self.flow.settings();
        let headers = PgnHeaders {
            white: settings.player_label(PlayerColor::White),
            black: settings.player_label(PlayerColor::Black),
            event: settings.mode.title(),
            date: Utc::now(),
        };
        let result = result_token(
            GameStatus::of(&self.game),
            PlayerColor::from(self.game.turn()),
        );
        to_pgn(self.log.entries(), &headers, result)
    }
}
