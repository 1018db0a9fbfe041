//! Analysis orchestration: remote analyst with a deadline, material fallback,
//! and the panel state that decides which result is shown.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use chess_core::{Game, MoveLogEntry, PlayerColor};

use crate::analysis::{AnalysisResult, SideBetter};
use crate::anthropic::LlmAnalyst;
use crate::config::GuideConfig;
use crate::error::GuideError;
use crate::fallback::fallback_analysis;

/// Snapshot handed to an analyst after a move completes.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub fen: String,
    pub last_move: Option<MoveLogEntry>,
    pub human_color: PlayerColor,
    pub history: Vec<MoveLogEntry>,
}

/// Something that can evaluate a position remotely.
#[async_trait]
pub trait Analyst: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, GuideError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub source: AnalysisSource,
}

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    analyst: Option<Arc<dyn Analyst>>,
    timeout: Duration,
}

impl AnalysisOrchestrator {
    pub fn new(analyst: Option<Arc<dyn Analyst>>, timeout: Duration) -> Self {
        Self { analyst, timeout }
    }

    /// Build from configuration; without an API key every analysis is local.
    pub fn from_config(config: &GuideConfig) -> Result<Self, GuideError> {
        let analyst: Option<Arc<dyn Analyst>> = match &config.analysis {
            Some(analysis) => Some(Arc::new(LlmAnalyst::new(analysis)?)),
            None => None,
        };
        Ok(Self::new(analyst, config.analysis_timeout))
    }

    pub fn remote_enabled(&self) -> bool {
        self.analyst.is_some()
    }

    /// Analyze `request`. Never fails: any remote problem, including the
    /// deadline passing, yields the material fallback instead.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let game = match Game::load(&request.fen).or_else(|_| Game::load_lenient(&request.fen)) {
            Ok(game) => game,
            Err(e) => {
                warn!(error = %e, "Cannot analyze position");
                return AnalysisOutcome {
                    result: unavailable(),
                    source: AnalysisSource::Fallback,
                };
            }
        };

        if let Some(analyst) = &self.analyst {
            match tokio::time::timeout(self.timeout, analyst.analyze(request)).await {
                Ok(Ok(result)) => {
                    info!(
                        winning = result.winning_percentage,
                        suggestions = result.suggested_moves.len(),
                        "Remote analysis ready"
                    );
                    return AnalysisOutcome {
                        result: result.restrict_to(&game, request.human_color),
                        source: AnalysisSource::Remote,
                    };
                }
                Ok(Err(e)) => warn!(error = %e, "Remote analysis failed, using fallback"),
                Err(_) => warn!(
                    error = %GuideError::Timeout(self.timeout),
                    "Remote analysis failed, using fallback"
                ),
            }
        }

        AnalysisOutcome {
            result: fallback_analysis(&game, request.last_move.as_ref(), request.human_color),
            source: AnalysisSource::Fallback,
        }
    }
}

fn unavailable() -> AnalysisResult {
    AnalysisResult {
        position_evaluation: "Position unavailable".to_string(),
        winning_percentage: 50.0,
        side_better: SideBetter::Equal,
        opponent_move_analysis: String::new(),
        suggested_moves: Vec::new(),
    }
}

/// Identifies one analysis request. Tickets from before a reset are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket {
    epoch: u64,
    seq: u64,
}

impl AnalysisTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    /// Nothing requested since the last reset
    Idle,
    Pending,
    Ready,
}

/// What the analysis panel shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub status: PanelStatus,
    pub source: Option<AnalysisSource>,
    pub result: Option<AnalysisResult>,
}

/// Latest analysis plus the in-flight flag.
///
/// A completed analysis replaces the previous one outright. Completions are
/// not ordered against each other within an epoch; the in-flight flag clears
/// once the most recently issued request resolves.
#[derive(Debug, Default)]
pub struct AnalysisPanel {
    epoch: u64,
    issued: u64,
    in_flight: bool,
    latest: Option<AnalysisOutcome>,
}

impl AnalysisPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> AnalysisTicket {
        self.issued += 1;
        self.in_flight = true;
        AnalysisTicket {
            epoch: self.epoch,
            seq: self.issued,
        }
    }

    /// Store `outcome` unless `ticket` predates the last reset. Returns
    /// whether the outcome was kept.
    pub fn complete(&mut self, ticket: AnalysisTicket, outcome: AnalysisOutcome) -> bool {
        if ticket.epoch != self.epoch {
            return false;
        }
        self.latest = Some(outcome);
        if ticket.seq == self.issued {
            self.in_flight = false;
        }
        true
    }

    /// Forget the shown result and invalidate every outstanding ticket.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.in_flight = false;
        self.latest = None;
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn status(&self) -> PanelStatus {
        if self.in_flight {
            PanelStatus::Pending
        } else if self.latest.is_some() {
            PanelStatus::Ready
        } else {
            PanelStatus::Idle
        }
    }

    pub fn latest(&self) -> Option<&AnalysisOutcome> {
        self.latest.as_ref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.latest.as_ref().map(|o| &o.result)
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            status: self.status(),
            source: self.latest.as_ref().map(|o| o.source),
            result: self.result().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Priority, SuggestedMove};
    use chess_core::MoveLog;

    struct FixedAnalyst(AnalysisResult);

    #[async_trait]
    impl Analyst for FixedAnalyst {
        async fn analyze(&self, _: &AnalysisRequest) -> Result<AnalysisResult, GuideError> {
            Ok(self.0.clone())
        }
    }

    struct FailingAnalyst;

    #[async_trait]
    impl Analyst for FailingAnalyst {
        async fn analyze(&self, _: &AnalysisRequest) -> Result<AnalysisResult, GuideError> {
            Err(GuideError::Malformed("not json".into()))
        }
    }

    struct SlowAnalyst;

    #[async_trait]
    impl Analyst for SlowAnalyst {
        async fn analyze(&self, _: &AnalysisRequest) -> Result<AnalysisResult, GuideError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Err(GuideError::EmptyResponse)
        }
    }

    fn remote_result() -> AnalysisResult {
        AnalysisResult {
            position_evaluation: "White is slightly better".into(),
            winning_percentage: 55.0,
            side_better: SideBetter::White,
            opponent_move_analysis: "Solid".into(),
            suggested_moves: vec![SuggestedMove {
                mv: "g1f3".into(),
                explanation: "Develop".into(),
                priority: Priority::High,
            }],
        }
    }

    fn request(moves: &[&str], human: PlayerColor) -> AnalysisRequest {
        let mut game = Game::new_game();
        let mut log = MoveLog::new();
        for uci in moves {
            let applied = game.apply(uci).unwrap();
            log.record(&applied, &game);
        }
        AnalysisRequest {
            fen: game.fen(),
            last_move: log.last().cloned(),
            human_color: human,
            history: log.entries().to_vec(),
        }
    }

    fn orchestrator(analyst: impl Analyst + 'static) -> AnalysisOrchestrator {
        AnalysisOrchestrator::new(Some(Arc::new(analyst)), Duration::from_millis(100))
    }

    #[tokio::test]
    async fn test_remote_result_used() {
        let orch = orchestrator(FixedAnalyst(remote_result()));
        let outcome = orch.analyze(&request(&["e2e4", "e7e5"], PlayerColor::White)).await;
        assert_eq!(outcome.source, AnalysisSource::Remote);
        assert_eq!(outcome.result.suggested_moves.len(), 1);
    }

    #[tokio::test]
    async fn test_remote_suggestions_dropped_on_opponent_turn() {
        let orch = orchestrator(FixedAnalyst(remote_result()));
        let outcome = orch.analyze(&request(&["e2e4"], PlayerColor::White)).await;
        assert_eq!(outcome.source, AnalysisSource::Remote);
        assert!(outcome.result.suggested_moves.is_empty());
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let orch = orchestrator(FailingAnalyst);
        let outcome = orch.analyze(&request(&[], PlayerColor::White)).await;
        assert_eq!(outcome.source, AnalysisSource::Fallback);
        assert_eq!(outcome.result.winning_percentage, 50.0);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let orch = orchestrator(SlowAnalyst);
        let outcome = orch.analyze(&request(&["e2e4"], PlayerColor::Black)).await;
        assert_eq!(outcome.source, AnalysisSource::Fallback);
        assert_eq!(outcome.result.suggested_moves.len(), 2);
    }

    #[tokio::test]
    async fn test_no_analyst_is_local_only() {
        let orch = AnalysisOrchestrator::new(None, Duration::from_secs(1));
        assert!(!orch.remote_enabled());
        let outcome = orch.analyze(&request(&[], PlayerColor::White)).await;
        assert_eq!(outcome.source, AnalysisSource::Fallback);
    }

    #[test]
    fn test_panel_lifecycle() {
        let mut panel = AnalysisPanel::new();
        assert_eq!(panel.status(), PanelStatus::Idle);

        let ticket = panel.begin();
        assert_eq!(panel.status(), PanelStatus::Pending);

        let outcome = AnalysisOutcome {
            result: remote_result(),
            source: AnalysisSource::Remote,
        };
        assert!(panel.complete(ticket, outcome));
        assert_eq!(panel.status(), PanelStatus::Ready);
        assert_eq!(panel.view().source, Some(AnalysisSource::Remote));
    }

    #[test]
    fn test_panel_pending_until_latest_resolves() {
        let mut panel = AnalysisPanel::new();
        let first = panel.begin();
        let second = panel.begin();
        let outcome = AnalysisOutcome {
            result: unavailable(),
            source: AnalysisSource::Fallback,
        };
        assert!(panel.complete(first, outcome.clone()));
        assert_eq!(panel.status(), PanelStatus::Pending);
        assert!(panel.complete(second, outcome));
        assert_eq!(panel.status(), PanelStatus::Ready);
    }

    #[test]
    fn test_panel_discards_stale_ticket() {
        let mut panel = AnalysisPanel::new();
        let ticket = panel.begin();
        panel.reset();
        assert_eq!(panel.status(), PanelStatus::Idle);

        let outcome = AnalysisOutcome {
            result: remote_result(),
            source: AnalysisSource::Remote,
        };
        assert!(!panel.complete(ticket, outcome));
        assert!(panel.result().is_none());
        assert_eq!(panel.status(), PanelStatus::Idle);
    }
}
