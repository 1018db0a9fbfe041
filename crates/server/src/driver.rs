//! Background work triggered by moves: the engine's reply and guided-mode
//! analysis. Both run in spawned tasks and hold the session lock only to
//! claim a ticket and to publish the result.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use chess_guide::{AnalysisOrchestrator, RandomMover};

use crate::session::GameSession;

pub type SharedSession = Arc<Mutex<GameSession>>;

pub struct GameDriver {
    session: SharedSession,
    mover: RandomMover,
    orchestrator: AnalysisOrchestrator,
}

impl GameDriver {
    pub fn new(
        session: GameSession,
        mover: RandomMover,
        orchestrator: AnalysisOrchestrator,
    ) -> Arc<Self> {
        Arc::new(Self {
            session: Arc::new(Mutex::new(session)),
            mover,
            orchestrator,
        })
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Start whatever the current state calls for. The caller holds the
    /// session lock and passes the guarded session in.
    pub fn schedule(self: &Arc<Self>, session: &mut GameSession) {
        if let Some((ticket, request)) = session.begin_analysis() {
            let driver = Arc::clone(self);
            tokio::spawn(async move {
                let outcome = driver.orchestrator.analyze(&request).await;
                let source = outcome.source;
                let mut session = driver.session.lock().await;
                if session.finish_analysis(ticket, outcome) {
                    info!(?source, "Analysis published");
                } else {
                    debug!(epoch = ticket.epoch(), "Discarding stale analysis");
                }
            });
        }

        if let Some(ticket) = session.begin_engine_turn() {
            let driver = Arc::clone(self);
            tokio::spawn(async move {
                let uci = driver.mover.best_move(&ticket.fen).await;
                let mut session = driver.session.lock().await;
                if let Some(entry) = session.finish_engine_turn(&ticket, uci.as_deref()) {
                    debug!(san = %entry.notation, "Engine moved");
                    driver.schedule(&mut session);
                }
            });
        }
    }
}
