#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chess_core::{Game, MoveLog};
use chess_guide::config::{AnalysisConfig, GuideConfig};
use chess_guide::{AnalysisOrchestrator, Analyst, RandomMover, ThinkingDelay};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use reqwest::Client;
use server::config::{Config, VoiceConfig};
use server::driver::GameDriver;
use server::session::GameSession;
use server::voice::VoiceHub;

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

/// Play `moves` (UCI) from the start, recording each into a log.
pub fn play(moves: &[&str]) -> (Game, MoveLog) {
    let mut game = Game::new_game();
    let mut log = MoveLog::new();
    for uci in moves {
        let applied = game
            .apply(uci)
            .unwrap_or_else(|| panic!("illegal move in fixture: {uci}"));
        log.record(&applied, &game);
    }
    (game, log)
}

/// Play up to `plies` uniformly random legal moves.
pub fn random_playout(rng: &mut StdRng, plies: usize) -> (Game, MoveLog) {
    let mut game = Game::new_game();
    let mut log = MoveLog::new();
    for _ in 0..plies {
        let moves = game.legal_moves(None);
        let Some(mv) = moves.choose(rng) else {
            break;
        };
        let applied = game.apply_move(mv).expect("legal move");
        log.record(&applied, &game);
    }
    (game, log)
}

/// A running server on an ephemeral port.
pub struct TestApp {
    pub base_url: String,
    pub driver: Arc<GameDriver>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Start the full router in-process. `analyst` stands in for the remote
/// analysis service; the engine answers without delay.
pub async fn spawn_app(analyst: Option<Arc<dyn Analyst>>, voice: bool) -> TestApp {
    let remote = analyst.is_some();
    let orchestrator = AnalysisOrchestrator::new(analyst, Duration::from_secs(2));
    let driver = GameDriver::new(
        GameSession::new(remote),
        RandomMover::new(ThinkingDelay::none()),
        orchestrator,
    );

    let config = Config {
        host: "127.0.0.1".into(),
        port: 0,
        guide: GuideConfig {
            analysis: remote.then(|| AnalysisConfig {
                api_key: "test-key".into(),
                model: "stub".into(),
                base_url: "http://127.0.0.1:9".into(),
                max_tokens: 100,
            }),
            ..GuideConfig::default()
        },
        voice: voice.then(|| VoiceConfig {
            api_key: "test-public-key".into(),
            assistant_id: "test-assistant".into(),
        }),
    };
    let hub = VoiceHub::spawn(Duration::from_millis(100));
    let app = server::build_router(config, Arc::clone(&driver), hub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    TestApp {
        base_url: format!("http://{addr}"),
        driver,
    }
}
