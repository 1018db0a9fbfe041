use server::config::Config;
use server::driver::GameDriver;
use server::session::GameSession;
use server::voice::{VoiceHub, FREEZE_AFTER};

use chess_guide::{AnalysisOrchestrator, RandomMover};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();

    let orchestrator = AnalysisOrchestrator::from_config(&config.guide)?;
    let mover = RandomMover::new(config.guide.thinking_delay);
    let session = GameSession::new(orchestrator.remote_enabled());
    let driver = GameDriver::new(session, mover, orchestrator);

    if config.voice.is_some() {
        tracing::info!("Voice assistant configured");
    } else {
        tracing::info!("VAPI_API_KEY/VAPI_ASSISTANT_ID not set - voice disabled");
    }
    let hub = VoiceHub::spawn(FREEZE_AFTER);

    let addr = format!("{}:{}", config.host, config.port);
    let app = server::build_router(config, driver, hub);

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
