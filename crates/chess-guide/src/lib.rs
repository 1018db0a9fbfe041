//! Opponent and guide: the capture-biased move picker that plays the
//! engine side, and the position analyzer behind guided mode.

pub mod analysis;
pub mod anthropic;
pub mod config;
pub mod error;
pub mod fallback;
pub mod opponent;
pub mod orchestrator;
pub mod prompt;

pub use analysis::{AnalysisResult, Priority, SideBetter, SuggestedMove};
pub use anthropic::{AnthropicClient, LlmAnalyst};
pub use config::{AnalysisConfig, GuideConfig};
pub use error::GuideError;
pub use opponent::{RandomMover, ThinkingDelay};
pub use orchestrator::{
    AnalysisOrchestrator, AnalysisOutcome, AnalysisPanel, AnalysisRequest, AnalysisSource,
    AnalysisTicket, Analyst, PanelStatus, PanelView,
};
