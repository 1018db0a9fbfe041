//! Guide configuration from environment variables

use std::env;
use std::time::Duration;

use tracing::info;

use crate::opponent::ThinkingDelay;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Remote analysis settings. Present only when an API key is configured.
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub api_key: String,

    /// Model name sent with every request
    pub model: String,

    /// API root, overridable for proxies and local stubs
    pub base_url: String,

    /// Response token limit
    pub max_tokens: u32,
}

#[derive(Clone, Debug)]
pub struct GuideConfig {
    /// `None` disables remote analysis; guided mode is then unavailable
    pub analysis: Option<AnalysisConfig>,

    /// Client-side deadline for one analysis call
    pub analysis_timeout: Duration,

    /// Simulated thinking time of the engine side
    pub thinking_delay: ThinkingDelay,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            analysis: None,
            analysis_timeout: Duration::from_secs(30),
            thinking_delay: ThinkingDelay::default(),
        }
    }
}

/// Read a variable, treating empty values as unset.
pub fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl GuideConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let analysis = non_empty_var("ANTHROPIC_API_KEY").map(|api_key| AnalysisConfig {
            api_key,
            model: env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            max_tokens: parsed_var("ANALYSIS_MAX_TOKENS", 2000),
        });

        if let Some(ref a) = analysis {
            info!(model = %a.model, "Remote analysis enabled");
        } else {
            info!("ANTHROPIC_API_KEY not set - guided analysis disabled");
        }

        let defaults = ThinkingDelay::default();
        let min_ms = parsed_var("ENGINE_MIN_DELAY_MS", defaults.min.as_millis() as u64);
        let max_ms = parsed_var("ENGINE_MAX_DELAY_MS", defaults.max.as_millis() as u64);

        Self {
            analysis,
            analysis_timeout: Duration::from_secs(parsed_var("ANALYSIS_TIMEOUT_SECS", 30)),
            thinking_delay: ThinkingDelay::new(
                Duration::from_millis(min_ms),
                Duration::from_millis(max_ms),
            ),
        }
    }

    pub fn analysis_enabled(&self) -> bool {
        self.analysis.is_some()
    }
}
