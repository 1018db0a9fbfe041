use std::env;

use chess_guide::config::non_empty_var;
use chess_guide::GuideConfig;
use serde::Serialize;

/// Voice assistant credentials. Both must be present for voice to be on.
#[derive(Clone, Debug)]
pub struct VoiceConfig {
    pub api_key: String,
    pub assistant_id: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub guide: GuideConfig,
    pub voice: Option<VoiceConfig>,
}

/// Which optional collaborators are configured.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Features {
    pub analysis: bool,
    pub voice: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let voice = match (non_empty_var("VAPI_API_KEY"), non_empty_var("VAPI_ASSISTANT_ID")) {
            (Some(api_key), Some(assistant_id)) => Some(VoiceConfig {
                api_key,
                assistant_id,
            }),
            _ => None,
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            guide: GuideConfig::from_env(),
            voice,
        }
    }

    pub fn features(&self) -> Features {
        Features {
            analysis: self.guide.analysis_enabled(),
            voice: self.voice.is_some(),
        }
    }
}
