use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    pub fn opposite(self) -> Self {
        match self {
            PlayerColor::White => PlayerColor::Black,
            PlayerColor::Black => PlayerColor::White,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerColor::White => "white",
            PlayerColor::Black => "black",
        }
    }

    /// Capitalized name for display ("White" / "Black").
    pub fn name(self) -> &'static str {
        match self {
            PlayerColor::White => "White",
            PlayerColor::Black => "Black",
        }
    }
}

impl From<shakmaty::Color> for PlayerColor {
    fn from(color: shakmaty::Color) -> Self {
        match color {
            shakmaty::Color::White => PlayerColor::White,
            shakmaty::Color::Black => PlayerColor::Black,
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    #[default]
    HumanVsHuman,
    HumanVsEngineBasic,
    HumanVsEngineGuided,
}

impl GameMode {
    pub fn is_vs_engine(self) -> bool {
        matches!(self, GameMode::HumanVsEngineBasic | GameMode::HumanVsEngineGuided)
    }

    pub fn title(self) -> &'static str {
        match self {
            GameMode::HumanVsHuman => "Human vs Human",
            GameMode::HumanVsEngineBasic => "Human vs Engine (Basic)",
            GameMode::HumanVsEngineGuided => "Human vs Engine (With Guide)",
        }
    }
}

/// Settings for one game, chosen through the menu flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub mode: GameMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_color: Option<PlayerColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_color: Option<PlayerColor>,
    pub guided: bool,
}

impl GameSettings {
    /// Settings right after a mode is picked, before any color is chosen.
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            human_color: None,
            engine_color: None,
            guided: mode == GameMode::HumanVsEngineGuided,
        }
    }

    /// Assign the human's color; the engine always gets the other one.
    pub fn with_human_color(self, color: PlayerColor) -> Self {
        Self {
            human_color: Some(color),
            engine_color: Some(color.opposite()),
            ..self
        }
    }

    pub fn is_vs_engine(&self) -> bool {
        self.mode.is_vs_engine()
    }

    /// Label shown next to a move in the log.
    pub fn player_label(&self, color: PlayerColor) -> &'static str {
        if !self.is_vs_engine() {
            return match color {
                PlayerColor::White => "White Player",
                PlayerColor::Black => "Black Player",
            };
        }
        if self.human_color == Some(color) {
            "You"
        } else {
            "CPU"
        }
    }

    /// Board orientation: the human's side in engine modes, white otherwise.
    pub fn orientation(&self) -> PlayerColor {
        if self.is_vs_engine() {
            self.human_color.unwrap_or(PlayerColor::White)
        } else {
            PlayerColor::White
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_color_is_complement() {
        let settings =
            GameSettings::for_mode(GameMode::HumanVsEngineBasic).with_human_color(PlayerColor::Black);
        assert_eq!(settings.human_color, Some(PlayerColor::Black));
        assert_eq!(settings.engine_color, Some(PlayerColor::White));
        assert!(!settings.guided);
    }

    #[test]
    fn test_guided_flag_follows_mode() {
        assert!(GameSettings::for_mode(GameMode::HumanVsEngineGuided).guided);
        assert!(!GameSettings::for_mode(GameMode::HumanVsHuman).guided);
    }

    #[test]
    fn test_player_labels() {
        let hvh = GameSettings::default();
        assert_eq!(hvh.player_label(PlayerColor::White), "White Player");
        assert_eq!(hvh.player_label(PlayerColor::Black), "Black Player");

        let vs = GameSettings::for_mode(GameMode::HumanVsEngineBasic).with_human_color(PlayerColor::White);
        assert_eq!(vs.player_label(PlayerColor::White), "You");
        assert_eq!(vs.player_label(PlayerColor::Black), "CPU");
    }

    #[test]
    fn test_mode_serializes_kebab_case() {
        let json = serde_json::to_string(&GameMode::HumanVsEngineGuided).unwrap();
        assert_eq!(json, "\"human-vs-engine-guided\"");
    }
}
