//! Menu → color selection → game flow.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::CoreError;
use crate::settings::{GameMode, GameSettings, PlayerColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    #[default]
    Menu,
    ColorSelection,
    Game,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Screen::Menu => "menu",
            Screen::ColorSelection => "color-selection",
            Screen::Game => "game",
        })
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScreenFlow {
    screen: Screen,
    settings: GameSettings,
}

impl ScreenFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Pick a mode from the menu. Human vs human starts the game directly;
    /// engine modes go through color selection.
    pub fn select_mode(&mut self, mode: GameMode) -> Result<Screen, CoreError> {
        self.expect(Screen::Menu, "select a game mode")?;
        self.settings = GameSettings::for_mode(mode);
        Ok(self.goto(if mode.is_vs_engine() {
            Screen::ColorSelection
        } else {
            Screen::Game
        }))
    }

    pub fn select_color(&mut self, color: PlayerColor) -> Result<Screen, CoreError> {
        self.expect(Screen::ColorSelection, "select a color")?;
        self.settings = self.settings.with_human_color(color);
        Ok(self.goto(Screen::Game))
    }

    /// Return to the menu from anywhere; settings go back to defaults.
    pub fn back_to_menu(&mut self) -> Result<Screen, CoreError> {
        self.settings = GameSettings::default();
        Ok(self.goto(Screen::Menu))
    }

    /// Leave a running engine game to pick a different color.
    pub fn back_to_color_selection(&mut self) -> Result<Screen, CoreError> {
        self.expect(Screen::Game, "return to color selection")?;
        if !self.settings.is_vs_engine() {
            return Err(CoreError::InvalidTransition {
                from: self.screen,
                action: "return to color selection in a human vs human game",
            });
        }
        Ok(self.goto(Screen::ColorSelection))
    }

    fn goto(&mut self, screen: Screen) -> Screen {
        debug!(from = %self.screen, to = %screen, "Screen transition");
        self.screen = screen;
        screen
    }

    fn expect(&self, screen: Screen, action: &'static str) -> Result<(), CoreError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.screen,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_vs_human_skips_color_selection() {
        let mut flow = ScreenFlow::new();
        assert_eq!(flow.select_mode(GameMode::HumanVsHuman).unwrap(), Screen::Game);
        assert_eq!(flow.settings().human_color, None);
    }

    #[test]
    fn test_engine_mode_goes_through_color_selection() {
        let mut flow = ScreenFlow::new();
        assert_eq!(
            flow.select_mode(GameMode::HumanVsEngineGuided).unwrap(),
            Screen::ColorSelection
        );
        assert_eq!(flow.select_color(PlayerColor::Black).unwrap(), Screen::Game);
        assert_eq!(flow.settings().engine_color, Some(PlayerColor::White));
        assert!(flow.settings().guided);
    }

    #[test]
    fn test_back_edges() {
        let mut flow = ScreenFlow::new();
        flow.select_mode(GameMode::HumanVsEngineBasic).unwrap();
        flow.select_color(PlayerColor::White).unwrap();
        assert_eq!(flow.back_to_color_selection().unwrap(), Screen::ColorSelection);
        assert_eq!(flow.back_to_menu().unwrap(), Screen::Menu);
        assert_eq!(*flow.settings(), GameSettings::default());
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut flow = ScreenFlow::new();
        assert!(flow.select_color(PlayerColor::White).is_err());
        assert!(flow.back_to_color_selection().is_err());

        flow.select_mode(GameMode::HumanVsHuman).unwrap();
        assert!(matches!(
            flow.back_to_color_selection(),
            Err(CoreError::InvalidTransition { from: Screen::Game, .. })
        ));
        assert!(flow.select_mode(GameMode::HumanVsEngineBasic).is_err());
    }
}
