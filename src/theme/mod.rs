//! Colour themes

mod aurora;

pub use aurora::AURORA;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// A color theme for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,
    /// Teacher dashboard and role badge
    pub accent_teacher: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Chat bubbles
    pub chat_user: Color,
    pub chat_assistant: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
    pub cursor: Color,
}

impl Theme {
    /// Look up a built-in theme by name, falling back to the default
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "aurora" => Self::aurora(),
            other => {
                tracing::warn!("Unknown theme {:?}, using Aurora", other);
                Self::aurora()
            }
        }
    }

    /// Colour used for a strength score of 0-100
    pub fn strength_color(&self, score: u8) -> Color {
        match score {
            0..=49 => self.error,
            50..=74 => self.warning,
            _ => self.success,
        }
    }

    /// Colour for a course difficulty badge
    pub fn difficulty_color(&self, difficulty: &str) -> Color {
        match difficulty {
            "beginner" => self.success,
            "intermediate" => self.warning,
            "advanced" => self.error,
            _ => self.fg_muted,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::aurora()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_aurora() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Aurora");
    }

    #[test]
    fn unknown_name_falls_back() {
        assert_eq!(Theme::by_name("Solarized").name, "Aurora");
    }

    #[test]
    fn strength_colours_escalate() {
        let theme = Theme::default();
        assert_eq!(theme.strength_color(0), theme.error);
        assert_eq!(theme.strength_color(50), theme.warning);
        assert_eq!(theme.strength_color(75), theme.success);
        assert_eq!(theme.strength_color(100), theme.success);
    }
}
