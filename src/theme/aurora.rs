//! Aurora theme: the purple-blue gradient palette of the web client

use ratatui::style::Color;

use super::Theme;

/// Aurora color palette
pub const AURORA: Theme = Theme {
    name: String::new(),

    // Background colors
    bg_primary: Color::Rgb(22, 22, 38),   // #161626
    bg_secondary: Color::Rgb(32, 31, 54), // #201f36
    bg_tertiary: Color::Rgb(52, 49, 84),  // #343154

    // Foreground colors
    fg_primary: Color::Rgb(226, 228, 240),   // #e2e4f0
    fg_secondary: Color::Rgb(248, 249, 252), // #f8f9fc
    fg_muted: Color::Rgb(120, 122, 150),     // #787a96

    // Accent colors
    accent_primary: Color::Rgb(102, 126, 234),   // #667eea
    accent_secondary: Color::Rgb(118, 75, 162),  // #764ba2
    accent_teacher: Color::Rgb(240, 147, 251),   // #f093fb

    // Semantic colors
    success: Color::Rgb(79, 172, 254), // #4facfe
    warning: Color::Rgb(254, 225, 64), // #fee140
    error: Color::Rgb(245, 87, 108),   // #f5576c
    info: Color::Rgb(0, 242, 254),     // #00f2fe

    // Chat bubbles
    chat_user: Color::Rgb(102, 126, 234),      // #667eea
    chat_assistant: Color::Rgb(226, 228, 240), // #e2e4f0

    // UI elements
    border: Color::Rgb(52, 49, 84),            // #343154
    border_focused: Color::Rgb(102, 126, 234), // #667eea
    selection: Color::Rgb(45, 42, 80),         // #2d2a50
    cursor: Color::Rgb(248, 249, 252),         // #f8f9fc
};

impl Theme {
    pub fn aurora() -> Self {
        Theme { name: "Aurora".to_string(), ..AURORA }
    }
}
