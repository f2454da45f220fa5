//! Command line UI component

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::layout::line_with_cursor;
use crate::app::state::{CommandLineState, CommandMode};
use crate::theme::Theme;

/// Draw the command line at the bottom of the screen
pub fn draw(frame: &mut Frame, area: Rect, state: &CommandLineState, hint: &str, theme: &Theme) {
    let style = match state.mode {
        CommandMode::Normal if state.is_error => Style::default().fg(theme.error),
        CommandMode::Normal => Style::default().fg(theme.fg_muted),
        CommandMode::Command => Style::default().fg(theme.accent_primary),
        CommandMode::Search => Style::default().fg(theme.info),
    };

    let line = if state.is_input_mode() {
        // +1 for the prefix
        line_with_cursor(&state.display_text(), state.input.cursor() + 1, style, theme)
    } else if state.message.is_some() {
        Line::from(Span::styled(state.display_text(), style))
    } else {
        Line::from(Span::styled(hint.to_string(), style))
    };

    frame.render_widget(Paragraph::new(line), area);
}
