//! Full-screen fallback after a caught panic

use ratatui::{
    Frame,
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::layout::fixed_rect;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, message: &str, theme: &Theme) {
    let area = fixed_rect(64, 11, frame.area());
    let key = Style::default().fg(theme.accent_primary);
    let lines = vec![
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(theme.fg_secondary))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[r]", key),
            Span::raw(" Try again    "),
            Span::styled("[h]", key),
            Span::raw(" Go home    "),
            Span::styled("[q]", key),
            Span::raw(" Quit"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error))
        .style(Style::default().bg(theme.bg_secondary).fg(theme.fg_primary));
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(para, area);
}
