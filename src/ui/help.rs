//! Help overlay

use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::layout::centered_rect;
use crate::route::Screen;
use crate::theme::Theme;

const GLOBAL: &[(&str, &str)] = &[
    ("1-4", "Dashboard, Courses, AI Tutor, Profile"),
    (":", "Command line (:go /courses, :logout, :quit)"),
    ("r", "Refresh this page"),
    ("x", "Dismiss the error banner"),
    ("?", "This help"),
    ("^C", "Quit"),
];

/// Keys that only apply on `screen`
fn screen_keys(screen: &Screen) -> &'static [(&'static str, &'static str)] {
    match screen {
        Screen::Courses => &[
            ("j/k", "Move selection"),
            ("Enter", "Open course"),
            ("/", "Search titles and descriptions"),
            ("f", "Cycle difficulty filter"),
            ("c", "Clear filters"),
            ("e", "Enroll in selected course"),
        ],
        Screen::CourseDetail(_) => &[
            ("j/k", "Move between lessons"),
            ("e", "Enroll"),
            ("a", "Generate an AI lesson for the selection"),
            ("Esc", "Back to courses"),
        ],
        Screen::AiTutor => &[
            ("i", "Type a message"),
            ("Enter", "Send"),
            ("Esc", "Cancel a pending reply / stop typing"),
            ("n", "New chat"),
            ("Tab", "Next session"),
            ("j/k", "Scroll"),
        ],
        _ => &[],
    }
}

fn key_line(key: &str, desc: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<8}", key), Style::default().fg(theme.accent_primary)),
        Span::styled(desc.to_string(), Style::default().fg(theme.fg_primary)),
    ])
}

pub fn draw(frame: &mut Frame, screen: &Screen, theme: &Theme) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let heading = Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::from(Span::styled("Everywhere", heading))];
    lines.extend(GLOBAL.iter().map(|(k, desc)| key_line(k, desc, theme)));
    let specific = screen_keys(screen);
    if !specific.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(screen.title(), heading)));
        lines.extend(specific.iter().map(|(k, desc)| key_line(k, desc, theme)));
    }

    let block = Block::default()
        .title(" Help ")
        .title_bottom(Line::from(" any key to close ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_interactive_screens_have_extra_keys() {
        assert!(!screen_keys(&Screen::Courses).is_empty());
        assert!(!screen_keys(&Screen::AiTutor).is_empty());
        assert!(screen_keys(&Screen::Profile).is_empty());
    }
}
