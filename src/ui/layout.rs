//! Layout utilities and common components

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::api::Role;
use crate::app::state::AppState;
use crate::route::Screen;
use crate::theme::Theme;

/// Pages reachable from the navigation bar, with their number keys
const NAV_ITEMS: [(&str, &str); 4] =
    [("1", "Dashboard"), ("2", "Courses"), ("3", "AI Tutor"), ("4", "Profile")];

/// Index of the nav item for `screen`
fn nav_index(screen: &Screen) -> Option<usize> {
    match screen {
        Screen::StudentDashboard | Screen::TeacherDashboard => Some(0),
        Screen::Courses | Screen::CourseDetail(_) => Some(1),
        Screen::AiTutor => Some(2),
        Screen::Profile => Some(3),
        _ => None,
    }
}

/// Top bar of signed-in screens: page tabs and the current user
pub fn draw_nav_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let active = nav_index(&state.screen);
    let mut spans = vec![Span::styled(
        " ◉ AI Tutor ",
        Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
    )];

    for (i, (key, label)) in NAV_ITEMS.iter().enumerate() {
        let style = if active == Some(i) {
            Style::default().fg(theme.bg_primary).bg(theme.accent_primary)
        } else {
            Style::default().fg(theme.fg_secondary)
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} {} ", key, label), style));
    }

    let bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.bg_secondary)),
    );
    frame.render_widget(bar, area);

    if let Some(user) = state.auth.user() {
        let badge_color =
            if user.role == Role::Teacher { theme.accent_teacher } else { theme.info };
        let who = Line::from(vec![
            Span::styled(user.display_name().to_string(), Style::default().fg(theme.fg_primary)),
            Span::raw(" "),
            Span::styled(format!("[{}] ", user.role), Style::default().fg(badge_color)),
        ]);
        let right = Rect { height: 1, ..area };
        frame.render_widget(Paragraph::new(who).alignment(Alignment::Right), right);
    }
}

/// One-line error banner
pub fn draw_banner(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(" ✗ ", Style::default().fg(theme.bg_primary).bg(theme.error)),
        Span::styled(format!(" {}", message), Style::default().fg(theme.error)),
        Span::styled("  (x to dismiss)", Style::default().fg(theme.fg_muted)),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg_tertiary)), area);
}

/// Muted centered text filling `area`
pub fn draw_placeholder(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let style = Style::default().fg(theme.fg_muted).bg(theme.bg_primary);
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new(message).style(style).alignment(Alignment::Center), middle);
}

/// Bordered block used by panels, highlighted when focused
pub fn panel<'a>(title: impl Into<Line<'a>>, focused: bool, theme: &Theme) -> Block<'a> {
    let border = if focused { theme.border_focused } else { theme.border };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.bg_primary))
}

/// Build a line with a visible block cursor at character `cursor_pos`
pub fn line_with_cursor(
    text: &str,
    cursor_pos: usize,
    base_style: Style,
    theme: &Theme,
) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();

    if cursor_pos > 0 {
        let before: String = chars.iter().take(cursor_pos).collect();
        spans.push(Span::styled(before, base_style));
    }

    // Space when the cursor sits past the end
    let cursor_char = chars.get(cursor_pos).copied().unwrap_or(' ');
    let cursor_style =
        Style::default().fg(theme.bg_primary).bg(theme.cursor).add_modifier(Modifier::BOLD);
    spans.push(Span::styled(cursor_char.to_string(), cursor_style));

    if cursor_pos + 1 < chars.len() {
        let after: String = chars.iter().skip(cursor_pos + 1).collect();
        spans.push(Span::styled(after, base_style));
    }

    Line::from(spans)
}

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Centered rectangle of a fixed size, shrunk to fit `r`
pub fn fixed_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// Draw a scroll thumb on the right edge of `area`
pub fn draw_scroll_indicator(
    frame: &mut Frame,
    area: Rect,
    scroll: usize,
    max_scroll: usize,
    theme: &Theme,
) {
    if area.height < 3 || max_scroll == 0 {
        return;
    }

    let track_height = area.height.saturating_sub(2) as usize;
    let thumb_pos = (scroll.min(max_scroll) * track_height) / max_scroll;
    let thumb_y = area.y + 1 + thumb_pos as u16;
    let thumb_x = area.x + area.width - 1;

    if thumb_y < area.y + area.height - 1 {
        let thumb = Paragraph::new("█").style(Style::default().fg(theme.fg_muted));
        frame.render_widget(thumb, Rect::new(thumb_x, thumb_y, 1, 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cursor_at_start() {
        let theme = Theme::default();
        let line = line_with_cursor(":test", 0, Style::default(), &theme);
        assert_eq!(line.spans.len(), 2);
    }

    #[test]
    fn cursor_past_end_is_a_space() {
        let theme = Theme::default();
        let line = line_with_cursor("ab", 2, Style::default(), &theme);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[1].content, " ");
    }

    #[test]
    fn cursor_in_middle() {
        let theme = Theme::default();
        let line = line_with_cursor(":test", 2, Style::default(), &theme);
        assert_eq!(line.spans.len(), 3);
    }

    #[test]
    fn fixed_rect_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(fixed_rect(50, 10, area), Rect::new(25, 15, 50, 10));
        assert_eq!(fixed_rect(200, 10, area).width, 100);
    }

    #[test]
    fn detail_page_highlights_courses_tab() {
        assert_eq!(nav_index(&Screen::CourseDetail("c1".into())), Some(1));
        assert_eq!(nav_index(&Screen::TeacherDashboard), Some(0));
        assert_eq!(nav_index(&Screen::Login), None);
    }
}
