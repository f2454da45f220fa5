//! Profile page

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::layout::{draw_placeholder, fixed_rect, panel};
use crate::api::{Role, User};
use crate::app::state::AppState;
use crate::theme::Theme;

/// Label/value rows shown for `user`; empty optional fields are skipped
fn profile_rows(user: &User) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Name", user.display_name().to_string()),
        ("Email", user.email.clone()),
        ("Role", user.role.to_string()),
    ];
    let optional: [(&'static str, Option<String>); 5] = [
        ("Learning style", user.learning_style.clone()),
        ("Grade level", user.grade_level.clone()),
        ("Specialization", user.specialization.clone()),
        ("Experience", user.years_of_experience.map(|y| format!("{} years", y))),
        ("Member since", user.created_at.as_deref().map(|d| d.get(..10).unwrap_or(d).to_string())),
    ];
    rows.extend(optional.into_iter().filter_map(|(label, value)| {
        value.filter(|v| !v.is_empty()).map(|v| (label, v))
    }));
    rows
}

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let Some(user) = state.auth.user() else {
        draw_placeholder(frame, area, "Not signed in", theme);
        return;
    };

    let accent = if user.role == Role::Teacher { theme.accent_teacher } else { theme.accent_primary };
    let mut lines = vec![Line::from("")];
    for (label, value) in profile_rows(user) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<16}", label), Style::default().fg(theme.fg_muted)),
            Span::styled(value, Style::default().fg(theme.fg_primary)),
        ]));
    }
    if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  About", Style::default().fg(theme.fg_muted))));
        lines.push(Line::from(format!("  {}", bio)));
    }
    lines.push(Line::from(""));
    let status = if state.auth.loading() { "  Refreshing..." } else { "  [r] refresh  [:logout] sign out" };
    lines.push(Line::from(Span::styled(status, Style::default().fg(theme.fg_muted))));

    let title = Line::from(Span::styled(
        " Profile ",
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    ));
    let card = fixed_rect(64, lines.len() as u16 + 2, area);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(panel(title, false, theme)),
        card,
    );
}
