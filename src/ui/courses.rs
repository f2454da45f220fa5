//! Course catalog with client-side filtering

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use super::layout::{draw_placeholder, panel};
use crate::api::Course;
use crate::app::state::AppState;
use crate::theme::Theme;

/// Draw the catalog: filter bar, list and a preview of the selection
pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [filter_bar, body] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
    draw_filter_bar(frame, filter_bar, state, theme);

    let visible = state.visible_courses();
    if visible.is_empty() {
        let message = if state.courses.loading() {
            "Loading courses..."
        } else if state.courses.courses().is_empty() {
            "No courses available"
        } else {
            "No courses match the filter. Press c to clear it"
        };
        draw_placeholder(frame, body, message, theme);
        return;
    }

    let [list_area, preview_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body);

    let items: Vec<ListItem> = visible
        .iter()
        .map(|course| {
            let enrolled = state.courses.is_enrolled(&course.id);
            let mut spans = vec![
                Span::styled(
                    if enrolled { "✓ " } else { "  " },
                    Style::default().fg(theme.success),
                ),
                Span::styled(course.title.clone(), Style::default().fg(theme.fg_primary)),
            ];
            if !course.difficulty.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", course.difficulty),
                    Style::default().fg(theme.difficulty_color(&course.difficulty)),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Courses ({}/{}) ", visible.len(), state.courses.courses().len());
    let list = List::new(items)
        .block(panel(title, true, theme))
        .highlight_style(Style::default().bg(theme.selection).add_modifier(Modifier::BOLD))
        .highlight_symbol("▸ ");
    let mut list_state = ListState::default().with_selected(Some(state.browser.selected));
    frame.render_stateful_widget(list, list_area, &mut list_state);

    if let Some(course) = visible.get(state.browser.selected) {
        draw_preview(frame, preview_area, course, state.courses.is_enrolled(&course.id), theme);
    }
}

fn draw_filter_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let filter = &state.browser.filter;
    let label = Style::default().fg(theme.fg_muted);
    let value = Style::default().fg(theme.accent_secondary);
    let search = if filter.search.is_empty() { "-".to_string() } else { filter.search.clone() };
    let mut spans = vec![
        Span::styled(" search ", label),
        Span::styled(search, value),
        Span::styled("   level ", label),
        Span::styled(filter.difficulty.clone().unwrap_or_else(|| "all".into()), value),
    ];
    if let Some(category) = &filter.category {
        spans.push(Span::styled("   category ", label));
        spans.push(Span::styled(category.clone(), value));
    }
    spans.push(Span::styled(
        "   [/] search  [f] level  [c] clear  [e] enroll  [Enter] open",
        Style::default().fg(theme.fg_muted),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_preview(frame: &mut Frame, area: Rect, course: &Course, enrolled: bool, theme: &Theme) {
    let muted = Style::default().fg(theme.fg_muted);
    let mut lines = vec![
        Line::from(Span::styled(
            course.title.clone(),
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if let Some(instructor) = &course.instructor {
        lines.push(Line::from(vec![
            Span::styled("Instructor  ", muted),
            Span::raw(instructor.full_name.clone()),
        ]));
    }
    if !course.category.is_empty() {
        lines.push(Line::from(vec![Span::styled("Category    ", muted), Span::raw(course.category.clone())]));
    }
    lines.push(Line::from(vec![
        Span::styled("Length      ", muted),
        Span::raw(format!("{} lessons, ~{}h", course.total_lessons, course.estimated_duration)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Students    ", muted),
        Span::raw(course.total_students.to_string()),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(course.description.clone()));
    lines.push(Line::from(""));
    lines.push(if enrolled {
        Line::from(Span::styled("You are enrolled", Style::default().fg(theme.success)))
    } else {
        Line::from(Span::styled("Press e to enroll", Style::default().fg(theme.accent_primary)))
    });

    let preview = Paragraph::new(lines)
        .style(Style::default().fg(theme.fg_secondary))
        .wrap(Wrap { trim: true })
        .block(panel(" Details ", false, theme));
    frame.render_widget(preview, area);
}
