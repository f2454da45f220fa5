//! Single course with its lessons and generated material

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
};
use serde_json::Value;

use super::layout::{draw_placeholder, panel};
use crate::api::Course;
use crate::app::state::AppState;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, course_id: &str, state: &AppState, theme: &Theme) {
    // The store may still hold the previously opened course
    let course = state.courses.current_course().filter(|c| c.id == course_id);
    let Some(course) = course else {
        let message = if state.courses.loading() { "Loading course..." } else { "Course not found" };
        draw_placeholder(frame, area, message, theme);
        return;
    };

    let [header, body] = Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).areas(area);
    draw_header(frame, header, course, state.courses.is_enrolled(&course.id), theme);

    let [lessons, side] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);
    draw_lessons(frame, lessons, course, state.detail.selected_lesson, theme);
    draw_generated(frame, side, state, theme);
}

fn draw_header(frame: &mut Frame, area: Rect, course: &Course, enrolled: bool, theme: &Theme) {
    let mut title = vec![Span::styled(
        course.title.clone(),
        Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
    )];
    if !course.difficulty.is_empty() {
        title.push(Span::styled(
            format!("  {}", course.difficulty),
            Style::default().fg(theme.difficulty_color(&course.difficulty)),
        ));
    }
    title.push(if enrolled {
        Span::styled("  ✓ enrolled", Style::default().fg(theme.success))
    } else {
        Span::styled("  [e] enroll", Style::default().fg(theme.accent_primary))
    });

    let instructor = course
        .instructor
        .as_ref()
        .map(|i| format!("by {}", i.full_name))
        .unwrap_or_default();
    let lines = vec![
        Line::from(title),
        Line::from(Span::styled(instructor, Style::default().fg(theme.fg_muted))),
        Line::from(Span::styled(course.description.clone(), Style::default().fg(theme.fg_secondary))),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn draw_lessons(frame: &mut Frame, area: Rect, course: &Course, selected: usize, theme: &Theme) {
    let block = panel(format!(" Lessons ({}) ", course.lessons.len()), true, theme);
    if course.lessons.is_empty() {
        let empty = Paragraph::new(" No lessons published yet")
            .style(Style::default().fg(theme.fg_muted))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = course
        .lessons
        .iter()
        .enumerate()
        .map(|(i, lesson)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>2}. ", i + 1), Style::default().fg(theme.fg_muted)),
                Span::styled(lesson.title.clone(), Style::default().fg(theme.fg_primary)),
                Span::styled(format!("  {}m", lesson.duration), Style::default().fg(theme.fg_muted)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.selection).add_modifier(Modifier::BOLD))
        .highlight_symbol("▸ ");
    let mut list_state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_generated(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = panel(" AI lesson  [a] generate ", false, theme);
    let text = match state.tutor.generated_lesson() {
        Some(lesson) => lesson_text(&lesson.generated_content),
        None if state.tutor.loading() => "Generating...".to_string(),
        None => "Select a lesson and press a to generate study material".to_string(),
    };
    let para = Paragraph::new(text)
        .style(Style::default().fg(theme.fg_secondary))
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(para, area);
}

/// Readable text for generated content of any JSON shape
fn lesson_text(content: &Value) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            items.iter().map(|item| format!("• {}", lesson_text(item))).collect::<Vec<_>>().join("\n")
        }
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| format!("{}\n{}", key.replace('_', " ").to_uppercase(), lesson_text(value)))
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn string_content_is_verbatim() {
        assert_eq!(lesson_text(&json!("Ownership means...")), "Ownership means...");
    }

    #[test]
    fn object_sections_become_headings() {
        let text = lesson_text(&json!({
            "key_points": ["moves", "borrows"],
            "summary": "Values have one owner"
        }));
        assert_eq!(text, "KEY POINTS\n• moves\n• borrows\n\nSUMMARY\nValues have one owner");
    }

    #[test]
    fn numbers_render_plainly() {
        assert_eq!(lesson_text(&json!(3)), "3");
        assert_eq!(lesson_text(&Value::Null), "");
    }
}
