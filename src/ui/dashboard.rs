//! Student and teacher dashboards

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use super::layout::{draw_placeholder, panel};
use crate::api::models::{StudentDashboard, TeacherDashboard};
use crate::app::state::AppState;
use crate::theme::Theme;

/// `95` minutes as `1h 35m`
fn format_minutes(minutes: u64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// A boxed headline number
fn draw_stat(frame: &mut Frame, area: Rect, label: &str, value: String, theme: &Theme) {
    let text = vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label.to_string(), Style::default().fg(theme.fg_muted))),
    ];
    let block = panel("", false, theme);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center).block(block), area);
}

fn draw_stats(frame: &mut Frame, area: Rect, stats: Vec<(&str, String)>, theme: &Theme) {
    let constraints = vec![Constraint::Ratio(1, stats.len() as u32); stats.len()];
    let cells = Layout::horizontal(constraints).split(area);
    for ((label, value), cell) in stats.into_iter().zip(cells.iter()) {
        draw_stat(frame, *cell, label, value, theme);
    }
}

/// Placeholder while the dashboard has not arrived
fn draw_missing(frame: &mut Frame, area: Rect, loading: bool, theme: &Theme) {
    let message = if loading { "Loading dashboard..." } else { "No dashboard data yet. Press r to refresh" };
    draw_placeholder(frame, area, message, theme);
}

/// Draw the student dashboard
pub fn draw_student(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    match state.dashboard.student() {
        Some(data) => draw_student_data(frame, area, data, state, theme),
        None => draw_missing(frame, area, state.dashboard.loading(), theme),
    }
}

fn draw_student_data(
    frame: &mut Frame,
    area: Rect,
    data: &StudentDashboard,
    state: &AppState,
    theme: &Theme,
) {
    let [greeting, stats, body] =
        Layout::vertical([Constraint::Length(2), Constraint::Length(4), Constraint::Fill(1)])
            .areas(area);

    let name = if data.user_info.name.is_empty() {
        state.auth.user().map(|u| u.display_name().to_string()).unwrap_or_default()
    } else {
        data.user_info.name.clone()
    };
    let mut hello = vec![Span::styled(
        format!(" Welcome back, {}!", name),
        Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
    )];
    if let Some(style) = &data.user_info.learning_style {
        hello.push(Span::styled(
            format!("  {} learner", style),
            Style::default().fg(theme.fg_muted),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(hello)), greeting);

    let a = &data.analytics;
    draw_stats(
        frame,
        stats,
        vec![
            ("Study time", format_minutes(a.total_study_time)),
            ("Day streak", a.current_streak.to_string()),
            ("Enrolled", a.courses_enrolled.to_string()),
            ("Completed", a.courses_completed.to_string()),
            ("Avg. quiz score", format!("{:.0}%", a.average_quiz_score)),
        ],
        theme,
    );

    let [enrollments, quizzes] =
        Layout::horizontal([Constraint::Length(28), Constraint::Fill(1)]).areas(body);

    let e = &data.enrollments;
    let counts = vec![
        Line::from(format!(" Total      {}", e.total)),
        Line::from(Span::styled(format!(" Active     {}", e.active), Style::default().fg(theme.info))),
        Line::from(Span::styled(
            format!(" Completed  {}", e.completed),
            Style::default().fg(theme.success),
        )),
    ];
    frame.render_widget(
        Paragraph::new(counts)
            .style(Style::default().fg(theme.fg_primary))
            .block(panel(" Enrollments ", false, theme)),
        enrollments,
    );

    let block = panel(" Recent quizzes ", false, theme);
    if data.recent_quizzes.is_empty() {
        let empty = Paragraph::new(" No quizzes taken yet")
            .style(Style::default().fg(theme.fg_muted))
            .block(block);
        frame.render_widget(empty, quizzes);
        return;
    }
    let rows = data.recent_quizzes.iter().map(|q| {
        let (mark, color) = if q.passed { ("passed", theme.success) } else { ("failed", theme.error) };
        Row::new(vec![
            Cell::from(q.quiz_title.clone()),
            Cell::from(format!("{:.0}%", q.score)),
            Cell::from(Span::styled(mark, Style::default().fg(color))),
            Cell::from(q.completed_at.as_deref().map(short_date).unwrap_or("")),
        ])
    });
    let table = Table::new(
        rows,
        [Constraint::Fill(1), Constraint::Length(6), Constraint::Length(7), Constraint::Length(10)],
    )
    .header(Row::new(vec!["Quiz", "Score", "", "Date"]).style(Style::default().fg(theme.fg_muted)))
    .style(Style::default().fg(theme.fg_primary))
    .block(block);
    frame.render_widget(table, quizzes);
}

/// Date part of an ISO timestamp
fn short_date(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

/// Draw the teacher dashboard
pub fn draw_teacher(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    match state.dashboard.teacher() {
        Some(data) => draw_teacher_data(frame, area, data, theme),
        None => draw_missing(frame, area, state.dashboard.loading(), theme),
    }
}

fn draw_teacher_data(frame: &mut Frame, area: Rect, data: &TeacherDashboard, theme: &Theme) {
    let [stats, body] =
        Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(area);

    let s = &data.summary;
    draw_stats(
        frame,
        stats,
        vec![
            ("Courses", s.total_courses.to_string()),
            ("Students", s.total_students.to_string()),
            ("Enrollments", s.total_enrollments.to_string()),
        ],
        theme,
    );

    let block = panel(
        Line::from(Span::styled(" Your courses ", Style::default().fg(theme.accent_teacher))),
        false,
        theme,
    );
    if data.courses.is_empty() {
        let empty = Paragraph::new(" You have not published any courses yet")
            .style(Style::default().fg(theme.fg_muted))
            .block(block);
        frame.render_widget(empty, body);
        return;
    }

    let rows = data.courses.iter().map(|c| {
        Row::new(vec![
            c.title.clone(),
            c.total_students.to_string(),
            c.active_students.to_string(),
            format!("{:.0}%", c.average_progress),
            format!("{:.1}", c.average_rating),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(7),
        ],
    )
    .header(
        Row::new(vec!["Course", "Students", "Active", "Progress", "Rating"])
            .style(Style::default().fg(theme.fg_muted)),
    )
    .style(Style::default().fg(theme.fg_primary))
    .block(block);
    frame.render_widget(table, body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::effects::Outcome;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &AppState, teacher: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| {
                if teacher {
                    draw_teacher(frame, frame.area(), state, &theme)
                } else {
                    draw_student(frame, frame.area(), state, &theme)
                }
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn minutes_format() {
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(120), "2h");
        assert_eq!(format_minutes(95), "1h 35m");
    }

    #[test]
    fn loading_placeholder() {
        let mut state = AppState::default();
        state.dashboard.request_pending();
        assert!(render(&state, false).contains("Loading dashboard..."));
    }

    #[test]
    fn student_numbers_are_shown() {
        let mut state = AppState::default();
        let data: StudentDashboard = serde_json::from_value(serde_json::json!({
            "user_info": {"name": "Sam"},
            "analytics": {"total_study_time": 95, "current_streak": 4, "average_quiz_score": "87.5"},
            "recent_quizzes": [{"quiz_title": "Ownership", "score": 90, "passed": true}]
        }))
        .unwrap();
        state.apply(Outcome::StudentDashboard(Ok(data)));

        let screen = render(&state, false);
        assert!(screen.contains("Welcome back, Sam!"));
        assert!(screen.contains("1h 35m"));
        assert!(screen.contains("Ownership"));
    }

    #[test]
    fn teacher_courses_table() {
        let mut state = AppState::default();
        let data: TeacherDashboard = serde_json::from_value(serde_json::json!({
            "summary": {"total_courses": 2, "total_students": 31},
            "courses": [{"course_id": 1, "title": "Rust Basics", "total_students": 20, "average_rating": 4.5}]
        }))
        .unwrap();
        state.apply(Outcome::TeacherDashboard(Ok(data)));

        let screen = render(&state, true);
        assert!(screen.contains("Rust Basics"));
        assert!(screen.contains("4.5"));
    }
}
