//! UI rendering components

pub mod command_line;
pub mod course_detail;
pub mod courses;
pub mod dashboard;
pub mod error_screen;
pub mod forms;
pub mod help;
pub mod landing;
pub mod layout;
pub mod profile;
pub mod tutor;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    widgets::Block,
};

use crate::app::state::AppState;
use crate::route::Screen;
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &AppState, theme: &Theme) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), frame.area());

    if let Some(message) = &state.crash {
        error_screen::draw(frame, message, theme);
        return;
    }

    match &state.screen {
        Screen::Landing => landing::draw(frame, &state.landing_animation, theme),
        Screen::Login | Screen::Register => draw_public(frame, state, theme),
        _ => draw_signed_in(frame, state, theme),
    }

    if state.show_help {
        help::draw(frame, &state.screen, theme);
    }
}

fn draw_public(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let [body, command] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

    if state.screen == Screen::Register {
        forms::draw_register(frame, body, state, theme);
    } else {
        forms::draw_login(frame, body, state, theme);
    }
    command_line::draw(frame, command, &state.command_line, "", theme);
}

fn draw_signed_in(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let banner = state.screen_error();
    let [nav, banner_area, body, command] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(if banner.is_some() { 1 } else { 0 }),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    layout::draw_nav_bar(frame, nav, state, theme);
    if let Some(message) = banner {
        layout::draw_banner(frame, banner_area, message, theme);
    }
    draw_body(frame, pad(body), state, theme);
    command_line::draw(
        frame,
        command,
        &state.command_line,
        "Press : for commands, ? for help",
        theme,
    );
}

fn draw_body(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    match &state.screen {
        Screen::StudentDashboard => dashboard::draw_student(frame, area, state, theme),
        Screen::TeacherDashboard => dashboard::draw_teacher(frame, area, state, theme),
        Screen::Courses => courses::draw(frame, area, state, theme),
        Screen::CourseDetail(id) => course_detail::draw(frame, area, id, state, theme),
        Screen::AiTutor => tutor::draw(frame, area, state, theme),
        Screen::Quiz(id) => layout::draw_placeholder(
            frame,
            area,
            &format!("Quiz {} is coming soon. Press Esc to go back", id),
            theme,
        ),
        Screen::Profile => profile::draw(frame, area, state, theme),
        Screen::Landing | Screen::Login | Screen::Register => {}
    }
}

/// One column of breathing room on each side
fn pad(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Role, Tokens, User};
    use crate::route::Route;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, state, &Theme::default())).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    fn signed_in() -> AppState {
        let mut state = AppState::default();
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1", "email": "sam@example.com", "full_name": "Sam Lee", "role": Role::Teacher.as_str()
        }))
        .unwrap();
        state.auth.restore(user, Tokens { access: "a.b.c".into(), refresh: "r".into() });
        state
    }

    #[test]
    fn nav_bar_names_the_user() {
        let mut state = signed_in();
        state.navigate(Route::Profile);
        let screen = render(&state);
        assert!(screen.contains("Sam Lee"));
        assert!(screen.contains("[teacher]"));
        assert!(screen.contains("4 Profile"));
    }

    #[test]
    fn crash_screen_replaces_everything() {
        let mut state = signed_in();
        state.crash = Some("index out of bounds".into());
        let screen = render(&state);
        assert!(screen.contains("Something went wrong"));
        assert!(screen.contains("index out of bounds"));
        assert!(!screen.contains("4 Profile"));
    }

    #[test]
    fn quiz_is_a_placeholder() {
        let mut state = signed_in();
        state.navigate(Route::Quiz("7".into()));
        assert!(render(&state).contains("Quiz 7 is coming soon"));
    }

    #[test]
    fn help_overlay_lists_global_keys() {
        let mut state = signed_in();
        state.navigate(Route::Courses);
        state.show_help = true;
        let screen = render(&state);
        assert!(screen.contains("Everywhere"));
        assert!(screen.contains("Cycle difficulty filter"));
    }
}
