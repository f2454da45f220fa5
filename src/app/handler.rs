//! Key handling per screen

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::command::{ParseResult, parse_command};
use super::input::{Action, key_with_modifier_to_action};
use super::state::{AppState, CommandMode};
use crate::forms::{LoginField, RegisterField, TextInput};
use crate::route::{Route, Screen};

/// Apply a line-editing key to `input`; returns whether the text changed
fn edit_text(input: &mut TextInput, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            input.insert(c);
            true
        }
        KeyCode::Backspace => {
            input.backspace();
            true
        }
        KeyCode::Delete => {
            input.delete();
            true
        }
        KeyCode::Left => {
            input.move_left();
            false
        }
        KeyCode::Right => {
            input.move_right();
            false
        }
        KeyCode::Home => {
            input.move_start();
            false
        }
        KeyCode::End => {
            input.move_end();
            false
        }
        _ => false,
    }
}

fn is_ctrl(key: KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

impl AppState {
    /// Route a key press to the focused part of the UI
    pub fn handle_key(&mut self, key: KeyEvent) {
        if is_ctrl(key, 'c') {
            self.should_quit = true;
            return;
        }
        if self.crash.is_some() {
            self.handle_crash_key(key.code);
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.command_line.is_input_mode() {
            self.handle_command_line_key(key);
            return;
        }

        match self.screen {
            Screen::Landing => self.handle_landing_key(key.code),
            Screen::Login => self.handle_login_key(key),
            Screen::Register => self.handle_register_key(key),
            Screen::AiTutor if self.chat.editing => self.handle_chat_key(key),
            _ => {
                if let Some(action) = key_with_modifier_to_action(key.code, key.modifiers) {
                    self.handle_action(action);
                }
            }
        }
    }

    fn handle_crash_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('r') | KeyCode::Enter => {
                tracing::info!("Retrying after crash");
                self.crash = None;
            }
            KeyCode::Char('h') | KeyCode::Esc => {
                self.crash = None;
                self.navigate(Route::Landing);
            }
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_landing_key(&mut self, key: KeyCode) {
        if !self.landing_animation.complete {
            self.landing_animation.skip();
            return;
        }
        match key {
            KeyCode::Char('r') => self.navigate(Route::Register),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => self.navigate(Route::Login),
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if is_ctrl(key, 'r') {
            self.navigate(Route::Register);
            return;
        }
        if is_ctrl(key, 's') {
            self.login.reveal = !self.login.reveal;
            return;
        }
        match key.code {
            KeyCode::Esc => self.navigate(Route::Landing),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.next_field()
            }
            KeyCode::Enter if self.login.focus == LoginField::Email => self.login.next_field(),
            KeyCode::Enter => self.submit_login(),
            _ => {
                if edit_text(self.login.focused_mut(), key) {
                    self.form_edited();
                }
            }
        }
    }

    fn handle_register_key(&mut self, key: KeyEvent) {
        if is_ctrl(key, 'r') {
            self.navigate(Route::Login);
            return;
        }
        if is_ctrl(key, 's') {
            self.register.reveal = !self.register.reveal;
            return;
        }
        match key.code {
            KeyCode::Esc => self.navigate(Route::Landing),
            KeyCode::Tab | KeyCode::Down => self.register.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.register.prev_field(),
            KeyCode::Enter if self.register.focus == RegisterField::Confirm => {
                self.submit_register()
            }
            KeyCode::Enter => self.register.next_field(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                if self.register.focus == RegisterField::Role =>
            {
                self.register.toggle_role();
                self.form_edited();
            }
            _ => {
                let changed = match self.register.focused_mut() {
                    Some(input) => edit_text(input, key),
                    None => false,
                };
                if changed {
                    self.form_edited();
                }
            }
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        if is_ctrl(key, 'n') {
            self.execute_command(super::command::Command::NewChat);
            return;
        }
        match key.code {
            KeyCode::Enter => self.submit_chat(),
            KeyCode::Esc => {
                if self.cancel_chat() {
                    self.command_line.set_message("Cancelled");
                } else if self.tutor.error().is_some() {
                    self.tutor.clear_error();
                } else {
                    self.chat.editing = false;
                }
            }
            KeyCode::PageUp => self.chat.scroll_up(5),
            KeyCode::PageDown => self.chat.scroll_down(5),
            _ => {
                edit_text(&mut self.chat.input, key);
            }
        }
    }

    fn handle_command_line_key(&mut self, key: KeyEvent) {
        let mode = self.command_line.mode;
        match key.code {
            KeyCode::Esc => {
                if mode == CommandMode::Search {
                    self.set_search("");
                }
                self.command_line.exit_input_mode();
            }
            KeyCode::Enter => {
                let text = self.command_line.input.take();
                self.command_line.exit_input_mode();
                if mode == CommandMode::Command {
                    self.command_line.add_to_history(text.clone());
                    self.run_command_text(&text);
                }
            }
            KeyCode::Up if mode == CommandMode::Command => self.command_line.history_up(),
            KeyCode::Down if mode == CommandMode::Command => self.command_line.history_down(),
            KeyCode::Backspace if self.command_line.input.is_empty() => {
                self.command_line.exit_input_mode();
            }
            _ => {
                if edit_text(&mut self.command_line.input, key) && mode == CommandMode::Search {
                    let query = self.command_line.input.value().to_string();
                    self.set_search(&query);
                }
            }
        }
    }

    fn run_command_text(&mut self, text: &str) {
        let result = parse_command(text);
        if let Some(message) = result.error_message() {
            self.command_line.set_error(message);
            return;
        }
        if let ParseResult::Ok(command) = result {
            self.execute_command(command);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Command => self.command_line.enter_command_mode(),
            Action::Help => self.show_help = true,
            Action::GoDashboard => self.navigate(Route::Dashboard),
            Action::GoCourses => self.navigate(Route::Courses),
            Action::GoTutor => self.navigate(Route::AiTutor),
            Action::GoProfile => self.navigate(Route::Profile),
            Action::Refresh => self.refresh(),
            Action::Dismiss => self.dismiss_error(),
            _ => self.handle_screen_action(action),
        }
    }

    fn handle_screen_action(&mut self, action: Action) {
        let screen = self.screen.clone();
        match (&screen, action) {
            (Screen::Courses, Action::Up) => self.select_course(-1),
            (Screen::Courses, Action::Down) => self.select_course(1),
            (Screen::Courses, Action::PageUp) => self.select_course(-10),
            (Screen::Courses, Action::PageDown) => self.select_course(10),
            (Screen::Courses, Action::Top) => self.select_course(isize::MIN),
            (Screen::Courses, Action::Bottom) => self.select_course(isize::MAX),
            (Screen::Courses, Action::Select) => self.open_selected_course(),
            (Screen::Courses, Action::Search) => {
                let query = self.browser.filter.search.clone();
                self.command_line.enter_search_mode(&query);
            }
            (Screen::Courses, Action::CycleDifficulty) => self.cycle_difficulty(),
            (Screen::Courses, Action::ClearFilter) => self.clear_filter(),
            (Screen::Courses, Action::Enroll) => {
                if let Some(id) = self.selected_course().map(|c| c.id.clone()) {
                    self.enroll(&id);
                }
            }

            (Screen::CourseDetail(_), Action::Up) => self.select_lesson(-1),
            (Screen::CourseDetail(_), Action::Down) => self.select_lesson(1),
            (Screen::CourseDetail(_), Action::Back) => self.navigate(Route::Courses),
            (Screen::CourseDetail(id), Action::Enroll) => self.enroll(id),
            (Screen::CourseDetail(_), Action::GenerateLesson) => {
                self.generate_for_selected_lesson()
            }

            (Screen::AiTutor, Action::Select | Action::Edit) => self.chat.editing = true,
            (Screen::AiTutor, Action::Up) => self.chat.scroll_up(1),
            (Screen::AiTutor, Action::Down) => self.chat.scroll_down(1),
            (Screen::AiTutor, Action::PageUp) => self.chat.scroll_up(10),
            (Screen::AiTutor, Action::PageDown) => self.chat.scroll_down(10),
            (Screen::AiTutor, Action::Bottom) => self.chat.scroll = 0,
            (Screen::AiTutor, Action::NewChat) => {
                self.execute_command(super::command::Command::NewChat)
            }
            (Screen::AiTutor, Action::NextSession) => self.next_session(),

            (Screen::Courses | Screen::AiTutor | Screen::Quiz(_) | Screen::Profile, Action::Back) => {
                self.navigate(Route::Dashboard)
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Course, Role, Tokens, User};
    use crate::app::effects::{Outcome, Request};
    use pretty_assertions::assert_eq;

    fn press(state: &mut AppState, code: KeyCode) {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    fn signed_in() -> AppState {
        let mut state = AppState::default();
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1", "email": "sam@example.com", "full_name": "Sam", "role": Role::Student.as_str()
        }))
        .unwrap();
        state.auth.restore(user, Tokens { access: "a.b.c".into(), refresh: "r".into() });
        state
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let mut state = AppState::default();
        state.navigate(Route::Login);
        state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(state.should_quit);
    }

    #[test]
    fn landing_first_key_skips_animation() {
        let mut state = AppState::default();
        press(&mut state, KeyCode::Char('x'));
        assert!(state.landing_animation.complete);
        assert_eq!(state.screen, Screen::Landing);
        press(&mut state, KeyCode::Char('r'));
        assert_eq!(state.screen, Screen::Register);
    }

    #[test]
    fn login_form_typing_and_submit() {
        let mut state = AppState::default();
        state.navigate(Route::Login);
        type_text(&mut state, "sam@example.com");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.login.focus, LoginField::Password);
        type_text(&mut state, "secret");
        press(&mut state, KeyCode::Enter);

        let requests = state.take_requests();
        assert!(matches!(
            requests.as_slice(),
            [Request::Login(_, creds)] if creds.email == "sam@example.com" && creds.password == "secret"
        ));
        assert!(state.auth.loading());
    }

    #[test]
    fn register_role_picker_toggles() {
        let mut state = AppState::default();
        state.navigate(Route::Register);
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.register.focus, RegisterField::Role);
        press(&mut state, KeyCode::Right);
        assert_eq!(state.register.role, Role::Teacher);
    }

    #[test]
    fn command_line_navigates() {
        let mut state = signed_in();
        state.navigate(Route::Dashboard);
        press(&mut state, KeyCode::Char(':'));
        type_text(&mut state, "go /profile");
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.screen, Screen::Profile);
        assert_eq!(state.command_line.history, vec!["go /profile".to_string()]);
    }

    #[test]
    fn unknown_command_reports_error() {
        let mut state = signed_in();
        state.navigate(Route::Dashboard);
        press(&mut state, KeyCode::Char(':'));
        type_text(&mut state, "fly");
        press(&mut state, KeyCode::Enter);
        assert!(state.command_line.is_error);
        assert_eq!(state.command_line.message.as_deref(), Some("Unknown command: fly"));
    }

    #[test]
    fn live_search_filters_courses() {
        let mut state = signed_in();
        state.navigate(Route::Courses);
        state.take_requests();
        state.apply(Outcome::Courses(Ok(vec![
            Course { id: "1".into(), title: "Rust".into(), ..Default::default() },
            Course { id: "2".into(), title: "Go".into(), ..Default::default() },
        ])));

        press(&mut state, KeyCode::Char('/'));
        type_text(&mut state, "ru");
        assert_eq!(state.visible_courses().len(), 1);
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.visible_courses().len(), 2);
    }

    #[test]
    fn chat_escape_leaves_input_then_digits_navigate() {
        let mut state = signed_in();
        state.navigate(Route::AiTutor);
        type_text(&mut state, "12");
        assert_eq!(state.chat.input.value(), "12");
        press(&mut state, KeyCode::Esc);
        assert!(!state.chat.editing);
        press(&mut state, KeyCode::Char('2'));
        assert_eq!(state.screen, Screen::Courses);
    }

    #[test]
    fn crash_screen_go_home() {
        let mut state = signed_in();
        state.navigate(Route::Courses);
        state.crash = Some("boom".into());
        press(&mut state, KeyCode::Char('2'));
        assert_eq!(state.screen, Screen::Courses);
        press(&mut state, KeyCode::Char('h'));
        assert!(state.crash.is_none());
        assert_eq!(state.screen, Screen::StudentDashboard);
    }
}
