//! Application state definitions

use std::cell::Cell;
use std::time::Instant;

use crate::api::models::GenerateLessonRequest;
use crate::api::{Course, CourseFilters, NewChatSession, Role, Tokens, User};
use crate::filter::{self, CourseFilter};
use crate::forms::{LoginForm, RegisterForm, TextInput};
use crate::route::{self, MountEffect, Route, Screen};
use crate::store::{AuthStore, CoursesStore, DashboardStore, Ticket, TutorStore};

use super::command::Command;
use super::effects::{Outcome, Request};

/// Title of sessions opened by the tutor screen
pub const NEW_CHAT_TITLE: &str = "New Chat";

/// Command line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandMode {
    /// Command line hidden or showing status
    #[default]
    Normal,
    /// Accepting : commands
    Command,
    /// Accepting a / course search
    Search,
}

/// State for the command line input
#[derive(Debug, Clone, Default)]
pub struct CommandLineState {
    pub mode: CommandMode,
    pub input: TextInput,
    /// Status/error message to display (when not in input mode)
    pub message: Option<String>,
    pub is_error: bool,
    pub history: Vec<String>,
    /// Current history index when navigating
    pub history_index: Option<usize>,
}

impl CommandLineState {
    /// Maximum number of history entries to keep
    const MAX_HISTORY: usize = 200;

    fn enter(&mut self, mode: CommandMode) {
        self.mode = mode;
        self.input.clear();
        self.message = None;
        self.history_index = None;
    }

    pub fn enter_command_mode(&mut self) {
        self.enter(CommandMode::Command);
    }

    /// Search mode starts from the current query
    pub fn enter_search_mode(&mut self, query: &str) {
        self.enter(CommandMode::Search);
        self.input.set(query);
    }

    pub fn exit_input_mode(&mut self) {
        self.mode = CommandMode::Normal;
        self.input.clear();
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Text to render, including the mode prefix
    pub fn display_text(&self) -> String {
        match self.mode {
            CommandMode::Normal => self.message.clone().unwrap_or_default(),
            CommandMode::Command => format!(":{}", self.input.value()),
            CommandMode::Search => format!("/{}", self.input.value()),
        }
    }

    pub fn is_input_mode(&self) -> bool {
        self.mode != CommandMode::Normal
    }

    pub fn add_to_history(&mut self, cmd: String) {
        if !cmd.is_empty() && self.history.last() != Some(&cmd) {
            if self.history.len() >= Self::MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(cmd);
        }
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_index {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.history_index = Some(idx);
        self.input.set(self.history[idx].clone());
    }

    pub fn history_down(&mut self) {
        let Some(i) = self.history_index else { return };
        if i + 1 < self.history.len() {
            self.history_index = Some(i + 1);
            self.input.set(self.history[i + 1].clone());
        } else {
            self.history_index = None;
            self.input.clear();
        }
    }
}

/// State for the landing animation
#[derive(Debug, Clone)]
pub struct LandingAnimation {
    pub start_time: Instant,
    /// Current animation frame (50ms per frame at speed 1.0)
    pub current_frame: usize,
    /// Ready for input
    pub complete: bool,
}

impl Default for LandingAnimation {
    fn default() -> Self {
        Self { start_time: Instant::now(), current_frame: 0, complete: false }
    }
}

impl LandingAnimation {
    pub const MS_PER_FRAME: u128 = 50;
    pub const ORBIT_END_FRAME: usize = 24;
    pub const TITLE_END_FRAME: usize = 44;
    pub const TAGLINE_END_FRAME: usize = 54;
    pub const TITLE: &'static str = "AI TUTOR";

    /// Advance the animation; `speed` 0.0 finishes immediately
    pub fn tick(&mut self, speed: f32) {
        if speed <= 0.0 {
            self.skip();
            return;
        }
        let elapsed_ms = self.start_time.elapsed().as_millis() as f32 * speed;
        self.current_frame = (elapsed_ms / Self::MS_PER_FRAME as f32) as usize;
        self.complete = self.current_frame >= Self::TAGLINE_END_FRAME;
    }

    /// Jump to the final frame
    pub fn skip(&mut self) {
        self.current_frame = Self::TAGLINE_END_FRAME;
        self.complete = true;
    }

    /// Portion of the orbit ring drawn (0.0 to 1.0)
    pub fn orbit_progress(&self) -> f32 {
        (self.current_frame as f32 / Self::ORBIT_END_FRAME as f32).min(1.0)
    }

    /// How many characters of the title to show
    pub fn title_chars(&self) -> usize {
        let len = Self::TITLE.chars().count();
        if self.current_frame < Self::ORBIT_END_FRAME {
            return 0;
        }
        let span = (Self::TITLE_END_FRAME - Self::ORBIT_END_FRAME) as f32;
        let frame = (self.current_frame - Self::ORBIT_END_FRAME) as f32;
        ((frame / span) * len as f32).min(len as f32) as usize
    }

    pub fn show_tagline(&self) -> bool {
        self.current_frame >= Self::TITLE_END_FRAME
    }
}

/// Course list browsing state
#[derive(Debug, Clone, Default)]
pub struct CourseBrowser {
    pub filter: CourseFilter,
    pub selected: usize,
}

/// Course detail state
#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub selected_lesson: usize,
}

/// Chat screen state
#[derive(Debug, Clone)]
pub struct ChatState {
    pub input: TextInput,
    /// Keys go to the input box
    pub editing: bool,
    /// Lines scrolled up from the newest message
    pub scroll: usize,
    /// Furthest the transcript can scroll (updated on render)
    pub max_scroll: Cell<usize>,
    /// A message is waiting for its reply
    pub sending: bool,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            input: TextInput::default(),
            editing: true,
            scroll: 0,
            max_scroll: Cell::new(0),
            sending: false,
        }
    }
}

impl ChatState {
    /// Scroll towards older messages, stopping at the first line
    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll.get());
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Current location
    pub route: Route,
    /// Screen rendered for `route`
    pub screen: Screen,

    pub landing_animation: LandingAnimation,

    pub auth: AuthStore,
    pub courses: CoursesStore,
    pub tutor: TutorStore,
    pub dashboard: DashboardStore,

    pub login: LoginForm,
    pub register: RegisterForm,
    pub browser: CourseBrowser,
    pub detail: DetailState,
    pub chat: ChatState,

    pub command_line: CommandLineState,

    /// Help overlay visible
    pub show_help: bool,
    /// Message of a caught rendering/handler panic
    pub crash: Option<String>,
    pub should_quit: bool,

    /// Chat session to reopen once the session list arrives
    resume_chat: Option<String>,
    /// Requests waiting to be dispatched
    outbox: Vec<Request>,
}

impl AppState {
    /// Role used by the route guard; `None` when signed out
    pub fn role(&self) -> Option<Role> {
        if self.auth.is_authenticated() { self.auth.role() } else { None }
    }

    /// Hand queued requests to the dispatcher
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.outbox)
    }

    /// Requests queued so far, oldest first
    pub fn queued(&self) -> &[Request] {
        &self.outbox
    }

    /// Mark the owning container pending and queue the request
    ///
    /// Auth requests carry a ticket from [`AuthStore::request_pending`] and are
    /// already pending when they get here.
    pub fn queue(&mut self, request: Request) {
        match &request {
            Request::Login(..) | Request::Register(..) | Request::Profile(_) => {}
            Request::Courses(_)
            | Request::CourseDetail(_)
            | Request::Enroll(_)
            | Request::MyEnrollments => self.courses.request_pending(),
            Request::SendMessage { .. } => {
                self.chat.sending = true;
                self.tutor.request_pending();
            }
            Request::ChatSessions | Request::CreateChatSession(_) | Request::GenerateLesson(_) => {
                self.tutor.request_pending()
            }
            Request::StudentDashboard | Request::TeacherDashboard => {
                self.dashboard.request_pending()
            }
            Request::CancelChat => {}
        }
        self.outbox.push(request);
    }

    /// Seed a signed-in state from a previous run
    pub fn restore_session(
        &mut self,
        user: User,
        tokens: Tokens,
        last_path: Option<&str>,
        chat_session_id: Option<String>,
    ) {
        tracing::info!("Restoring session for {}", user.email);
        self.auth.restore(user, tokens);
        self.resume_chat = chat_session_id;
        let ticket = self.auth.request_pending();
        self.queue(Request::Profile(ticket));
        let route = last_path.and_then(Route::parse).unwrap_or(Route::Dashboard);
        self.navigate(route);
    }

    /// Go to `route`, applying the guard and the screen's mount effects
    pub fn navigate(&mut self, route: Route) {
        let (route, screen) = route::resolve(route, self.role());
        tracing::debug!("Navigating to {}", route);

        if screen != self.screen {
            match screen {
                Screen::Login | Screen::Register => {
                    self.auth.clear_error();
                    self.login.error = None;
                    self.register.error = None;
                }
                Screen::CourseDetail(_) => self.detail = DetailState::default(),
                Screen::AiTutor => {
                    self.chat.editing = true;
                    self.chat.scroll = 0;
                }
                _ => {}
            }
        }

        self.show_help = false;
        self.route = route;
        self.screen = screen;

        let has_session = self.tutor.current_session().is_some();
        for effect in self.screen.mount_effects(has_session) {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: MountEffect) {
        match effect {
            MountEffect::FetchCourses => self.queue(Request::Courses(CourseFilters::new())),
            MountEffect::FetchMyEnrollments => self.queue(Request::MyEnrollments),
            MountEffect::FetchCourseDetail(id) => self.queue(Request::CourseDetail(id)),
            MountEffect::FetchChatSessions => self.queue(Request::ChatSessions),
            MountEffect::OpenChatSession => {
                // A remembered session is reopened when the list arrives
                if self.resume_chat.is_none() {
                    self.open_chat();
                }
            }
            MountEffect::FetchStudentDashboard => self.queue(Request::StudentDashboard),
            MountEffect::FetchTeacherDashboard => self.queue(Request::TeacherDashboard),
        }
    }

    /// Re-run the current screen's requests
    pub fn refresh(&mut self) {
        if self.screen == Screen::Profile {
            let ticket = self.auth.request_pending();
            self.queue(Request::Profile(ticket));
        }
        for effect in self.screen.mount_effects(true) {
            self.run_effect(effect);
        }
    }

    /// Start a fresh chat session
    pub fn open_chat(&mut self) {
        self.queue(Request::CreateChatSession(NewChatSession::titled(NEW_CHAT_TITLE)));
    }

    /// Clear every container and return to the login screen
    pub fn logout(&mut self) {
        tracing::info!("Signing out");
        // Requests queued this tick belong to the old session
        self.outbox.clear();
        if self.chat.sending {
            self.queue(Request::CancelChat);
        }
        self.auth.logout();
        self.courses = CoursesStore::default();
        self.tutor = TutorStore::default();
        self.dashboard = DashboardStore::default();
        self.chat = ChatState::default();
        self.browser = CourseBrowser::default();
        self.resume_chat = None;
        self.navigate(Route::Login);
    }

    fn expire_session(&mut self) {
        tracing::warn!("Access token rejected, signing out");
        self.logout();
        self.command_line.set_error("Session expired. Please sign in again");
    }

    // -- forms --------------------------------------------------------------

    pub fn submit_login(&mut self) {
        match self.login.credentials() {
            Ok(credentials) => {
                self.login.error = None;
                let ticket = self.auth.request_pending();
                self.queue(Request::Login(ticket, credentials));
            }
            Err(message) => self.login.error = Some(message),
        }
    }

    pub fn submit_register(&mut self) {
        match self.register.request() {
            Ok(request) => {
                self.register.error = None;
                let ticket = self.auth.request_pending();
                self.queue(Request::Register(ticket, request));
            }
            Err(message) => self.register.error = Some(message),
        }
    }

    /// A form field changed; stale messages go away
    pub fn form_edited(&mut self) {
        self.auth.clear_error();
        self.login.error = None;
        self.register.error = None;
    }

    fn signed_in(&mut self) {
        self.login = LoginForm::default();
        self.register = RegisterForm::default();
        self.navigate(Route::Dashboard);
    }

    // -- courses ------------------------------------------------------------

    /// Courses passing the client-side filter
    pub fn visible_courses(&self) -> Vec<&Course> {
        self.browser.filter.apply(self.courses.courses())
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.visible_courses().get(self.browser.selected).copied()
    }

    pub fn select_course(&mut self, delta: isize) {
        let len = self.visible_courses().len();
        self.browser.selected = step(self.browser.selected, delta, len);
    }

    fn clamp_course_selection(&mut self) {
        let len = self.visible_courses().len();
        self.browser.selected = self.browser.selected.min(len.saturating_sub(1));
    }

    pub fn set_search(&mut self, query: &str) {
        self.browser.filter.search = query.to_string();
        self.clamp_course_selection();
    }

    pub fn cycle_difficulty(&mut self) {
        let next = filter::cycle_difficulty(self.browser.filter.difficulty.as_deref());
        self.browser.filter.difficulty = next;
        self.clamp_course_selection();
    }

    pub fn clear_filter(&mut self) {
        self.browser.filter = CourseFilter::default();
        self.browser.selected = 0;
    }

    pub fn open_selected_course(&mut self) {
        if let Some(id) = self.selected_course().map(|c| c.id.clone()) {
            self.navigate(Route::CourseDetail(id));
        }
    }

    /// Enroll in a course unless already enrolled
    pub fn enroll(&mut self, course_id: &str) {
        if self.courses.is_enrolled(course_id) {
            self.command_line.set_message("Already enrolled");
            return;
        }
        self.queue(Request::Enroll(course_id.to_string()));
    }

    pub fn select_lesson(&mut self, delta: isize) {
        let len = self.courses.current_course().map(|c| c.lessons.len()).unwrap_or(0);
        self.detail.selected_lesson = step(self.detail.selected_lesson, delta, len);
    }

    /// Ask for AI-generated material on the selected lesson
    pub fn generate_for_selected_lesson(&mut self) {
        let Some(course) = self.courses.current_course() else { return };
        let topic = match course.lessons.get(self.detail.selected_lesson) {
            Some(lesson) => format!("{}: {}", course.title, lesson.title),
            None => course.title.clone(),
        };
        let difficulty =
            if course.difficulty.is_empty() { "beginner".to_string() } else { course.difficulty.clone() };
        let learning_style = self.auth.user().and_then(|u| u.learning_style.clone());
        self.queue(Request::GenerateLesson(GenerateLessonRequest {
            topic,
            difficulty,
            learning_style,
        }));
    }

    // -- chat ---------------------------------------------------------------

    /// Send the chat input to the active session
    pub fn submit_chat(&mut self) {
        if self.chat.sending {
            return;
        }
        let text = self.chat.input.value().trim().to_string();
        if text.is_empty() {
            return;
        }
        let Some(session_id) = self.tutor.current_session().map(|s| s.id.clone()) else {
            self.command_line.set_error("No active chat session. Use :new-chat");
            return;
        };
        self.chat.input.clear();
        self.chat.scroll = 0;
        self.queue(Request::SendMessage { session_id, text });
    }

    /// Abort a message that is waiting for its reply
    pub fn cancel_chat(&mut self) -> bool {
        if !self.chat.sending {
            return false;
        }
        self.queue(Request::CancelChat);
        true
    }

    /// Switch to the next session in the list
    pub fn next_session(&mut self) {
        let sessions = self.tutor.sessions();
        if sessions.is_empty() {
            return;
        }
        let current = self.tutor.current_session().map(|s| s.id.as_str());
        let idx = sessions.iter().position(|s| Some(s.id.as_str()) == current);
        let next = idx.map(|i| (i + 1) % sessions.len()).unwrap_or(0);
        let session = sessions[next].clone();
        self.tutor.set_current_session(Some(session));
        self.chat.scroll = 0;
    }

    // -- commands -----------------------------------------------------------

    pub fn execute_command(&mut self, command: Command) {
        match command {
            Command::Go(route) => self.navigate(route),
            Command::Dashboard => self.navigate(Route::Dashboard),
            Command::Courses => self.navigate(Route::Courses),
            Command::Tutor => self.navigate(Route::AiTutor),
            Command::Profile => self.navigate(Route::Profile),
            Command::NewChat => {
                let had_session = self.tutor.current_session().is_some();
                self.navigate(Route::AiTutor);
                // Mounting without a session already opened one
                if self.screen == Screen::AiTutor && had_session {
                    self.resume_chat = None;
                    self.open_chat();
                }
            }
            Command::Refresh => self.refresh(),
            Command::Logout => {
                if self.auth.is_authenticated() {
                    self.logout();
                }
            }
            Command::Help => self.show_help = true,
            Command::Quit => self.should_quit = true,
            Command::Nop => self.command_line.clear_message(),
        }
    }

    // -- outcomes -----------------------------------------------------------

    /// Apply an outcome dispatched under `ticket`
    ///
    /// Results of requests sent before a logout are dropped so they cannot
    /// refill the containers of the next session.
    pub fn receive(&mut self, ticket: Ticket, outcome: Outcome) {
        if ticket != self.auth.ticket() {
            tracing::debug!("Dropping {:?} from a previous session", outcome);
            return;
        }
        self.apply(outcome);
    }

    /// Feed a settled request into its container
    pub fn apply(&mut self, outcome: Outcome) {
        let expired = self.auth.is_authenticated()
            && !outcome.is_sign_in()
            && outcome.error().is_some_and(|e| e.requires_reauth());

        match outcome {
            Outcome::Login(ticket, result) => {
                if self.auth.resolve_login(ticket, result) {
                    self.signed_in();
                } else {
                    self.login.clear_password();
                }
            }
            Outcome::Register(ticket, result) => {
                if self.auth.resolve_register(ticket, result) {
                    self.signed_in();
                }
            }
            Outcome::Profile(ticket, result) => {
                self.auth.resolve_profile(ticket, result);
            }
            Outcome::Courses(result) => {
                self.courses.resolve_courses(result);
                self.clamp_course_selection();
            }
            Outcome::CourseDetail(result) => self.courses.resolve_course_detail(result),
            Outcome::Enroll(result) => {
                let enrolled = result.is_ok();
                self.courses.resolve_enroll(result);
                if enrolled {
                    self.command_line.set_message("Enrolled");
                }
            }
            Outcome::MyEnrollments(result) => self.courses.resolve_enrollments(result),
            Outcome::ChatSessions(result) => {
                self.tutor.resolve_sessions(result);
                if let Some(id) = self.resume_chat.take() {
                    self.resume_chat_session(&id);
                }
            }
            Outcome::CreateChatSession(result) => {
                self.tutor.resolve_create_session(result);
                self.chat.scroll = 0;
            }
            Outcome::SendMessage(result) => {
                self.chat.sending = false;
                self.tutor.resolve_send_message(result);
                self.chat.scroll = 0;
            }
            Outcome::GenerateLesson(result) => self.tutor.resolve_generate_lesson(result),
            Outcome::StudentDashboard(result) => self.dashboard.resolve_student(result),
            Outcome::TeacherDashboard(result) => self.dashboard.resolve_teacher(result),
        }

        if expired {
            self.expire_session();
        }
    }

    fn resume_chat_session(&mut self, id: &str) {
        if self.tutor.current_session().is_some() {
            return;
        }
        match self.tutor.sessions().iter().find(|s| s.id == id).cloned() {
            Some(session) => {
                tracing::info!("Resuming chat session {}", id);
                self.tutor.set_current_session(Some(session));
            }
            None if self.screen == Screen::AiTutor => self.open_chat(),
            None => {}
        }
    }

    /// Store error for the screen on display
    pub fn screen_error(&self) -> Option<&str> {
        match self.screen {
            Screen::Login | Screen::Register | Screen::Profile => self.auth.error(),
            Screen::Courses | Screen::CourseDetail(_) => self.courses.error(),
            Screen::AiTutor => self.tutor.error(),
            Screen::StudentDashboard | Screen::TeacherDashboard => self.dashboard.error(),
            Screen::Landing | Screen::Quiz(_) => None,
        }
    }

    /// Dismiss the banner on the current screen
    pub fn dismiss_error(&mut self) {
        match self.screen {
            Screen::Login | Screen::Register | Screen::Profile => self.auth.clear_error(),
            Screen::Courses | Screen::CourseDetail(_) => self.courses.clear_error(),
            Screen::AiTutor => self.tutor.clear_error(),
            Screen::StudentDashboard | Screen::TeacherDashboard => self.dashboard.clear_error(),
            Screen::Landing | Screen::Quiz(_) => {}
        }
    }

    /// Active chat session id, for persistence
    pub fn chat_session_id(&self) -> Option<String> {
        self.tutor.current_session().map(|s| s.id.clone()).or_else(|| self.resume_chat.clone())
    }
}

/// Move a list cursor by `delta`, clamped to `len`
fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
