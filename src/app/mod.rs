//! Application state and event handling

pub mod command;
pub mod effects;
pub mod handler;
pub mod input;
pub mod state;

use std::any::Any;
use std::io::{self, Stdout};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::api::{TokenStore, Tokens, TutorClient, User};
use crate::config::{Config, Session};
use crate::route::{Route, Screen};
use crate::theme::Theme;
use crate::ui;
use effects::Dispatcher;
use state::AppState;

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Current application state
    state: AppState,

    /// Colours resolved from the config once at start-up
    theme: Theme,

    /// Runs queued requests in the background
    dispatcher: Dispatcher,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    ///
    /// With `remember_session` on, a stored user and token pair skip the
    /// landing screen and reopen the last visited page.
    pub fn new(config: Config, client: TutorClient) -> Result<Self> {
        let mut state = AppState::default();
        if config.remember_session {
            restore(&mut state);
        } else {
            state.navigate(Route::Landing);
        }

        let theme = config.active_theme();
        let terminal = Self::setup_terminal()?;
        Ok(Self { config, state, theme, dispatcher: Dispatcher::new(client), terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    ///
    /// Panics while drawing or handling a key are caught and shown on the
    /// crash screen instead of tearing down the terminal.
    pub async fn run(&mut self) -> Result<()> {
        // The default hook would print over the alternate screen
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(|panic_info| {
            tracing::error!("Panic: {}", panic_info);
        }));

        let result = self.event_loop();

        self.save_session();
        panic::set_hook(original_hook);
        self.restore_terminal()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        loop {
            self.apply_outcomes();
            self.flush_requests();

            if self.state.screen == Screen::Landing {
                self.state.landing_animation.tick(self.config.animation_speed);
            }

            // Draw UI
            let state = &self.state;
            let theme = &self.theme;
            let terminal = &mut self.terminal;
            let drawn = panic::catch_unwind(AssertUnwindSafe(|| {
                terminal.draw(|frame| ui::draw(frame, state, theme)).map(|_| ())
            }));
            match drawn {
                Ok(result) => result?,
                Err(payload) => {
                    self.state.crash = Some(panic_message(payload.as_ref()));
                    self.terminal.clear()?;
                }
            }

            // Handle events
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let state = &mut self.state;
                        if let Err(payload) =
                            panic::catch_unwind(AssertUnwindSafe(|| state.handle_key(key)))
                        {
                            self.state.crash = Some(panic_message(payload.as_ref()));
                        }
                    }
                }
            }

            if self.state.should_quit {
                return Ok(());
            }
        }
    }

    /// Feed settled requests into the state, persisting sign-in changes
    fn apply_outcomes(&mut self) {
        for (ticket, outcome) in self.dispatcher.drain() {
            let before = self.signed_in_as();
            self.state.receive(ticket, outcome);
            if self.signed_in_as() != before {
                self.persist_auth();
            }
        }
    }

    /// Start every request the state queued since the last tick
    fn flush_requests(&mut self) {
        let ticket = self.state.auth.ticket();
        let requests = self.state.take_requests();
        for request in requests {
            self.dispatcher.dispatch(ticket, request, self.state.auth.access_token());
        }
    }

    fn signed_in_as(&self) -> Option<(User, Tokens)> {
        let user = self.state.auth.user()?.clone();
        let tokens = self.state.auth.tokens()?.clone();
        Some((user, tokens))
    }

    fn persist_auth(&self) {
        if !self.config.remember_session {
            return;
        }
        match self.state.auth.tokens() {
            Some(tokens) => {
                if let Err(e) = TokenStore::save(tokens) {
                    tracing::warn!("Failed to store tokens: {}", e);
                }
                self.save_session();
            }
            None => {
                if let Err(e) = TokenStore::clear() {
                    tracing::warn!("Failed to clear tokens: {}", e);
                }
                if let Err(e) = Session::clear() {
                    tracing::warn!("Failed to clear session: {:#}", e);
                }
            }
        }
    }

    fn save_session(&self) {
        if !self.config.remember_session || !self.state.auth.is_authenticated() {
            return;
        }
        let session = Session {
            user: self.state.auth.user().cloned(),
            last_path: Some(self.state.route.path()),
            chat_session_id: self.state.chat_session_id(),
        };
        if let Err(e) = session.save() {
            tracing::warn!("Failed to save session: {:#}", e);
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Seed the state from the stored session, or start at the landing page
fn restore(state: &mut AppState) {
    let session = Session::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable session: {:#}", e);
        Session::default()
    });
    let Some(user) = session.user else {
        state.navigate(Route::Landing);
        return;
    };
    match TokenStore::load() {
        Ok(tokens) => state.restore_session(
            user,
            tokens,
            session.last_path.as_deref(),
            session.chat_session_id,
        ),
        Err(e) => {
            tracing::info!("No stored tokens ({}), starting signed out", e);
            state.navigate(Route::Landing);
        }
    }
}

/// Text of a caught panic
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Something went wrong".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let payload = panic::catch_unwind(|| panic!("static text")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static text");

        let payload = panic::catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 42");

        let payload = panic::catch_unwind(|| std::panic::panic_any(7_u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "Something went wrong");
    }
}
