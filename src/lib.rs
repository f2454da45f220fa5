//! AI Tutor - a terminal client for the AI Tutor learning platform
//!
//! Sign in, browse and enroll in courses, follow your progress on a
//! role-specific dashboard and talk to the AI tutor, all from the terminal.

pub mod api;
pub mod app;
pub mod config;
pub mod filter;
pub mod forms;
pub mod route;
pub mod store;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
