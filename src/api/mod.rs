//! Tutor backend integration
//!
//! Provides the HTTP client, the `{data, error}` envelope decoding, wire
//! models and keyring-backed token storage.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use auth::TokenStore;
pub use client::TutorClient;
pub use error::ApiError;
pub use models::{
    AuthPayload, ChatMessage, ChatSession, Course, CourseFilters, Credentials, Enrollment,
    MessageRole, NewChatSession, RegisterRequest, Role, StudentDashboard, TeacherDashboard,
    Tokens, User,
};
