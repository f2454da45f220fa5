//! Data models for tutor API requests and responses

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response wrapper used by every backend endpoint
///
/// Success: `{ "success": true, "message": "...", "data": ... }`
/// Failure: `{ "success": false, "error": { "message": "...", "details": ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Success flag (absent on some legacy endpoints)
    #[serde(default)]
    pub success: Option<bool>,
    /// Payload on success
    pub data: Option<T>,
    /// Error body on failure
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

/// Error part of an envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorBody {
    /// `{ "message": "...", "details": ... }`
    Detailed {
        /// Human-readable message
        message: String,
        /// Field-level details, shape varies per endpoint
        #[serde(default)]
        details: Option<serde_json::Value>,
    },
    /// Some endpoints answer with a bare string
    Plain(String),
}

impl ErrorBody {
    /// The human-readable message
    pub fn message(&self) -> &str {
        match self {
            ErrorBody::Detailed { message, .. } => message,
            ErrorBody::Plain(message) => message,
        }
    }
}

/// Identifiers arrive as UUID strings, but numeric ids are accepted too
mod id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Raw::deserialize(d)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
        })
    }
}

/// Decimal fields may be serialized as numbers, strings or null
mod number {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(match Option::<Raw>::deserialize(d)? {
            Some(Raw::Number(n)) => n,
            Some(Raw::Text(s)) => s.trim().parse().unwrap_or(0.0),
            None => 0.0,
        })
    }
}

// ---------------------------------------------------------------------------
// Users and authentication
// ---------------------------------------------------------------------------

/// Account role
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Admin,
}

impl Role {
    /// Wire/display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Parse a role from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" | "s" => Some(Self::Student),
            "teacher" | "t" => Some(Self::Teacher),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub learning_style: Option<String>,
    #[serde(default)]
    pub grade_level: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_active: Option<String>,
}

impl User {
    /// Name to greet the user with
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() { &self.email } else { &self.full_name }
    }
}

/// JWT pair issued on login/registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access: String,
    pub refresh: String,
}

/// Payload of the login and register endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub tokens: Tokens,
}

/// Login form body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration form body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub full_name: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

/// Course author summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
}

/// A lesson inside a course detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub order: u32,
    /// Minutes
    #[serde(default)]
    pub duration: u32,
}

/// Catalog entry (list) or full course (detail, with lessons)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    /// Hours
    #[serde(default)]
    pub estimated_duration: u32,
    #[serde(default)]
    pub total_lessons: u32,
    #[serde(default)]
    pub total_students: u32,
    #[serde(default)]
    pub instructor: Option<Instructor>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub prerequisites: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Query parameters for the course list, passed through verbatim
pub type CourseFilters = BTreeMap<String, String>;

/// Enrollments reference their course either by id or as a nested summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseRef {
    Summary(Box<Course>),
    Id(#[serde(deserialize_with = "id::deserialize")] String),
}

impl CourseRef {
    /// Id of the referenced course
    pub fn id(&self) -> &str {
        match self {
            CourseRef::Summary(course) => &course.id,
            CourseRef::Id(id) => id,
        }
    }
}

/// A student's enrollment in a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    pub course: CourseRef,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "number::deserialize")]
    pub progress_percentage: f64,
    #[serde(default)]
    pub enrolled_at: Option<String>,
}

// ---------------------------------------------------------------------------
// AI tutor chat
// ---------------------------------------------------------------------------

/// Message role in a tutoring conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Student message
    User,
    /// Tutor reply
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "id::deserialize")]
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            role: MessageRole::User,
            content: content.into(),
            model_used: None,
            created_at: None,
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: MessageRole::Assistant, ..Self::user(content) }
    }
}

/// A tutoring conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub lesson: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body for creating a chat session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewChatSession {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lesson: Option<String>,
}

impl NewChatSession {
    /// Untitled session as opened by the tutor screen
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Default::default() }
    }
}

/// Body for sending a chat message
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Payload of a message round trip: the echoed question and the reply
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageExchange {
    pub user_message: ChatMessage,
    pub ai_response: ChatMessage,
}

/// Body for AI lesson generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateLessonRequest {
    pub topic: String,
    pub difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_style: Option<String>,
}

/// Generated lesson content
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedLesson {
    #[serde(default, deserialize_with = "id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub generated_content: serde_json::Value,
    #[serde(default)]
    pub model_used: Option<String>,
}

// ---------------------------------------------------------------------------
// Analytics dashboards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StudentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub learning_style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StudentAnalytics {
    /// Minutes
    #[serde(default)]
    pub total_study_time: u64,
    /// Days
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub courses_enrolled: u32,
    #[serde(default)]
    pub courses_completed: u32,
    #[serde(default, deserialize_with = "number::deserialize")]
    pub average_quiz_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EnrollmentCounts {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub active: u32,
    #[serde(default)]
    pub completed: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizResult {
    pub quiz_title: String,
    #[serde(default, deserialize_with = "number::deserialize")]
    pub score: f64,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Student analytics dashboard
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StudentDashboard {
    #[serde(default)]
    pub user_info: StudentInfo,
    #[serde(default)]
    pub analytics: StudentAnalytics,
    #[serde(default)]
    pub enrollments: EnrollmentCounts,
    #[serde(default)]
    pub recent_quizzes: Vec<QuizResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeacherSummary {
    #[serde(default)]
    pub total_courses: u32,
    #[serde(default)]
    pub total_students: u32,
    #[serde(default)]
    pub total_enrollments: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CourseStats {
    #[serde(deserialize_with = "id::deserialize")]
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub total_students: u32,
    #[serde(default)]
    pub active_students: u32,
    #[serde(default, deserialize_with = "number::deserialize")]
    pub average_progress: f64,
    #[serde(default, deserialize_with = "number::deserialize")]
    pub average_rating: f64,
}

/// Teacher analytics dashboard
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeacherDashboard {
    #[serde(default)]
    pub summary: TeacherSummary,
    #[serde(default)]
    pub courses: Vec<CourseStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn role_parse() {
        assert_eq!(Role::parse("teacher"), Some(Role::Teacher));
        assert_eq!(Role::parse(" Student "), Some(Role::Student));
        assert_eq!(Role::parse("t"), Some(Role::Teacher));
        assert_eq!(Role::parse("principal"), None);
    }

    #[test]
    fn envelope_with_detailed_error() {
        let json = r#"{"success":false,"error":{"message":"Invalid credentials","details":null}}"#;
        let env: Envelope<User> = serde_json::from_str(json).unwrap();
        assert!(env.data.is_none());
        assert_eq!(env.error.unwrap().message(), "Invalid credentials");
    }

    #[test]
    fn envelope_with_plain_error() {
        let json = r#"{"error":"Only teachers can access this endpoint"}"#;
        let env: Envelope<TeacherDashboard> = serde_json::from_str(json).unwrap();
        assert_eq!(env.error.unwrap().message(), "Only teachers can access this endpoint");
    }

    #[test]
    fn numeric_ids_become_strings() {
        let json = r#"{"id":1,"title":"A","difficulty":"beginner"}"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.id, "1");
        assert_eq!(course.total_lessons, 0);
        assert!(course.lessons.is_empty());
    }

    #[test]
    fn course_detail_with_lessons() {
        let json = r#"{
            "id": "6f1c",
            "title": "Rust Basics",
            "description": "Ownership and borrowing",
            "category": "programming",
            "difficulty": "beginner",
            "estimated_duration": 12,
            "total_lessons": 2,
            "instructor": {"id": "u1", "full_name": "Ada", "email": "ada@example.com"},
            "lessons": [
                {"id": "l1", "title": "Ownership", "order": 1, "duration": 30},
                {"id": "l2", "title": "Borrowing", "order": 2, "duration": 45}
            ]
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.lessons.len(), 2);
        assert_eq!(course.lessons[1].duration, 45);
        assert_eq!(course.instructor.unwrap().full_name, "Ada");
    }

    #[test]
    fn enrollment_course_id_or_summary() {
        let by_id: Enrollment =
            serde_json::from_str(r#"{"id":"e1","course":"c9","progress_percentage":"12.5"}"#)
                .unwrap();
        assert_eq!(by_id.course.id(), "c9");
        assert_eq!(by_id.progress_percentage, 12.5);

        let nested: Enrollment =
            serde_json::from_str(r#"{"id":"e2","course":{"id":"c3","title":"Math"}}"#).unwrap();
        assert_eq!(nested.course.id(), "c3");
    }

    #[test]
    fn message_exchange_decodes() {
        let json = r#"{
            "user_message": {"id":"m1","role":"user","content":"What is a monad?"},
            "ai_response": {"id":"m2","role":"assistant","content":"A monoid in the category...","model_used":"gemini"}
        }"#;
        let exchange: MessageExchange = serde_json::from_str(json).unwrap();
        assert_eq!(exchange.user_message.role, MessageRole::User);
        assert_eq!(exchange.ai_response.role, MessageRole::Assistant);
    }

    #[test]
    fn student_dashboard_defaults_missing_sections() {
        let json = r#"{"user_info":{"name":"Sam"},"analytics":{"average_quiz_score":null}}"#;
        let dash: StudentDashboard = serde_json::from_str(json).unwrap();
        assert_eq!(dash.user_info.name, "Sam");
        assert_eq!(dash.analytics.average_quiz_score, 0.0);
        assert!(dash.recent_quizzes.is_empty());
    }

    #[test]
    fn register_request_serializes_role_lowercase() {
        let req = RegisterRequest { role: Role::Teacher, ..Default::default() };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""role":"teacher""#));
    }

    #[test]
    fn new_chat_session_skips_empty_links() {
        let json = serde_json::to_string(&NewChatSession::titled("New Chat")).unwrap();
        assert_eq!(json, r#"{"title":"New Chat"}"#);
    }
}
