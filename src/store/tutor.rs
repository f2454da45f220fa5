//! AI tutor chat container

use super::RequestState;
use crate::api::models::{GenerateLessonRequest, GeneratedLesson, MessageExchange};
use crate::api::{ApiError, ChatMessage, ChatSession, NewChatSession, TutorClient};

const SESSIONS_FAILED: &str = "Failed to fetch sessions";
const CREATE_FAILED: &str = "Failed to create session";
const SEND_FAILED: &str = "Failed to send message";
const GENERATE_FAILED: &str = "Failed to generate lesson";

/// Chat sessions and the visible transcript
#[derive(Debug, Default)]
pub struct TutorStore {
    sessions: Vec<ChatSession>,
    current_session: Option<ChatSession>,
    messages: Vec<ChatMessage>,
    generated_lesson: Option<GeneratedLesson>,
    request: RequestState,
}

impl TutorStore {
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn current_session(&self) -> Option<&ChatSession> {
        self.current_session.as_ref()
    }

    /// The visible transcript
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn generated_lesson(&self) -> Option<&GeneratedLesson> {
        self.generated_lesson.as_ref()
    }

    pub fn loading(&self) -> bool {
        self.request.loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.request.error()
    }

    pub fn clear_error(&mut self) {
        self.request.clear_error();
    }

    /// Switch the transcript to another session (or none)
    pub fn set_current_session(&mut self, session: Option<ChatSession>) {
        self.messages = session.as_ref().map(|s| s.messages.clone()).unwrap_or_default();
        self.current_session = session;
    }

    /// Mark any tutor request as dispatched
    pub fn request_pending(&mut self) {
        self.request.begin();
    }

    pub fn resolve_sessions(&mut self, result: Result<Vec<ChatSession>, ApiError>) {
        if let Some(sessions) = self.request.settle(result, SESSIONS_FAILED) {
            self.sessions = sessions;
        }
    }

    /// The new session goes first in the list and becomes the active one
    pub fn resolve_create_session(&mut self, result: Result<ChatSession, ApiError>) {
        if let Some(session) = self.request.settle(result, CREATE_FAILED) {
            tracing::info!("Opened chat session {}", session.id);
            self.sessions.insert(0, session.clone());
            self.set_current_session(Some(session));
        }
    }

    /// Append the echoed question and the reply, in that order
    pub fn resolve_send_message(&mut self, result: Result<MessageExchange, ApiError>) {
        if let Some(exchange) = self.request.settle(result, SEND_FAILED) {
            self.messages.push(exchange.user_message);
            self.messages.push(exchange.ai_response);
        }
    }

    pub fn resolve_generate_lesson(&mut self, result: Result<GeneratedLesson, ApiError>) {
        if let Some(lesson) = self.request.settle(result, GENERATE_FAILED) {
            self.generated_lesson = Some(lesson);
        }
    }

    pub async fn fetch_chat_sessions(&mut self, client: &TutorClient) {
        self.request_pending();
        let result = client.chat_sessions().await;
        self.resolve_sessions(result);
    }

    pub async fn create_chat_session(&mut self, client: &TutorClient, meta: &NewChatSession) {
        self.request_pending();
        let result = client.create_chat_session(meta).await;
        self.resolve_create_session(result);
    }

    pub async fn send_message(&mut self, client: &TutorClient, session_id: &str, text: &str) {
        self.request_pending();
        let result = client.send_message(session_id, text).await;
        self.resolve_send_message(result);
    }

    pub async fn generate_lesson(&mut self, client: &TutorClient, request: &GenerateLessonRequest) {
        self.request_pending();
        let result = client.generate_lesson(request).await;
        self.resolve_generate_lesson(result);
    }
}
