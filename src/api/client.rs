//! HTTP client for the tutor backend

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::models::{
    AuthPayload, ChatSession, Course, CourseFilters, Credentials, Enrollment, Envelope,
    GenerateLessonRequest, GeneratedLesson, MessageExchange, NewChatSession, RegisterRequest,
    SendMessageRequest, StudentDashboard, TeacherDashboard, User,
};

/// Tutor API client
///
/// Cheap to clone: the underlying connection pool is shared, so each spawned
/// request gets its own copy carrying the token that was current at dispatch.
#[derive(Debug, Clone)]
pub struct TutorClient {
    /// HTTP client
    client: Client,
    /// API root, e.g. `http://localhost:8000/api`
    base_url: Url,
    /// Bearer token for authenticated endpoints
    token: Option<String>,
}

impl TutorClient {
    /// Default API root of a local backend
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000/api";
    /// Default request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a client for the given API root
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Self::DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{} ({})", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(raw));
        }
        Ok(Self { client, base_url, token: None })
    }

    /// The API root this client talks to
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Current bearer token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the bearer token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Builder-style token setter
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Endpoint URL under the API root, with a trailing slash
    ///
    /// Each segment is percent-encoded, so ids cannot smuggle in `/` or `?`.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments)
            .push("");
        Ok(url)
    }

    fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::NotAuthenticated)?;
        Ok(req.bearer_auth(token))
    }

    /// Send a request and unwrap the `data` field of the envelope
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let response = req.send().await?;
        read_envelope(response).await
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        tracing::debug!("GET {}", url);
        let req = self.authorize(self.client.get(url))?;
        self.send(req).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: Option<&B>,
        authenticated: bool,
    ) -> Result<T, ApiError> {
        let url = self.url(segments)?;
        tracing::debug!("POST {}", url);
        let mut req = self.client.post(url);
        if authenticated {
            req = self.authorize(req)?;
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(req).await
    }

    // -- auth ---------------------------------------------------------------

    /// Exchange credentials for a user and token pair
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError> {
        self.post(&["auth", "login"], Some(credentials), false).await
    }

    /// Create an account; signs the new user in
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthPayload, ApiError> {
        self.post(&["auth", "register"], Some(request), false).await
    }

    /// Current user's profile
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get(&["auth", "profile"]).await
    }

    // -- courses ------------------------------------------------------------

    /// Course catalog; `filters` are sent as query parameters untouched
    pub async fn courses(&self, filters: &CourseFilters) -> Result<Vec<Course>, ApiError> {
        tracing::debug!("GET courses/ {:?}", filters);
        let req = self.authorize(self.client.get(self.url(&["courses"])?).query(filters))?;
        self.send(req).await
    }

    /// A single course with its lessons
    pub async fn course(&self, course_id: &str) -> Result<Course, ApiError> {
        self.get(&["courses", course_id]).await
    }

    /// Enroll the current user in a course
    pub async fn enroll(&self, course_id: &str) -> Result<Enrollment, ApiError> {
        self.post::<(), _>(&["courses", course_id, "enroll"], None, true).await
    }

    /// The current user's enrollments
    pub async fn my_enrollments(&self) -> Result<Vec<Enrollment>, ApiError> {
        self.get(&["courses", "my-enrollments"]).await
    }

    // -- ai tutor -----------------------------------------------------------

    /// The current user's chat sessions
    pub async fn chat_sessions(&self) -> Result<Vec<ChatSession>, ApiError> {
        self.get(&["ai-tutor", "chat"]).await
    }

    /// Open a new chat session
    pub async fn create_chat_session(&self, meta: &NewChatSession) -> Result<ChatSession, ApiError> {
        self.post(&["ai-tutor", "chat"], Some(meta), true).await
    }

    /// Send a message and wait for the tutor's reply
    pub async fn send_message(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<MessageExchange, ApiError> {
        let body = SendMessageRequest { message: message.to_string() };
        self.post(&["ai-tutor", "chat", session_id, "message"], Some(&body), true).await
    }

    /// Ask the backend to generate lesson content
    pub async fn generate_lesson(
        &self,
        request: &GenerateLessonRequest,
    ) -> Result<GeneratedLesson, ApiError> {
        self.post(&["ai-tutor", "generate", "lesson"], Some(request), true).await
    }

    // -- analytics ----------------------------------------------------------

    /// Student analytics dashboard
    pub async fn student_dashboard(&self) -> Result<StudentDashboard, ApiError> {
        self.get(&["analytics", "dashboard", "student"]).await
    }

    /// Teacher analytics dashboard
    pub async fn teacher_dashboard(&self) -> Result<TeacherDashboard, ApiError> {
        self.get(&["analytics", "dashboard", "teacher"]).await
    }
}

/// Decode an envelope, mapping failures to [`ApiError`]
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|env| env.error)
            .map(|err| err.message().to_string());
        return Err(match message {
            Some(message) => ApiError::ServerError { status: status.as_u16(), message },
            None => ApiError::StatusError(status.as_u16()),
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(&body)?;
    match (envelope.data, envelope.error) {
        (Some(data), _) => Ok(data),
        (None, Some(err)) => {
            Err(ApiError::ServerError { status: status.as_u16(), message: err.message().to_string() })
        }
        (None, None) => Err(ApiError::MissingData),
    }
}
