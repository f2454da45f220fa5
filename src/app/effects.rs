//! Request dispatch
//!
//! Screens never await the network. They queue a [`Request`]; the
//! [`Dispatcher`] runs it on a spawned task and the matching [`Outcome`]
//! comes back over a channel that the event loop drains every tick.

use std::future::Future;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_util::sync::CancellationToken;

use crate::api::models::{GenerateLessonRequest, GeneratedLesson, MessageExchange};
use crate::api::{
    ApiError, AuthPayload, ChatSession, Course, CourseFilters, Credentials, Enrollment,
    NewChatSession, RegisterRequest, StudentDashboard, TeacherDashboard, TutorClient, User,
};
use crate::store::Ticket;

/// Work queued by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Login(Ticket, Credentials),
    Register(Ticket, RegisterRequest),
    Profile(Ticket),
    Courses(CourseFilters),
    CourseDetail(String),
    Enroll(String),
    MyEnrollments,
    ChatSessions,
    CreateChatSession(NewChatSession),
    SendMessage { session_id: String, text: String },
    GenerateLesson(GenerateLessonRequest),
    StudentDashboard,
    TeacherDashboard,
    /// Abort the in-flight chat message, if any
    CancelChat,
}

/// Settled result of a [`Request`]
#[derive(Debug)]
pub enum Outcome {
    Login(Ticket, Result<AuthPayload, ApiError>),
    Register(Ticket, Result<AuthPayload, ApiError>),
    Profile(Ticket, Result<User, ApiError>),
    Courses(Result<Vec<Course>, ApiError>),
    CourseDetail(Result<Course, ApiError>),
    Enroll(Result<Enrollment, ApiError>),
    MyEnrollments(Result<Vec<Enrollment>, ApiError>),
    ChatSessions(Result<Vec<ChatSession>, ApiError>),
    CreateChatSession(Result<ChatSession, ApiError>),
    SendMessage(Result<MessageExchange, ApiError>),
    GenerateLesson(Result<GeneratedLesson, ApiError>),
    StudentDashboard(Result<StudentDashboard, ApiError>),
    TeacherDashboard(Result<TeacherDashboard, ApiError>),
}

impl Outcome {
    /// The error carried by a rejected outcome
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Outcome::Login(_, r) | Outcome::Register(_, r) => r.as_ref().err(),
            Outcome::Profile(_, r) => r.as_ref().err(),
            Outcome::Courses(r) => r.as_ref().err(),
            Outcome::CourseDetail(r) => r.as_ref().err(),
            Outcome::Enroll(r) => r.as_ref().err(),
            Outcome::MyEnrollments(r) => r.as_ref().err(),
            Outcome::ChatSessions(r) => r.as_ref().err(),
            Outcome::CreateChatSession(r) => r.as_ref().err(),
            Outcome::SendMessage(r) => r.as_ref().err(),
            Outcome::GenerateLesson(r) => r.as_ref().err(),
            Outcome::StudentDashboard(r) => r.as_ref().err(),
            Outcome::TeacherDashboard(r) => r.as_ref().err(),
        }
    }

    /// Whether this outcome belongs to a sign-in attempt
    pub fn is_sign_in(&self) -> bool {
        matches!(self, Outcome::Login(..) | Outcome::Register(..))
    }
}

/// Race a request against a cancellation token
async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(ApiError::Cancelled),
        result = fut => result,
    }
}

/// Run one request to completion
///
/// `cancel` only affects chat messages; other requests run to completion.
pub async fn execute(client: &TutorClient, request: Request, cancel: CancellationToken) -> Option<Outcome> {
    let outcome = match request {
        Request::Login(ticket, creds) => Outcome::Login(ticket, client.login(&creds).await),
        Request::Register(ticket, req) => Outcome::Register(ticket, client.register(&req).await),
        Request::Profile(ticket) => Outcome::Profile(ticket, client.profile().await),
        Request::Courses(filters) => Outcome::Courses(client.courses(&filters).await),
        Request::CourseDetail(id) => Outcome::CourseDetail(client.course(&id).await),
        Request::Enroll(id) => Outcome::Enroll(client.enroll(&id).await),
        Request::MyEnrollments => Outcome::MyEnrollments(client.my_enrollments().await),
        Request::ChatSessions => Outcome::ChatSessions(client.chat_sessions().await),
        Request::CreateChatSession(meta) => {
            Outcome::CreateChatSession(client.create_chat_session(&meta).await)
        }
        Request::SendMessage { session_id, text } => Outcome::SendMessage(
            cancellable(&cancel, client.send_message(&session_id, &text)).await,
        ),
        Request::GenerateLesson(req) => Outcome::GenerateLesson(client.generate_lesson(&req).await),
        Request::StudentDashboard => Outcome::StudentDashboard(client.student_dashboard().await),
        Request::TeacherDashboard => Outcome::TeacherDashboard(client.teacher_dashboard().await),
        Request::CancelChat => return None,
    };
    Some(outcome)
}

/// Spawns requests and collects their outcomes
///
/// Outcomes come back paired with the [`Ticket`] of the session that issued
/// them, so results arriving after a logout can be told apart.
pub struct Dispatcher {
    client: TutorClient,
    tx: UnboundedSender<(Ticket, Outcome)>,
    rx: UnboundedReceiver<(Ticket, Outcome)>,
    chat_cancel: Option<CancellationToken>,
}

impl Dispatcher {
    pub fn new(client: TutorClient) -> Self {
        let (tx, rx) = unbounded_channel();
        Self { client, tx, rx, chat_cancel: None }
    }

    /// Start a request with the given bearer token on behalf of `ticket`
    pub fn dispatch(&mut self, ticket: Ticket, request: Request, token: Option<&str>) {
        if request == Request::CancelChat {
            if let Some(cancel) = self.chat_cancel.take() {
                tracing::info!("Cancelling chat message");
                cancel.cancel();
            }
            return;
        }

        let cancel = CancellationToken::new();
        if matches!(request, Request::SendMessage { .. }) {
            self.chat_cancel = Some(cancel.clone());
        }

        let mut client = self.client.clone();
        client.set_token(token.map(str::to_string));
        let tx = self.tx.clone();
        tracing::debug!("Dispatching {:?}", request);
        tokio::spawn(async move {
            if let Some(outcome) = execute(&client, request, cancel).await {
                // The receiver only goes away on shutdown
                let _ = tx.send((ticket, outcome));
            }
        });
    }

    /// Outcomes that have arrived since the last call
    pub fn drain(&mut self) -> Vec<(Ticket, Outcome)> {
        let mut outcomes = Vec::new();
        while let Ok((ticket, outcome)) = self.rx.try_recv() {
            if matches!(outcome, Outcome::SendMessage(_)) {
                self.chat_cancel = None;
            }
            outcomes.push((ticket, outcome));
        }
        outcomes
    }

    /// Wait for the next outcome
    pub async fn next(&mut self) -> Option<(Ticket, Outcome)> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AuthStore;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn dispatched_request_comes_back_as_outcome() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/courses/my-enrollments/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
            )
            .mount(&server)
            .await;

        let ticket = AuthStore::default().ticket();
        let mut dispatcher = Dispatcher::new(TutorClient::new(server.uri()).unwrap());
        dispatcher.dispatch(ticket, Request::MyEnrollments, Some("tok"));
        let (returned, outcome) = dispatcher.next().await.unwrap();
        assert_eq!(returned, ticket);
        assert!(matches!(outcome, Outcome::MyEnrollments(Ok(ref list)) if list.is_empty()));
    }

    #[tokio::test]
    async fn chat_message_can_be_cancelled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ai-tutor/chat/s1/message/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(10))
                    .set_body_json(json!({"success": true, "data": {}})),
            )
            .mount(&server)
            .await;

        let ticket = AuthStore::default().ticket();
        let mut dispatcher = Dispatcher::new(TutorClient::new(server.uri()).unwrap());
        dispatcher.dispatch(
            ticket,
            Request::SendMessage { session_id: "s1".into(), text: "hi".into() },
            Some("tok"),
        );
        dispatcher.dispatch(ticket, Request::CancelChat, None);

        let (_, outcome) = tokio::time::timeout(Duration::from_secs(5), dispatcher.next())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(outcome, Outcome::SendMessage(Err(ApiError::Cancelled))));
    }

    #[tokio::test]
    async fn missing_token_is_reported_not_panicked() {
        let dispatcher_client = TutorClient::new("http://127.0.0.1:9").unwrap();
        let mut dispatcher = Dispatcher::new(dispatcher_client);
        dispatcher.dispatch(AuthStore::default().ticket(), Request::StudentDashboard, None);
        let (_, outcome) = dispatcher.next().await.unwrap();
        assert!(matches!(outcome.error(), Some(ApiError::NotAuthenticated)));
    }
}
