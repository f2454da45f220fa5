//! Authentication container

use super::RequestState;
use crate::api::{ApiError, AuthPayload, Credentials, RegisterRequest, Role, Tokens, TutorClient, User};

const LOGIN_FAILED: &str = "Login failed";
const REGISTER_FAILED: &str = "Registration failed";
const PROFILE_FAILED: &str = "Failed to load profile";

/// Identifies which sign-in generation an auth request belongs to
///
/// Logging out starts a new generation, so results of requests issued before
/// the logout are discarded when they arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Signed-in user and tokens
#[derive(Debug, Default)]
pub struct AuthStore {
    user: Option<User>,
    tokens: Option<Tokens>,
    request: RequestState,
    epoch: u64,
}

impl AuthStore {
    /// The signed-in user
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Current token pair
    pub fn tokens(&self) -> Option<&Tokens> {
        self.tokens.as_ref()
    }

    /// Bearer token for API calls
    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access.as_str())
    }

    /// Whether protected screens may be shown
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.tokens.is_some()
    }

    /// Role of the signed-in user
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
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

    /// Seed an authenticated state from a persisted session
    pub fn restore(&mut self, user: User, tokens: Tokens) {
        self.user = Some(user);
        self.tokens = Some(tokens);
    }

    /// Clear the session; pending auth requests are invalidated
    pub fn logout(&mut self) {
        self.user = None;
        self.tokens = None;
        self.request = RequestState::default();
        self.epoch += 1;
    }

    /// Generation of the current session
    pub fn ticket(&self) -> Ticket {
        Ticket(self.epoch)
    }

    /// Mark an auth request (login, register, profile) as dispatched
    pub fn request_pending(&mut self) -> Ticket {
        self.request.begin();
        self.ticket()
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        if ticket.0 != self.epoch {
            tracing::debug!("Dropping auth result from a previous session");
            return false;
        }
        true
    }

    fn apply_sign_in(&mut self, ticket: Ticket, result: Result<AuthPayload, ApiError>, fallback: &str) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match self.request.settle(result, fallback) {
            Some(payload) => {
                tracing::info!("Signed in as {} ({})", payload.user.email, payload.user.role);
                self.user = Some(payload.user);
                self.tokens = Some(payload.tokens);
                true
            }
            None => false,
        }
    }

    /// Apply a login result; returns whether the user is now signed in
    pub fn resolve_login(&mut self, ticket: Ticket, result: Result<AuthPayload, ApiError>) -> bool {
        self.apply_sign_in(ticket, result, LOGIN_FAILED)
    }

    /// Apply a registration result; returns whether the user is now signed in
    pub fn resolve_register(&mut self, ticket: Ticket, result: Result<AuthPayload, ApiError>) -> bool {
        self.apply_sign_in(ticket, result, REGISTER_FAILED)
    }

    /// Apply a profile refresh
    pub fn resolve_profile(&mut self, ticket: Ticket, result: Result<User, ApiError>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match self.request.settle(result, PROFILE_FAILED) {
            Some(user) => {
                self.user = Some(user);
                true
            }
            None => false,
        }
    }

    /// Log in and wait for the result
    pub async fn login(&mut self, client: &TutorClient, credentials: &Credentials) -> bool {
        let ticket = self.request_pending();
        let result = client.login(credentials).await;
        self.resolve_login(ticket, result)
    }

    /// Register and wait for the result
    pub async fn register(&mut self, client: &TutorClient, request: &RegisterRequest) -> bool {
        let ticket = self.request_pending();
        let result = client.register(request).await;
        self.resolve_register(ticket, result)
    }

    /// Reload the profile of the signed-in user
    pub async fn fetch_profile(&mut self, client: &TutorClient) -> bool {
        let ticket = self.request_pending();
        let result = client.profile().await;
        self.resolve_profile(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user(role: Role) -> User {
        serde_json::from_value(json!({
            "id": "u1", "email": "sam@example.com", "full_name": "Sam", "role": role.as_str()
        }))
        .unwrap()
    }

    fn payload(role: Role) -> AuthPayload {
        AuthPayload {
            user: user(role),
            tokens: Tokens { access: "a.b.c".into(), refresh: "r.r.r".into() },
        }
    }

    #[test]
    fn successful_login_authenticates() {
        let mut auth = AuthStore::default();
        let ticket = auth.request_pending();
        assert!(auth.loading());

        assert!(auth.resolve_login(ticket, Ok(payload(Role::Teacher))));
        assert!(auth.is_authenticated());
        assert!(!auth.loading());
        assert_eq!(auth.role(), Some(Role::Teacher));
        assert_eq!(auth.access_token(), Some("a.b.c"));
    }

    #[test]
    fn failed_login_stores_message_and_stays_signed_out() {
        let mut auth = AuthStore::default();
        let ticket = auth.request_pending();
        let err = ApiError::ServerError { status: 401, message: "Invalid credentials".into() };

        assert!(!auth.resolve_login(ticket, Err(err)));
        assert!(!auth.is_authenticated());
        assert!(!auth.loading());
        assert_eq!(auth.error(), Some("Invalid credentials"));
    }

    #[test]
    fn failed_register_uses_fallback_message() {
        let mut auth = AuthStore::default();
        let ticket = auth.request_pending();
        auth.resolve_register(ticket, Err(ApiError::StatusError(500)));
        assert_eq!(auth.error(), Some("Registration failed"));
    }

    #[test]
    fn logout_clears_user_synchronously() {
        let mut auth = AuthStore::default();
        auth.restore(user(Role::Student), payload(Role::Student).tokens);
        assert!(auth.is_authenticated());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert!(auth.tokens().is_none());
    }

    #[test]
    fn logout_discards_pending_login() {
        let mut auth = AuthStore::default();
        let ticket = auth.request_pending();
        auth.logout();
        assert!(!auth.loading());

        assert!(!auth.resolve_login(ticket, Ok(payload(Role::Student))));
        assert!(!auth.is_authenticated());
        assert!(!auth.loading());
    }

    #[test]
    fn clear_error_dismisses_message() {
        let mut auth = AuthStore::default();
        let ticket = auth.request_pending();
        auth.resolve_login(ticket, Err(ApiError::MissingData));
        assert!(auth.error().is_some());
        auth.clear_error();
        assert!(auth.error().is_none());
    }

    #[tokio::test]
    async fn login_against_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "user": {"id": "u1", "email": "sam@example.com", "full_name": "Sam", "role": "student"},
                    "tokens": {"access": "a.b.c", "refresh": "r.r.r"}
                }
            })))
            .mount(&server)
            .await;

        let client = TutorClient::new(server.uri()).unwrap();
        let mut auth = AuthStore::default();
        let creds = Credentials { email: "sam@example.com".into(), password: "secret".into() };
        assert!(auth.login(&client, &creds).await);
        assert_eq!(auth.user().map(|u| u.display_name()), Some("Sam"));
    }
}
