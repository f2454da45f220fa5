//! View-state containers
//!
//! Each container mirrors the latest server response for one area of the
//! app. Operations are split into a `*_pending` step, taken when a request is
//! dispatched, and a `resolve_*` step that applies the fulfilled or rejected
//! result. The `async` helpers run both steps around a client call for
//! callers that can simply await.

pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod tutor;

pub use auth::{AuthStore, Ticket};
pub use courses::CoursesStore;
pub use dashboard::DashboardStore;
pub use tutor::TutorStore;

use crate::api::ApiError;

/// Loading and error bookkeeping shared by all containers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    /// Requests dispatched but not yet settled
    in_flight: usize,
    /// Message of the most recent failure
    error: Option<String>,
}

impl RequestState {
    /// A request was dispatched; any previous error is cleared
    pub fn begin(&mut self) {
        self.in_flight += 1;
        self.error = None;
    }

    /// True while at least one request is outstanding
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Message of the most recent failure
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Dismiss the current error
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Settle one request, recording a failure message if it was rejected
    ///
    /// Returns the payload of a fulfilled request. A cancelled request settles
    /// without recording an error.
    pub fn settle<T>(&mut self, result: Result<T, ApiError>, fallback: &str) -> Option<T> {
        self.finish();
        match result {
            Ok(value) => Some(value),
            Err(ApiError::Cancelled) => {
                tracing::debug!("{}: cancelled", fallback);
                None
            }
            Err(e) => {
                tracing::warn!("{}: {}", fallback, e);
                self.error = Some(e.message_or(fallback));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let mut state = RequestState { in_flight: 0, error: Some("old".into()) };
        state.begin();
        assert!(state.loading());
        assert!(state.error().is_none());
    }

    #[test]
    fn overlapping_requests_keep_loading_until_all_settle() {
        let mut state = RequestState::default();
        state.begin();
        state.begin();
        assert_eq!(state.settle(Ok(1), "x"), Some(1));
        assert!(state.loading());
        assert_eq!(state.settle(Ok(2), "x"), Some(2));
        assert!(!state.loading());
    }

    #[test]
    fn rejection_records_fallback_or_server_message() {
        let mut state = RequestState::default();
        state.begin();
        let out: Option<()> = state.settle(Err(ApiError::StatusError(500)), "Failed to fetch");
        assert!(out.is_none());
        assert_eq!(state.error(), Some("Failed to fetch"));

        state.begin();
        let _: Option<()> = state.settle(
            Err(ApiError::ServerError { status: 400, message: "Bad filter".into() }),
            "Failed to fetch",
        );
        assert_eq!(state.error(), Some("Bad filter"));
        assert!(!state.loading());
    }

    #[test]
    fn cancellation_settles_without_error() {
        let mut state = RequestState::default();
        state.begin();
        let _: Option<()> = state.settle(Err(ApiError::Cancelled), "Failed to send message");
        assert!(!state.loading());
        assert!(state.error().is_none());
    }

    #[test]
    fn settle_never_underflows() {
        let mut state = RequestState::default();
        let _ = state.settle(Ok(()), "x");
        assert!(!state.loading());
    }
}
