//! Analytics dashboard container

use super::RequestState;
use crate::api::{ApiError, StudentDashboard, TeacherDashboard, TutorClient};

const DASHBOARD_FAILED: &str = "Failed to load dashboard";

/// Role-specific dashboard data
#[derive(Debug, Default)]
pub struct DashboardStore {
    student: Option<StudentDashboard>,
    teacher: Option<TeacherDashboard>,
    request: RequestState,
}

impl DashboardStore {
    pub fn student(&self) -> Option<&StudentDashboard> {
        self.student.as_ref()
    }

    pub fn teacher(&self) -> Option<&TeacherDashboard> {
        self.teacher.as_ref()
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

    pub fn request_pending(&mut self) {
        self.request.begin();
    }

    pub fn resolve_student(&mut self, result: Result<StudentDashboard, ApiError>) {
        if let Some(dashboard) = self.request.settle(result, DASHBOARD_FAILED) {
            self.student = Some(dashboard);
        }
    }

    pub fn resolve_teacher(&mut self, result: Result<TeacherDashboard, ApiError>) {
        if let Some(dashboard) = self.request.settle(result, DASHBOARD_FAILED) {
            self.teacher = Some(dashboard);
        }
    }

    pub async fn fetch_student_dashboard(&mut self, client: &TutorClient) {
        self.request_pending();
        let result = client.student_dashboard().await;
        self.resolve_student(result);
    }

    pub async fn fetch_teacher_dashboard(&mut self, client: &TutorClient) {
        self.request_pending();
        let result = client.teacher_dashboard().await;
        self.resolve_teacher(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn failure_keeps_previous_dashboard() {
        let mut store = DashboardStore::default();
        store.request_pending();
        store.resolve_student(Ok(StudentDashboard::default()));
        store.request_pending();
        store.resolve_student(Err(ApiError::StatusError(500)));

        assert!(store.student().is_some());
        assert_eq!(store.error(), Some("Failed to load dashboard"));
    }

    #[tokio::test]
    async fn teacher_dashboard_forbidden_for_students() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analytics/dashboard/teacher/"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"error": "Only teachers can access this endpoint"})),
            )
            .mount(&server)
            .await;

        let client = TutorClient::new(server.uri()).unwrap().with_token("tok");
        let mut store = DashboardStore::default();
        store.fetch_teacher_dashboard(&client).await;
        assert!(store.teacher().is_none());
        assert_eq!(store.error(), Some("Only teachers can access this endpoint"));
    }

    #[tokio::test]
    async fn student_dashboard_against_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analytics/dashboard/student/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "user_info": {"name": "Sam", "email": "sam@example.com", "learning_style": "visual"},
                    "analytics": {"total_study_time": 90, "current_streak": 3, "courses_enrolled": 2,
                                  "courses_completed": 1, "average_quiz_score": 87.6},
                    "enrollments": {"total": 2, "active": 1, "completed": 1},
                    "recent_quizzes": [{"quiz_title": "Loops", "score": 92.0, "passed": true}]
                }
            })))
            .mount(&server)
            .await;

        let client = TutorClient::new(server.uri()).unwrap().with_token("tok");
        let mut store = DashboardStore::default();
        store.fetch_student_dashboard(&client).await;
        let dash = store.student().unwrap();
        assert_eq!(dash.analytics.current_streak, 3);
        assert_eq!(dash.recent_quizzes[0].quiz_title, "Loops");
        assert!(!store.loading());
    }
}
