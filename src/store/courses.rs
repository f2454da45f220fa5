//! Course catalog container
//!
//! The list, the current detail and the enrollments are independent slots:
//! enrolling does not touch the catalog entries, and refreshing the detail
//! does not update the list copy of the same course.

use super::RequestState;
use crate::api::{ApiError, Course, CourseFilters, Enrollment, TutorClient};

const COURSES_FAILED: &str = "Failed to fetch courses";
const COURSE_FAILED: &str = "Failed to fetch course";
const ENROLL_FAILED: &str = "Enrollment failed";
const ENROLLMENTS_FAILED: &str = "Failed to fetch enrollments";

/// Courses, current course detail and the user's enrollments
#[derive(Debug, Default)]
pub struct CoursesStore {
    courses: Vec<Course>,
    current_course: Option<Course>,
    enrollments: Vec<Enrollment>,
    request: RequestState,
}

impl CoursesStore {
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn current_course(&self) -> Option<&Course> {
        self.current_course.as_ref()
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    /// Whether the local enrollment list contains the course
    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrollments.iter().any(|e| e.course.id() == course_id)
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

    /// Mark any course request as dispatched
    pub fn request_pending(&mut self) {
        self.request.begin();
    }

    /// Replace the catalog with the response
    pub fn resolve_courses(&mut self, result: Result<Vec<Course>, ApiError>) {
        if let Some(courses) = self.request.settle(result, COURSES_FAILED) {
            self.courses = courses;
        }
    }

    /// Replace the current course slot
    pub fn resolve_course_detail(&mut self, result: Result<Course, ApiError>) {
        if let Some(course) = self.request.settle(result, COURSE_FAILED) {
            self.current_course = Some(course);
        }
    }

    /// Append a new enrollment
    pub fn resolve_enroll(&mut self, result: Result<Enrollment, ApiError>) {
        if let Some(enrollment) = self.request.settle(result, ENROLL_FAILED) {
            tracing::info!("Enrolled in course {}", enrollment.course.id());
            self.enrollments.push(enrollment);
        }
    }

    /// Replace the enrollment list
    pub fn resolve_enrollments(&mut self, result: Result<Vec<Enrollment>, ApiError>) {
        if let Some(enrollments) = self.request.settle(result, ENROLLMENTS_FAILED) {
            self.enrollments = enrollments;
        }
    }

    pub async fn fetch_courses(&mut self, client: &TutorClient, filters: &CourseFilters) {
        self.request_pending();
        let result = client.courses(filters).await;
        self.resolve_courses(result);
    }

    pub async fn fetch_course_detail(&mut self, client: &TutorClient, course_id: &str) {
        self.request_pending();
        let result = client.course(course_id).await;
        self.resolve_course_detail(result);
    }

    pub async fn enroll_course(&mut self, client: &TutorClient, course_id: &str) {
        self.request_pending();
        let result = client.enroll(course_id).await;
        self.resolve_enroll(result);
    }

    pub async fn fetch_my_enrollments(&mut self, client: &TutorClient) {
        self.request_pending();
        let result = client.my_enrollments().await;
        self.resolve_enrollments(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::CourseRef;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn course(id: &str, title: &str) -> Course {
        Course { id: id.into(), title: title.into(), ..Default::default() }
    }

    fn enrollment(course_id: &str) -> Enrollment {
        Enrollment {
            id: format!("e-{}", course_id),
            course: CourseRef::Id(course_id.into()),
            status: Some("active".into()),
            progress_percentage: 0.0,
            enrolled_at: None,
        }
    }

    #[test]
    fn fetched_list_equals_payload() {
        let mut store = CoursesStore::default();
        let payload = vec![course("1", "A"), course("2", "B")];
        store.request_pending();
        store.resolve_courses(Ok(payload.clone()));
        assert_eq!(store.courses(), payload.as_slice());
        assert!(!store.loading());
    }

    #[test]
    fn failed_fetch_keeps_previous_list() {
        let mut store = CoursesStore::default();
        store.request_pending();
        store.resolve_courses(Ok(vec![course("1", "A")]));

        store.request_pending();
        store.resolve_courses(Err(ApiError::StatusError(500)));
        assert_eq!(store.courses().len(), 1);
        assert_eq!(store.error(), Some("Failed to fetch courses"));
        assert!(!store.loading());
    }

    #[test]
    fn detail_is_independent_of_list() {
        let mut store = CoursesStore::default();
        store.request_pending();
        store.resolve_courses(Ok(vec![course("1", "Old title")]));
        store.request_pending();
        store.resolve_course_detail(Ok(course("1", "New title")));

        assert_eq!(store.courses()[0].title, "Old title");
        assert_eq!(store.current_course().map(|c| c.title.as_str()), Some("New title"));
    }

    #[test]
    fn enroll_appends_without_touching_catalog() {
        let mut store = CoursesStore::default();
        store.request_pending();
        store.resolve_courses(Ok(vec![course("1", "A")]));
        store.request_pending();
        store.resolve_enroll(Ok(enrollment("1")));

        assert!(store.is_enrolled("1"));
        assert!(!store.is_enrolled("2"));
        assert_eq!(store.courses(), [course("1", "A")].as_slice());
    }

    #[test]
    fn failed_enroll_reports_fallback() {
        let mut store = CoursesStore::default();
        store.request_pending();
        store.resolve_enroll(Err(ApiError::StatusError(500)));
        assert_eq!(store.error(), Some("Enrollment failed"));
        assert!(store.enrollments().is_empty());
    }

    #[test]
    fn enrollments_fetch_replaces_local_list() {
        let mut store = CoursesStore::default();
        store.request_pending();
        store.resolve_enroll(Ok(enrollment("1")));
        store.request_pending();
        store.resolve_enrollments(Ok(vec![enrollment("2"), enrollment("3")]));
        assert!(!store.is_enrolled("1"));
        assert_eq!(store.enrollments().len(), 2);
    }

    #[tokio::test]
    async fn fetch_courses_against_backend() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/courses/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    {"id": 1, "title": "A", "difficulty": "beginner"},
                    {"id": 2, "title": "B", "difficulty": "advanced"}
                ]
            })))
            .mount(&server)
            .await;

        let client = TutorClient::new(server.uri()).unwrap().with_token("tok");
        let mut store = CoursesStore::default();
        store.fetch_courses(&client, &CourseFilters::new()).await;
        assert_eq!(store.courses().len(), 2);
        assert_eq!(store.courses()[1].difficulty, "advanced");
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn enroll_error_envelope_against_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/courses/c1/enroll/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "error": {"message": "Already enrolled in this course"}
            })))
            .mount(&server)
            .await;

        let client = TutorClient::new(server.uri()).unwrap().with_token("tok");
        let mut store = CoursesStore::default();
        store.enroll_course(&client, "c1").await;
        assert_eq!(store.error(), Some("Already enrolled in this course"));
        assert!(!store.loading());
    }
}
