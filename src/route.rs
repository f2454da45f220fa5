//! Navigation paths and the authorization gate

use std::fmt;

use crate::api::Role;

/// A navigable path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    Landing,
    Login,
    Register,
    Dashboard,
    Courses,
    CourseDetail(String),
    AiTutor,
    Quiz(String),
    Profile,
}

impl Route {
    /// Parse a path such as `/courses/42`; unknown paths yield `None`
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> =
            trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Self::Landing),
            ["login"] => Some(Self::Login),
            ["register"] => Some(Self::Register),
            ["dashboard"] => Some(Self::Dashboard),
            ["courses"] => Some(Self::Courses),
            ["courses", id] => Some(Self::CourseDetail((*id).to_string())),
            ["ai-tutor"] => Some(Self::AiTutor),
            ["quiz", id] => Some(Self::Quiz((*id).to_string())),
            ["profile"] => Some(Self::Profile),
            _ => None,
        }
    }

    /// Canonical path
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Courses => "/courses".to_string(),
            Self::CourseDetail(id) => format!("/courses/{}", id),
            Self::AiTutor => "/ai-tutor".to_string(),
            Self::Quiz(id) => format!("/quiz/{}", id),
            Self::Profile => "/profile".to_string(),
        }
    }

    /// Whether the route requires a signed-in user
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Landing | Self::Login | Self::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What is actually rendered for a permitted route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Landing,
    Login,
    Register,
    StudentDashboard,
    TeacherDashboard,
    Courses,
    CourseDetail(String),
    AiTutor,
    Quiz(String),
    Profile,
}

/// Outcome of checking a route against the signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Render(Screen),
    Redirect(Route),
}

/// Decide what to show for `route`; `role` is `Some` when authenticated
pub fn guard(route: &Route, role: Option<Role>) -> Guard {
    match (route, role) {
        (route, None) if route.is_protected() => Guard::Redirect(Route::Login),
        (Route::Landing | Route::Login | Route::Register, Some(_)) => {
            Guard::Redirect(Route::Dashboard)
        }
        (Route::Landing, None) => Guard::Render(Screen::Landing),
        (Route::Login, None) => Guard::Render(Screen::Login),
        (Route::Register, None) => Guard::Render(Screen::Register),
        (Route::Dashboard, Some(Role::Teacher)) => Guard::Render(Screen::TeacherDashboard),
        (Route::Dashboard, Some(_)) => Guard::Render(Screen::StudentDashboard),
        (Route::Courses, Some(_)) => Guard::Render(Screen::Courses),
        (Route::CourseDetail(id), Some(_)) => Guard::Render(Screen::CourseDetail(id.clone())),
        (Route::AiTutor, Some(_)) => Guard::Render(Screen::AiTutor),
        (Route::Quiz(id), Some(_)) => Guard::Render(Screen::Quiz(id.clone())),
        (Route::Profile, Some(_)) => Guard::Render(Screen::Profile),
        // Covered by the first arm
        (_, None) => Guard::Redirect(Route::Login),
    }
}

/// Follow redirects until a screen is reached
///
/// Returns the route that ends up in the location bar together with its screen.
pub fn resolve(route: Route, role: Option<Role>) -> (Route, Screen) {
    let mut current = route;
    // Redirect targets always render, so this stops after one hop
    for _ in 0..4 {
        match guard(&current, role) {
            Guard::Render(screen) => return (current, screen),
            Guard::Redirect(next) => {
                tracing::debug!("Redirecting {} -> {}", current, next);
                current = next;
            }
        }
    }
    tracing::warn!("Redirect loop at {}, falling back to landing", current);
    (Route::Landing, Screen::Landing)
}

/// Data a screen requests when it becomes visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountEffect {
    FetchCourses,
    FetchMyEnrollments,
    FetchCourseDetail(String),
    FetchChatSessions,
    /// Open a "New Chat" session
    OpenChatSession,
    FetchStudentDashboard,
    FetchTeacherDashboard,
}

impl Screen {
    /// Requests to dispatch on mount
    ///
    /// `has_chat_session` tells the tutor screen whether a session is already
    /// active.
    pub fn mount_effects(&self, has_chat_session: bool) -> Vec<MountEffect> {
        match self {
            Screen::Courses => vec![MountEffect::FetchCourses, MountEffect::FetchMyEnrollments],
            Screen::CourseDetail(id) => vec![
                MountEffect::FetchCourseDetail(id.clone()),
                MountEffect::FetchMyEnrollments,
            ],
            Screen::AiTutor if has_chat_session => vec![MountEffect::FetchChatSessions],
            Screen::AiTutor => {
                vec![MountEffect::FetchChatSessions, MountEffect::OpenChatSession]
            }
            Screen::StudentDashboard => vec![MountEffect::FetchStudentDashboard],
            Screen::TeacherDashboard => vec![MountEffect::FetchTeacherDashboard],
            _ => Vec::new(),
        }
    }

    /// Heading shown in the navigation bar
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Landing => "Welcome",
            Screen::Login => "Sign in",
            Screen::Register => "Create account",
            Screen::StudentDashboard => "Dashboard",
            Screen::TeacherDashboard => "Teacher Dashboard",
            Screen::Courses => "Courses",
            Screen::CourseDetail(_) => "Course",
            Screen::AiTutor => "AI Tutor",
            Screen::Quiz(_) => "Quiz",
            Screen::Profile => "Profile",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PROTECTED: [&str; 6] =
        ["/dashboard", "/courses", "/courses/7", "/ai-tutor", "/quiz/3", "/profile"];

    #[test]
    fn parse_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Landing));
        assert_eq!(Route::parse(""), Some(Route::Landing));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/courses/"), Some(Route::Courses));
        assert_eq!(Route::parse("courses/abc-1"), Some(Route::CourseDetail("abc-1".into())));
        assert_eq!(Route::parse("/quiz/9"), Some(Route::Quiz("9".into())));
    }

    #[test]
    fn unknown_paths_do_not_parse() {
        assert_eq!(Route::parse("/settings"), None);
        assert_eq!(Route::parse("/courses/1/lessons"), None);
        assert_eq!(Route::parse("/quiz"), None);
    }

    #[test]
    fn path_round_trips_through_parse() {
        for path in PROTECTED.iter().chain(["/", "/login", "/register"].iter()) {
            let route = Route::parse(path).unwrap();
            assert_eq!(route.path(), *path);
        }
    }

    #[test]
    fn unauthenticated_protected_redirects_to_login() {
        for path in PROTECTED {
            let route = Route::parse(path).unwrap();
            assert_eq!(guard(&route, None), Guard::Redirect(Route::Login), "{}", path);
        }
    }

    #[test]
    fn authenticated_public_redirects_to_dashboard() {
        for path in ["/", "/login", "/register"] {
            let route = Route::parse(path).unwrap();
            assert_eq!(
                guard(&route, Some(Role::Student)),
                Guard::Redirect(Route::Dashboard),
                "{}",
                path
            );
        }
    }

    #[test]
    fn dashboard_variant_follows_role() {
        assert_eq!(
            guard(&Route::Dashboard, Some(Role::Teacher)),
            Guard::Render(Screen::TeacherDashboard)
        );
        assert_eq!(
            guard(&Route::Dashboard, Some(Role::Student)),
            Guard::Render(Screen::StudentDashboard)
        );
        assert_eq!(
            guard(&Route::Dashboard, Some(Role::Admin)),
            Guard::Render(Screen::StudentDashboard)
        );
    }

    #[test]
    fn resolve_lands_on_a_screen() {
        assert_eq!(resolve(Route::Profile, None), (Route::Login, Screen::Login));
        assert_eq!(
            resolve(Route::Login, Some(Role::Teacher)),
            (Route::Dashboard, Screen::TeacherDashboard)
        );
        assert_eq!(
            resolve(Route::CourseDetail("5".into()), Some(Role::Student)),
            (Route::CourseDetail("5".into()), Screen::CourseDetail("5".into()))
        );
    }

    #[test]
    fn mount_effects_per_screen() {
        assert_eq!(
            Screen::Courses.mount_effects(false),
            vec![MountEffect::FetchCourses, MountEffect::FetchMyEnrollments]
        );
        assert_eq!(
            Screen::CourseDetail("c1".into()).mount_effects(false)[0],
            MountEffect::FetchCourseDetail("c1".into())
        );
        assert!(Screen::AiTutor.mount_effects(false).contains(&MountEffect::OpenChatSession));
        assert!(!Screen::AiTutor.mount_effects(true).contains(&MountEffect::OpenChatSession));
        assert_eq!(
            Screen::TeacherDashboard.mount_effects(false),
            vec![MountEffect::FetchTeacherDashboard]
        );
        assert!(Screen::Profile.mount_effects(false).is_empty());
    }
}
