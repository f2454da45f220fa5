//! Client-side course filtering

use crate::api::Course;

/// Criteria applied to the already-fetched course list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    /// Case-insensitive substring of title or description
    pub search: String,
    /// Exact difficulty, `None` for all
    pub difficulty: Option<String>,
    /// Exact category, `None` for all
    pub category: Option<String>,
}

impl CourseFilter {
    /// Whether no criterion is set
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.difficulty.is_none() && self.category.is_none()
    }

    /// Whether a single course satisfies every criterion
    pub fn matches(&self, course: &Course) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || course.title.to_lowercase().contains(&needle)
            || course.description.to_lowercase().contains(&needle);

        search_ok
            && field_matches(self.difficulty.as_deref(), &course.difficulty)
            && field_matches(self.category.as_deref(), &course.category)
    }

    /// Courses passing the filter, in their original order
    pub fn apply<'a>(&self, courses: &'a [Course]) -> Vec<&'a Course> {
        courses.iter().filter(|c| self.matches(c)).collect()
    }
}

fn field_matches(wanted: Option<&str>, actual: &str) -> bool {
    wanted.is_none_or(|w| w.eq_ignore_ascii_case(actual))
}

/// Difficulty levels offered by the filter picker; `None` means all
pub const DIFFICULTIES: [Option<&str>; 4] =
    [None, Some("beginner"), Some("intermediate"), Some("advanced")];

/// Next entry of [`DIFFICULTIES`] after `current`, wrapping around
pub fn cycle_difficulty(current: Option<&str>) -> Option<String> {
    let idx = DIFFICULTIES.iter().position(|d| *d == current).unwrap_or(0);
    DIFFICULTIES[(idx + 1) % DIFFICULTIES.len()].map(str::to_string)
}
