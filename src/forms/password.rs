//! Password strength meter

/// Strength bucket shown under the password field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl Strength {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Medium => "Medium",
            Self::Strong => "Strong",
        }
    }

    /// Bucket for a score in `0..=100`
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=49 => Self::Weak,
            50..=74 => Self::Medium,
            _ => Self::Strong,
        }
    }
}

/// Score a password 0-100 in steps of 25
///
/// One step each for: at least 8 characters, both lower and upper case
/// letters, a digit, and a character outside `[a-zA-Z0-9]`.
pub fn score(password: &str) -> u8 {
    let mut score = 0;
    if password.chars().count() >= 8 {
        score += 25;
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        score += 25;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 25;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 25;
    }
    score
}

/// Score and bucket in one call
pub fn strength(password: &str) -> (u8, Strength) {
    let score = score(password);
    (score, Strength::from_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_passwords() {
        assert_eq!(strength(""), (0, Strength::Weak));
        assert_eq!(strength("abcdefgh"), (25, Strength::Weak));
        assert_eq!(strength("abcdEFGH"), (50, Strength::Medium));
        assert_eq!(strength("abcdEFG1"), (75, Strength::Strong));
        assert_eq!(strength("abcdEF1!"), (100, Strength::Strong));
    }

    #[test]
    fn short_password_can_still_score() {
        assert_eq!(score("aB1!"), 75);
    }

    #[test]
    fn labels() {
        assert_eq!(Strength::from_score(25).label(), "Weak");
        assert_eq!(Strength::from_score(50).label(), "Medium");
        assert_eq!(Strength::from_score(75).label(), "Strong");
        assert_eq!(Strength::from_score(100).label(), "Strong");
    }

    proptest! {
        #[test]
        fn score_is_a_multiple_of_25(password in ".{0,32}") {
            let s = score(&password);
            prop_assert!(s <= 100);
            prop_assert_eq!(s % 25, 0);
        }

        #[test]
        fn appending_never_lowers_score(password in ".{0,16}", extra in ".{0,8}") {
            let longer = format!("{}{}", password, extra);
            prop_assert!(score(&longer) >= score(&password));
        }
    }
}
