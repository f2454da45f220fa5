//! Key to action mapping for screens that are not capturing text

use crossterm::event::{KeyCode, KeyModifiers};

/// Vim-style key mapping (basic, without modifiers)
pub fn vim_key_to_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::Top),
        KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Enter | KeyCode::Char('l') => Some(Action::Select),
        KeyCode::Esc | KeyCode::Char('h') => Some(Action::Back),
        KeyCode::Char('/') => Some(Action::Search),
        KeyCode::Char(':') => Some(Action::Command),
        KeyCode::Char('?') => Some(Action::Help),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('x') => Some(Action::Dismiss),
        // Course browsing
        KeyCode::Char('e') => Some(Action::Enroll),
        KeyCode::Char('f') => Some(Action::CycleDifficulty),
        KeyCode::Char('c') => Some(Action::ClearFilter),
        KeyCode::Char('a') => Some(Action::GenerateLesson),
        // Chat
        KeyCode::Char('i') => Some(Action::Edit),
        KeyCode::Char('n') => Some(Action::NewChat),
        KeyCode::Tab => Some(Action::NextSession),
        // Top-level navigation
        KeyCode::Char('1') => Some(Action::GoDashboard),
        KeyCode::Char('2') => Some(Action::GoCourses),
        KeyCode::Char('3') => Some(Action::GoTutor),
        KeyCode::Char('4') => Some(Action::GoProfile),
        _ => None,
    }
}

/// Key mapping with modifiers (for Ctrl combinations)
pub fn key_with_modifier_to_action(key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('d') => Some(Action::PageDown),
            KeyCode::Char('u') => Some(Action::PageUp),
            _ => None,
        }
    } else {
        vim_key_to_action(key)
    }
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,

    // Selection
    Select,
    Back,

    // Modes
    Search,
    Command,
    Edit,
    Help,

    // Data
    Refresh,
    Dismiss,
    Enroll,
    CycleDifficulty,
    ClearFilter,
    GenerateLesson,
    NewChat,
    NextSession,

    // Pages
    GoDashboard,
    GoCourses,
    GoTutor,
    GoProfile,

    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vim_j_maps_to_down() {
        assert_eq!(vim_key_to_action(KeyCode::Char('j')), Some(Action::Down));
        assert_eq!(vim_key_to_action(KeyCode::Down), Some(Action::Down));
    }

    #[test]
    fn unknown_key_returns_none() {
        assert_eq!(vim_key_to_action(KeyCode::Char('z')), None);
    }

    #[test]
    fn digits_switch_pages() {
        assert_eq!(vim_key_to_action(KeyCode::Char('2')), Some(Action::GoCourses));
        assert_eq!(vim_key_to_action(KeyCode::Char('3')), Some(Action::GoTutor));
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
    }

    #[test]
    fn no_modifier_uses_vim_keys() {
        assert_eq!(
            key_with_modifier_to_action(KeyCode::Char('c'), KeyModifiers::NONE),
            Some(Action::ClearFilter)
        );
    }
}
