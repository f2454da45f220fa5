//! Command parsing for the command line

use crate::route::Route;

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Navigate to a path: :go /courses/42
    Go(Route),
    /// :dashboard
    Dashboard,
    /// :courses
    Courses,
    /// :tutor
    Tutor,
    /// :profile
    Profile,
    /// Open a fresh chat session: :new-chat
    NewChat,
    /// Re-run the current screen's requests: :refresh
    Refresh,
    /// Sign out: :logout
    Logout,
    /// Show help: :help or :h
    Help,
    /// Quit the application: :q or :quit
    Quit,
    /// Clear message: (empty command)
    Nop,
}

/// Result of parsing a command
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
    /// `go` target that is not a known path
    UnknownPath(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim()).unwrap_or("");

    match cmd.to_lowercase().as_str() {
        "go" | "g" | "goto" => {
            if args.is_empty() {
                return ParseResult::MissingArgument("go".to_string());
            }
            match Route::parse(args) {
                Some(route) => ParseResult::Ok(Command::Go(route)),
                None => ParseResult::UnknownPath(args.to_string()),
            }
        }
        "dashboard" | "d" | "home" => ParseResult::Ok(Command::Dashboard),
        "courses" | "c" => ParseResult::Ok(Command::Courses),
        "tutor" | "t" | "ai" => ParseResult::Ok(Command::Tutor),
        "profile" | "p" => ParseResult::Ok(Command::Profile),
        "new-chat" | "nc" => ParseResult::Ok(Command::NewChat),
        "refresh" | "r" => ParseResult::Ok(Command::Refresh),
        "logout" => ParseResult::Ok(Command::Logout),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        "quit" | "q" => ParseResult::Ok(Command::Quit),
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}

impl ParseResult {
    /// Message for the command line when parsing failed
    pub fn error_message(&self) -> Option<String> {
        match self {
            ParseResult::Ok(_) => None,
            ParseResult::UnknownCommand(cmd) => Some(format!("Unknown command: {}", cmd)),
            ParseResult::MissingArgument(cmd) => Some(format!("{} needs an argument", cmd)),
            ParseResult::UnknownPath(path) => Some(format!("No such page: {}", path)),
        }
    }
}
