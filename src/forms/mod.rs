//! Login and registration form state

pub mod password;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::{Credentials, RegisterRequest, Role};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Whether `email` has the `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

/// Single-line text field with a character cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Character index, not byte index
    cursor: usize,
}

impl TextInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Replace the contents, cursor at the end
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_count();
    }

    /// Take the contents, leaving the field empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Value with every character replaced by a bullet
    pub fn masked(&self) -> String {
        "•".repeat(self.char_count())
    }
}

/// Fields of the login form, in focus order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// Login screen state
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: TextInput,
    pub password: TextInput,
    pub focus: LoginField,
    /// Show the password in clear text
    pub reveal: bool,
    /// Validation message shown before any request is sent
    pub error: Option<String>,
}

impl LoginForm {
    pub fn focused_mut(&mut self) -> &mut TextInput {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    /// Credentials ready to submit, or a message for the user
    pub fn credentials(&self) -> Result<Credentials, String> {
        let email = self.email.value().trim();
        if email.is_empty() || self.password.is_empty() {
            return Err("Please enter your email and password".to_string());
        }
        Ok(Credentials { email: email.to_string(), password: self.password.value().to_string() })
    }

    /// Forget the password after a submit
    pub fn clear_password(&mut self) {
        self.password.clear();
    }
}

/// Fields of the registration form, in focus order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegisterField {
    #[default]
    FullName,
    Email,
    Role,
    Password,
    Confirm,
}

impl RegisterField {
    const ORDER: [RegisterField; 5] =
        [Self::FullName, Self::Email, Self::Role, Self::Password, Self::Confirm];

    fn offset(self, delta: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ORDER[(idx + delta).rem_euclid(len) as usize]
    }
}

/// Registration screen state
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub full_name: TextInput,
    pub email: TextInput,
    pub role: Role,
    pub password: TextInput,
    pub confirm: TextInput,
    pub focus: RegisterField,
    pub reveal: bool,
    pub error: Option<String>,
}

impl RegisterForm {
    /// Focused text field; `None` while the role picker has focus
    pub fn focused_mut(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            RegisterField::FullName => Some(&mut self.full_name),
            RegisterField::Email => Some(&mut self.email),
            RegisterField::Role => None,
            RegisterField::Password => Some(&mut self.password),
            RegisterField::Confirm => Some(&mut self.confirm),
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.offset(1);
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.offset(-1);
    }

    /// Toggle between student and teacher
    pub fn toggle_role(&mut self) {
        self.role = match self.role {
            Role::Student => Role::Teacher,
            _ => Role::Student,
        };
    }

    /// Strength of the current password
    pub fn strength(&self) -> (u8, password::Strength) {
        password::strength(self.password.value())
    }

    /// Validate and build the request body
    pub fn request(&self) -> Result<RegisterRequest, String> {
        let full_name = self.full_name.value().trim();
        let email = self.email.value().trim();
        if full_name.is_empty()
            || email.is_empty()
            || self.password.is_empty()
            || self.confirm.is_empty()
        {
            return Err("All fields are required".to_string());
        }
        if !is_valid_email(email) {
            return Err("Please enter a valid email address".to_string());
        }
        if self.password.value() != self.confirm.value() {
            return Err("Passwords do not match".to_string());
        }
        Ok(RegisterRequest {
            email: email.to_string(),
            password: self.password.value().to_string(),
            password_confirm: self.confirm.value().to_string(),
            full_name: full_name.to_string(),
            role: self.role,
        })
    }
}
