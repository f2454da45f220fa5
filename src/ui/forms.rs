//! Sign-in and registration screens

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use super::layout::{fixed_rect, line_with_cursor};
use crate::api::Role;
use crate::app::state::AppState;
use crate::forms::{LoginField, RegisterField, TextInput};
use crate::theme::Theme;

/// A bordered single-line input
fn draw_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &TextInput,
    focused: bool,
    masked: bool,
    theme: &Theme,
) {
    let border = if focused { theme.border_focused } else { theme.border };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", label), Style::default().fg(theme.fg_secondary)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let text = if masked { input.masked() } else { input.value().to_string() };
    let style = Style::default().fg(theme.fg_primary);
    let line = if focused {
        line_with_cursor(&text, input.cursor(), style, theme)
    } else {
        Line::from(Span::styled(text, style))
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Card title, status line and footer shared by both forms
fn draw_card(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) -> Rect {
    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

fn status_line<'a>(error: Option<&'a str>, loading: bool, busy: &'a str, theme: &Theme) -> Line<'a> {
    if loading {
        Line::from(Span::styled(busy, Style::default().fg(theme.info)))
    } else if let Some(message) = error {
        Line::from(Span::styled(message, Style::default().fg(theme.error)))
    } else {
        Line::from("")
    }
}

fn hint_line<'a>(keys: &[(&'a str, &'a str)], theme: &Theme) -> Line<'a> {
    let mut spans = Vec::new();
    for (key, label) in keys {
        spans.push(Span::styled(*key, Style::default().fg(theme.accent_primary)));
        spans.push(Span::styled(format!(" {}  ", label), Style::default().fg(theme.fg_muted)));
    }
    Line::from(spans)
}

/// Draw the sign-in form
pub fn draw_login(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.login;
    let card = fixed_rect(56, 14, area);
    let inner = draw_card(frame, card, "Welcome back", theme);

    let [email, password, status, _, hints] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .areas(inner);

    draw_field(frame, email, "Email", &form.email, form.focus == LoginField::Email, false, theme);
    draw_field(
        frame,
        password,
        "Password",
        &form.password,
        form.focus == LoginField::Password,
        !form.reveal,
        theme,
    );

    let error = form.error.as_deref().or(state.auth.error());
    frame.render_widget(
        Paragraph::new(status_line(error, state.auth.loading(), "Signing in...", theme)),
        status,
    );

    let keys = [("Enter", "sign in"), ("Tab", "next field"), ("^S", "show password")];
    let more = [("^R", "create an account"), ("Esc", "back")];
    frame.render_widget(
        Paragraph::new(vec![hint_line(&keys, theme), hint_line(&more, theme)]),
        hints,
    );
}

/// Draw the registration form with its strength meter
pub fn draw_register(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.register;
    let card = fixed_rect(60, 23, area);
    let inner = draw_card(frame, card, "Create your account", theme);

    let [name, email, role, password, meter, confirm, status, hints] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .areas(inner);

    let focus = form.focus;
    draw_field(frame, name, "Full name", &form.full_name, focus == RegisterField::FullName, false, theme);
    draw_field(frame, email, "Email", &form.email, focus == RegisterField::Email, false, theme);
    draw_role_picker(frame, role, form.role, focus == RegisterField::Role, theme);
    draw_field(
        frame,
        password,
        "Password",
        &form.password,
        focus == RegisterField::Password,
        !form.reveal,
        theme,
    );

    if !form.password.is_empty() {
        let (score, strength) = form.strength();
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme.strength_color(score)).bg(theme.bg_tertiary))
            .percent(u16::from(score))
            .label(format!("Strength: {}", strength.label()));
        frame.render_widget(gauge, meter);
    }

    draw_field(
        frame,
        confirm,
        "Confirm password",
        &form.confirm,
        focus == RegisterField::Confirm,
        !form.reveal,
        theme,
    );

    let error = form.error.as_deref().or(state.auth.error());
    frame.render_widget(
        Paragraph::new(status_line(error, state.auth.loading(), "Creating account...", theme)),
        status,
    );

    let keys = [("Enter", "next / submit"), ("Tab", "next field"), ("^S", "show passwords")];
    let more = [("←/→", "role"), ("^R", "sign in instead"), ("Esc", "back")];
    frame.render_widget(
        Paragraph::new(vec![hint_line(&keys, theme), hint_line(&more, theme)]),
        hints,
    );
}

fn draw_role_picker(frame: &mut Frame, area: Rect, role: Role, focused: bool, theme: &Theme) {
    let border = if focused { theme.border_focused } else { theme.border };
    let block = Block::default()
        .title(Span::styled(" I am a ", Style::default().fg(theme.fg_secondary)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let option = |value: Role, label: &'static str, color| {
        if value == role {
            Span::styled(format!(" ● {} ", label), Style::default().fg(theme.bg_primary).bg(color))
        } else {
            Span::styled(format!(" ○ {} ", label), Style::default().fg(theme.fg_muted))
        }
    };
    let line = Line::from(vec![
        option(Role::Student, "Student", theme.info),
        Span::raw("   "),
        option(Role::Teacher, "Teacher", theme.accent_teacher),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &AppState, register: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let theme = Theme::default();
        terminal
            .draw(|frame| {
                if register {
                    draw_register(frame, frame.area(), state, &theme)
                } else {
                    draw_login(frame, frame.area(), state, &theme)
                }
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn password_is_masked_until_revealed() {
        let mut state = AppState::default();
        state.login.email.set("sam@example.com");
        state.login.password.set("hunter2");

        let screen = render(&state, false);
        assert!(screen.contains("sam@example.com"));
        assert!(!screen.contains("hunter2"));

        state.login.reveal = true;
        assert!(render(&state, false).contains("hunter2"));
    }

    #[test]
    fn validation_message_is_shown() {
        let mut state = AppState::default();
        state.submit_login();
        assert!(render(&state, false).contains("Please enter your email and password"));
    }

    #[test]
    fn strength_label_follows_password() {
        let mut state = AppState::default();
        state.register.password.set("Tr0ub4dor&3xyz");
        assert!(render(&state, true).contains("Strength: Strong"));
        state.register.password.set("abcdEFGH");
        assert!(render(&state, true).contains("Strength: Medium"));
    }
}
