//! AI tutor chat: session list, transcript and input box

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use super::layout::{draw_scroll_indicator, line_with_cursor, panel};
use crate::api::{ChatMessage, MessageRole};
use crate::app::state::AppState;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [sessions, chat] =
        Layout::horizontal([Constraint::Length(26), Constraint::Fill(1)]).areas(area);
    draw_sessions(frame, sessions, state, theme);

    let [transcript, input] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(chat);
    draw_transcript(frame, transcript, state, theme);
    draw_input(frame, input, state, theme);
}

fn draw_sessions(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let sessions = state.tutor.sessions();
    let current = state.tutor.current_session().map(|s| s.id.as_str());
    let items: Vec<ListItem> = sessions
        .iter()
        .map(|s| {
            let title = if s.title.is_empty() { "Untitled" } else { s.title.as_str() };
            ListItem::new(Line::from(Span::styled(title.to_string(), Style::default().fg(theme.fg_secondary))))
        })
        .collect();
    let selected = sessions.iter().position(|s| Some(s.id.as_str()) == current);

    let list = List::new(items)
        .block(panel(" Sessions  [Tab] ", false, theme))
        .highlight_style(Style::default().fg(theme.fg_primary).bg(theme.selection))
        .highlight_symbol("▸ ");
    let mut list_state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Lines of one message: a role header, the wrapped body and a gap
fn message_lines(message: &ChatMessage, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let (who, color) = match message.role {
        MessageRole::User => ("You", theme.chat_user),
        MessageRole::Assistant => ("Tutor", theme.chat_assistant),
    };
    let mut lines =
        vec![Line::from(Span::styled(who, Style::default().fg(color).add_modifier(Modifier::BOLD)))];
    for line in message.content.lines() {
        if line.trim().is_empty() {
            lines.push(Line::from(""));
        } else {
            lines.extend(wrap_line(line, width, theme));
        }
    }
    lines.push(Line::from(""));
    lines
}

fn draw_transcript(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let title = state
        .tutor
        .current_session()
        .map(|s| format!(" {} ", if s.title.is_empty() { "Chat" } else { s.title.as_str() }))
        .unwrap_or_else(|| " Chat ".to_string());
    let block = panel(title, !state.chat.editing, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let messages = state.tutor.messages();
    if messages.is_empty() && !state.chat.sending {
        let hint = if state.tutor.current_session().is_none() && state.tutor.loading() {
            "Opening a chat session..."
        } else {
            "Ask anything about your courses. The tutor answers in context."
        };
        frame.render_widget(Paragraph::new(hint).style(Style::default().fg(theme.fg_muted)), inner);
        return;
    }

    let width = inner.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> =
        messages.iter().flat_map(|m| message_lines(m, width, theme)).collect();
    if state.chat.sending {
        lines.push(Line::from(Span::styled(
            "Tutor is thinking...  (Esc to cancel)",
            Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
        )));
    }

    // `scroll` counts lines up from the newest message
    let visible = inner.height as usize;
    let max_scroll = lines.len().saturating_sub(visible);
    state.chat.max_scroll.set(max_scroll);
    let from_bottom = state.chat.scroll.min(max_scroll);
    let offset = max_scroll - from_bottom;

    let para = Paragraph::new(lines)
        .style(Style::default().fg(theme.fg_primary))
        .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0));
    frame.render_widget(para, inner);

    if max_scroll > 0 {
        draw_scroll_indicator(frame, inner, offset, max_scroll, theme);
    }
}

fn draw_input(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let hint = if state.chat.editing {
        " Message  [Enter] send  [Esc] done  [^N] new chat "
    } else {
        " Message  [i] type  [n] new chat  [j/k] scroll "
    };
    let block = panel(hint, state.chat.editing, theme);
    let style = Style::default().fg(theme.fg_primary);
    let line = if state.chat.editing {
        line_with_cursor(state.chat.input.value(), state.chat.input.cursor(), style, theme)
    } else {
        Line::from(Span::styled(state.chat.input.value().to_string(), style))
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Wrap a single line of text
fn wrap_line(line: &str, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from("")];
    }
    // Keep code indentation instead of reflowing it
    if is_code_line(line) {
        return vec![style_line(line, theme)];
    }
    textwrap::wrap(line, width).iter().map(|part| style_line(part, theme)).collect()
}

fn is_code_line(text: &str) -> bool {
    text.starts_with("```") || text.starts_with("    ") || text.starts_with('\t')
}

/// Apply markdown-ish styling to one wrapped line
fn style_line(text: &str, theme: &Theme) -> Line<'static> {
    let code = Style::default().fg(theme.accent_secondary).bg(theme.bg_tertiary);

    if is_code_line(text) {
        Line::from(Span::styled(text.to_string(), Style::default().fg(theme.accent_secondary)))
    } else if text.starts_with('#') {
        Line::from(Span::styled(
            text.trim_start_matches('#').trim().to_string(),
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ))
    } else if text.contains('`') {
        // Odd segments sit between backticks
        let spans: Vec<Span> = text
            .split('`')
            .enumerate()
            .filter(|(_, part)| !part.is_empty())
            .map(|(i, part)| {
                if i % 2 == 1 {
                    Span::styled(part.to_string(), code)
                } else {
                    Span::styled(part.to_string(), Style::default().fg(theme.fg_primary))
                }
            })
            .collect();
        Line::from(spans)
    } else {
        Line::from(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChatSession;
    use crate::app::effects::Request;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|frame| draw(frame, frame.area(), state, &Theme::default())).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn wraps_to_width() {
        let theme = Theme::default();
        let lines = wrap_line("one two three four", 10, &theme);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn inline_code_gets_its_own_span() {
        let theme = Theme::default();
        let line = style_line("use `Vec::new` here", &theme);
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "Vec::new");
    }

    #[test]
    fn heading_markers_are_stripped() {
        let theme = Theme::default();
        assert_eq!(style_line("## Closures", &theme).spans[0].content, "Closures");
    }

    #[test]
    fn transcript_shows_roles_and_thinking() {
        let mut state = AppState::default();
        let session: ChatSession =
            serde_json::from_value(serde_json::json!({"id": "s1", "title": "Rust help"})).unwrap();
        state.tutor.set_current_session(Some(session));
        state.chat.input.set("What is a trait?");
        state.submit_chat();
        assert!(matches!(state.queued(), [Request::SendMessage { .. }]));

        let screen = render(&state);
        assert!(screen.contains("Rust help"));
        assert!(screen.contains("Tutor is thinking"));
    }

    #[test]
    fn long_transcript_records_its_scroll_limit() {
        let mut state = AppState::default();
        let messages: Vec<serde_json::Value> = (0..30)
            .map(|i| serde_json::json!({"id": format!("m{}", i), "role": "user", "content": "hello"}))
            .collect();
        let session: ChatSession = serde_json::from_value(
            serde_json::json!({"id": "s1", "title": "Long", "messages": messages}),
        )
        .unwrap();
        state.tutor.set_current_session(Some(session));

        render(&state);
        let max = state.chat.max_scroll.get();
        assert!(max > 0);

        state.chat.scroll_up(1000);
        assert_eq!(state.chat.scroll, max);
        state.chat.scroll_down(1);
        assert_eq!(state.chat.scroll, max - 1);
    }
}
