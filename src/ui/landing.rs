//! Landing screen with an animated orbit

use std::f32::consts::{FRAC_PI_2, TAU};

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::LandingAnimation;
use crate::theme::Theme;

const ORBIT_ROWS: usize = 9;
const ORBIT_COLS: usize = 25;
/// Points sampled around the ellipse before deduplication
const ORBIT_STEPS: usize = 56;

const TAGLINE: &str = "Personalized learning with an AI tutor by your side";

/// Cells of the orbit ellipse in drawing order, clockwise from the top
fn orbit_path() -> Vec<(usize, usize)> {
    let cx = (ORBIT_COLS - 1) as f32 / 2.0;
    let cy = (ORBIT_ROWS - 1) as f32 / 2.0;
    let mut path: Vec<(usize, usize)> = Vec::with_capacity(ORBIT_STEPS);

    for i in 0..ORBIT_STEPS {
        let angle = (i as f32 / ORBIT_STEPS as f32) * TAU - FRAC_PI_2;
        let col = (cx + cx * angle.cos()).round().max(0.0) as usize;
        let row = (cy + cy * angle.sin()).round().max(0.0) as usize;
        if !path.contains(&(row, col)) {
            path.push((row, col));
        }
    }
    path
}

/// Build the orbit picture for `progress` (0.0 to 1.0)
///
/// The trail is dotted, its head is the satellite and the nucleus appears as
/// soon as drawing starts.
fn build_orbit(progress: f32) -> String {
    let mut grid = vec![vec![' '; ORBIT_COLS]; ORBIT_ROWS];
    let path = orbit_path();
    let segments = ((path.len() as f32) * progress.clamp(0.0, 1.0)) as usize;

    for (i, &(row, col)) in path.iter().take(segments).enumerate() {
        grid[row][col] = if i + 1 == segments { '●' } else { '·' };
    }
    if segments > 0 {
        grid[ORBIT_ROWS / 2][ORBIT_COLS / 2] = '◉';
    }

    grid.iter().map(|row| row.iter().collect::<String>()).collect::<Vec<_>>().join("\n")
}

/// One centered line at `y`, skipped when it falls off screen
fn draw_centered(frame: &mut Frame, area: Rect, y: u16, line: Line<'_>) {
    if y >= area.y + area.height {
        return;
    }
    let row = Rect { x: area.x, y, width: area.width, height: 1 };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
}

/// Draw the landing screen
pub fn draw(frame: &mut Frame, animation: &LandingAnimation, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Paragraph::new("").style(Style::default().bg(theme.bg_primary)), area);

    // Orbit in the upper third
    let orbit_y = (area.height / 4).min(area.height.saturating_sub(ORBIT_ROWS as u16 + 12));
    let orbit_area = Rect {
        x: area.x,
        y: area.y + orbit_y,
        width: area.width,
        height: (ORBIT_ROWS as u16).min(area.height.saturating_sub(orbit_y)),
    };
    let orbit = Paragraph::new(build_orbit(animation.orbit_progress()))
        .style(Style::default().fg(theme.accent_primary).bg(theme.bg_primary))
        .alignment(Alignment::Center);
    frame.render_widget(orbit, orbit_area);

    let below = orbit_area.y + orbit_area.height;

    // Title typed out one character at a time
    let title_len = LandingAnimation::TITLE.chars().count();
    let shown = animation.title_chars();
    if shown > 0 {
        let visible: String = LandingAnimation::TITLE.chars().take(shown).collect();
        let padded = format!("{}{}", visible, " ".repeat(title_len - shown));
        let style = Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD);
        draw_centered(frame, area, below + 2, Line::from(Span::styled(padded, style)));
    }

    if animation.show_tagline() {
        let style = Style::default().fg(theme.fg_muted);
        draw_centered(frame, area, below + 4, Line::from(Span::styled(TAGLINE, style)));
    }

    if animation.complete {
        let key = Style::default().fg(theme.accent_primary);
        let label = Style::default().fg(theme.fg_secondary);
        let actions = Line::from(vec![
            Span::styled("[Enter]", key),
            Span::styled(" Sign in    ", label),
            Span::styled("[r]", key),
            Span::styled(" Create account    ", label),
            Span::styled("[q]", key),
            Span::styled(" Quit", label),
        ]);
        draw_centered(frame, area, below + 7, actions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn_cells(picture: &str) -> usize {
        picture.chars().filter(|c| !c.is_whitespace()).count()
    }

    #[test]
    fn orbit_path_stays_in_grid() {
        let path = orbit_path();
        assert!(path.len() > 30);
        assert!(path.iter().all(|&(r, c)| r < ORBIT_ROWS && c < ORBIT_COLS));
        assert_eq!(path[0], (0, ORBIT_COLS / 2));
    }

    #[test]
    fn empty_at_zero() {
        assert_eq!(drawn_cells(&build_orbit(0.0)), 0);
    }

    #[test]
    fn full_orbit_plus_nucleus_at_one() {
        let picture = build_orbit(1.0);
        assert_eq!(drawn_cells(&picture), orbit_path().len() + 1);
        assert!(picture.contains('◉'));
        assert!(picture.contains('●'));
    }

    #[test]
    fn partial_orbit() {
        let cells = drawn_cells(&build_orbit(0.5));
        assert!(cells > 1);
        assert!(cells < orbit_path().len());
    }
}
