use engine::{PASSCODE_LEN, Passcode};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// `label: value│` with the cursor only on the focused field.
pub fn input_line(
    label: &str,
    value: &str,
    placeholder: &str,
    masked: bool,
    focused: bool,
    theme: &Theme,
) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let cursor = if focused { "│" } else { "" };
    let value = if value.is_empty() {
        Span::styled(format!("{placeholder}{cursor}"), Style::default().fg(theme.dim))
    } else if masked {
        Span::styled(
            format!("{}{cursor}", mask_password(value)),
            Style::default().fg(theme.text),
        )
    } else {
        Span::styled(format!("{value}{cursor}"), Style::default().fg(theme.text))
    };

    Line::from(vec![Span::styled(format!("{label}: "), label_style), value])
}

pub fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    masked: bool,
    focused: bool,
    theme: &Theme,
) {
    let line = input_line(label, value, "", masked, focused, theme);
    frame.render_widget(Paragraph::new(line), area);
}

/// Masks password with bullets, one per character
pub fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}

/// Six boxes, e.g. `[1] [2] [ ] [ ] [ ] [ ]`.
pub fn passcode_line(code: &Passcode, theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(PASSCODE_LEN * 2);
    for index in 0..PASSCODE_LEN {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        let (text, style) = match code.digit(index) {
            Some(digit) => (
                format!("[{digit}]"),
                Style::default()
                    .fg(theme.text)
                    .add_modifier(Modifier::BOLD),
            ),
            None if index == code.len() => ("[_]".to_string(), Style::default().fg(theme.accent)),
            None => ("[ ]".to_string(), Style::default().fg(theme.dim)),
        };
        spans.push(Span::styled(text, style));
    }
    Line::from(spans)
}
