use advisor::Role;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, input::input_line, markup},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let advisor = &state.advisor;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in advisor.log.messages() {
        let (who, style) = match message.role {
            Role::User => ("You", Style::default().fg(theme.accent)),
            Role::Model => ("TrustBot", Style::default().fg(theme.positive)),
        };
        lines.push(Line::from(vec![
            Span::styled(who, style.add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  {}", message.created_at.format("%H:%M")),
                Style::default().fg(theme.dim),
            ),
        ]));
        lines.extend(markup::to_lines(&message.text, Style::default().fg(theme.text)));
        lines.push(Line::raw(""));
    }
    if advisor.pending {
        lines.push(Line::styled(
            "TrustBot is typing...",
            Style::default().fg(theme.dim),
        ));
    }

    let card = Card::new("TrustBot · Private Advisor", &theme);
    let inner = card.inner(layout[0]);
    // Keep the newest messages in view.
    let scroll = (lines.len() as u16).saturating_sub(inner.height);
    let history = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    card.render_with(frame, layout[0], history);

    let input = input_line(
        "Message",
        &advisor.input,
        "Ask about your spending...",
        false,
        !advisor.pending,
        &theme,
    );
    Card::new("", &theme)
        .focused(!advisor.pending)
        .render_with(frame, layout[1], Paragraph::new(input));
}
