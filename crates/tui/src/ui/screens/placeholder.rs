use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::{MAINTENANCE_NOTICE, Service},
    ui::{components::card::Card, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, service: Service) {
    let theme = Theme::default();
    let lines = vec![
        Line::raw(""),
        Line::styled(
            service.title(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(service.description(), Style::default().fg(theme.text_muted)),
        Line::raw(""),
        Line::styled(MAINTENANCE_NOTICE, Style::default().fg(theme.warning)),
    ];

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    Card::new(service.path(), &theme).render_with(frame, area, content);
}
