use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::Route, ui::theme::Theme};

/// Navigation bar with the four main sections.
pub fn render_nav(frame: &mut Frame<'_>, area: Rect, active: &Route, theme: &Theme) {
    let mut spans = vec![Span::raw(" ")];

    for (i, route) in Route::NAV.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let label = route.nav_label().unwrap_or_default();
        if route == active {
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.text_muted)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
