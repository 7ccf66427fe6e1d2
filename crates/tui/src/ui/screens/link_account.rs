use engine::LinkStep;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::{AppState, LinkField},
    ui::{
        components::{card::Card, input::input_line},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let link = &state.link;

    match link.wizard.step() {
        LinkStep::Select => {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(area);

            let search = input_line(
                "Search",
                link.wizard.search(),
                "Search for your bank",
                false,
                true,
                &theme,
            );
            Card::new("Select Institution", &theme).render_with(
                frame,
                layout[0],
                Paragraph::new(search),
            );

            let matches = link.wizard.matching_institutions();
            let items: Vec<ListItem<'static>> = matches
                .iter()
                .map(|name| ListItem::new(Line::raw(*name)))
                .collect();
            let mut list_state = ListState::default();
            if !items.is_empty() {
                list_state.select(Some(link.selected.min(items.len() - 1)));
            }
            let list = List::new(items)
                .block(Card::new("Institutions", &theme).block())
                .highlight_style(
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("» ");
            frame.render_stateful_widget(list, layout[1], &mut list_state);
        }
        LinkStep::Credentials => {
            let institution = link.wizard.institution().unwrap_or_default();
            let lines = vec![
                Line::styled(
                    format!("Enter your {institution} credentials"),
                    Style::default().fg(theme.text_muted),
                ),
                Line::raw(""),
                input_line(
                    "User ID",
                    &link.wizard.username,
                    "",
                    false,
                    link.focus == LinkField::Username,
                    &theme,
                ),
                Line::raw(""),
                input_line(
                    "Password",
                    &link.wizard.password,
                    "",
                    true,
                    link.focus == LinkField::Password,
                    &theme,
                ),
                Line::raw(""),
                Line::styled(
                    "Your credentials are encrypted and never stored.",
                    Style::default().fg(theme.dim),
                ),
            ];
            Card::new(institution, &theme)
                .focused(true)
                .render_with(frame, area, Paragraph::new(lines));
        }
        LinkStep::Verifying => {
            let institution = link.wizard.institution().unwrap_or_default();
            let lines = vec![
                Line::raw(""),
                Line::styled(
                    format!("Connecting to {institution}..."),
                    Style::default().fg(theme.warning),
                ),
                Line::styled(
                    "Verifying your credentials securely.",
                    Style::default().fg(theme.dim),
                ),
            ];
            Card::new("Verifying", &theme).render_with(frame, area, Paragraph::new(lines));
        }
        LinkStep::Success => {
            let institution = link.wizard.institution().unwrap_or_default();
            let lines = vec![
                Line::raw(""),
                Line::styled(
                    "✅ Account Linked",
                    Style::default()
                        .fg(theme.positive)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::from(vec![
                    Span::raw("Your "),
                    Span::styled(institution, Style::default().fg(theme.accent)),
                    Span::raw(" account is ready for ACH transfers."),
                ]),
            ];
            Card::new("Success", &theme).render_with(frame, area, Paragraph::new(lines));
        }
    }
}
