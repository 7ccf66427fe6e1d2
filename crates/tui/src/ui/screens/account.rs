use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, money::styled_balance},
        screens::transactions::render_list,
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, account_id: &str) {
    let theme = Theme::default();
    let Some(account) = state.ledger.account(account_id) else {
        let notice = Paragraph::new(vec![
            Line::raw(""),
            Line::styled("Account Not Found", Style::default().fg(theme.error)),
            Line::styled("Enter back to portfolio", Style::default().fg(theme.dim)),
        ])
        .alignment(Alignment::Center);
        Card::new("Account Details", &theme).render_with(frame, area, notice);
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let header = vec![
        Line::from(vec![
            Span::styled(account.kind.label(), Style::default().fg(theme.text_muted)),
            Span::styled(format!("  •••• {}", account.number), Style::default().fg(theme.dim)),
            Span::styled("  Active", Style::default().fg(theme.positive)),
        ]),
        Line::styled("Current Balance", Style::default().fg(theme.dim)),
        Line::from(styled_balance(account.balance, &theme)),
    ];
    Card::new(&account.name, &theme).render_with(frame, layout[0], Paragraph::new(header));

    let rows = state.ledger.account_transactions(account_id);
    let card = Card::new("Transaction History", &theme).focused(true);
    if rows.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No transactions on this account",
            Style::default().fg(theme.dim),
        ))
        .alignment(Alignment::Center);
        card.render_with(frame, layout[1], empty);
        return;
    }
    let inner = card.inner(layout[1]);
    card.render_frame(frame, layout[1]);
    render_list(frame, inner, &rows, state.account.selected, true, &theme);
}
