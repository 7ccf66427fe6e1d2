use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, input::centered_box, money::styled_transaction_amount},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, transaction_id: &str) {
    let theme = Theme::default();
    let Some(tx) = state.ledger.transaction(transaction_id) else {
        let notice = Paragraph::new(vec![
            Line::raw(""),
            Line::styled("Receipt Not Found", Style::default().fg(theme.error)),
            Line::styled(
                format!("No transaction with id {transaction_id}"),
                Style::default().fg(theme.dim),
            ),
        ])
        .alignment(Alignment::Center);
        Card::new("Transaction Record", &theme).render_with(frame, area, notice);
        return;
    };

    let field = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<16}"), Style::default().fg(theme.dim)),
            Span::styled(value, Style::default().fg(theme.text)),
        ])
    };
    let payment = tx
        .account_id
        .as_deref()
        .and_then(|id| state.ledger.account(id))
        .map_or_else(|| "-".to_string(), |a| a.masked_label());

    let lines = vec![
        Line::styled(
            "TrustBank",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Line::styled("Approved & Verified", Style::default().fg(theme.positive)),
        Line::raw(""),
        Line::from(styled_transaction_amount(tx, &theme)),
        Line::styled(tx.description.clone(), Style::default().fg(theme.text)),
        Line::raw(""),
        field(
            "Merchant",
            tx.merchant.clone().unwrap_or_else(|| "-".to_string()),
        ),
        field("Date & Time", tx.date.clone()),
        field("Category", tx.category.clone()),
        field("Payment Method", payment),
        field("Reference ID", tx.id.to_uppercase()),
        Line::raw(""),
        Line::styled("Location Data Hidden", Style::default().fg(theme.dim)),
    ];

    let width = area.width.min(64);
    let height = area.height.min(lines.len() as u16 + 2);
    let rect = centered_box(width, height, area);
    Card::new("Transaction Record", &theme).render_with(frame, rect, Paragraph::new(lines));
}
