use engine::{Money, Transaction};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Transaction amount: credits in green with `+`, debits with `-`.
#[must_use]
pub fn styled_transaction_amount(tx: &Transaction, theme: &Theme) -> Span<'static> {
    let (color, prefix) = if tx.is_credit() {
        (theme.positive, "+")
    } else {
        (theme.text, "-")
    };
    Span::styled(format!("{prefix}{}", tx.amount), Style::default().fg(color))
}

/// Account balance; negative balances (credit lines) in red.
#[must_use]
pub fn styled_balance(balance: Money, theme: &Theme) -> Span<'static> {
    let color = if balance.is_negative() {
        theme.negative
    } else {
        theme.text
    };
    Span::styled(
        balance.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

/// Returns something like `▲ +2.3%` (green) or `▼ -1.5%` (red).
#[must_use]
pub fn styled_percentage_change(change: f64, theme: &Theme) -> Span<'static> {
    let (arrow, color) = if change >= 0.0 {
        ("▲", theme.positive)
    } else {
        ("▼", theme.negative)
    };

    let sign = if change >= 0.0 { "+" } else { "" };
    Span::styled(
        format!("{arrow} {sign}{change:.1}%"),
        Style::default().fg(color),
    )
}
