use engine::{AmountOrder, Transaction};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::{card::Card, money::styled_transaction_amount},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_filters(frame, layout[0], state, &theme);

    let rows = state.ledger.query(&state.transactions.query);
    let card = Card::new("Detailed transaction history", &theme);
    if rows.is_empty() {
        let empty = Paragraph::new(vec![
            Line::raw(""),
            Line::styled("No transactions found", Style::default().fg(theme.text)),
            Line::styled(
                "Try adjusting your filters or search terms.",
                Style::default().fg(theme.dim),
            ),
        ])
        .alignment(Alignment::Center);
        card.render_with(frame, layout[1], empty);
        return;
    }

    let inner = card.inner(layout[1]);
    card.render_frame(frame, layout[1]);
    render_list(frame, inner, &rows, state.transactions.selected, true, &theme);
}

fn render_filters(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let query = &state.transactions.query;
    let order = match query.order {
        None => "Date",
        Some(AmountOrder::Ascending) => "Amount ↑",
        Some(AmountOrder::Descending) => "Amount ↓",
    };
    let search_style = if state.transactions.searching {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };
    let cursor = if state.transactions.searching { "│" } else { "" };

    let line = Line::from(vec![
        Span::styled("Show", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}   ", query.direction.label())),
        Span::styled("Sort", Style::default().fg(theme.dim)),
        Span::raw(format!(": {order}   ")),
        Span::styled("Search", Style::default().fg(theme.dim)),
        Span::raw(": "),
        Span::styled(format!("{}{cursor}", query.search), search_style),
    ]);
    Card::new("Wealth Reports", theme).render_with(frame, area, Paragraph::new(line));
}

/// `Oct 25  Gulfstream Aerospace           Travel        -$12,500.00`
pub fn transaction_line(tx: &Transaction, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<8}", tx.date), Style::default().fg(theme.dim)),
        Span::styled(
            format!("{:<30} ", truncate(&tx.description, 30)),
            Style::default().fg(theme.text),
        ),
        Span::styled(
            format!("{:<18} ", truncate(&tx.category, 18)),
            Style::default().fg(theme.text_muted),
        ),
        styled_transaction_amount(tx, theme),
    ])
}

pub fn render_list(
    frame: &mut Frame<'_>,
    area: Rect,
    rows: &[&Transaction],
    selected: usize,
    focused: bool,
    theme: &Theme,
) {
    let items: Vec<ListItem<'static>> = rows
        .iter()
        .map(|tx| ListItem::new(transaction_line(tx, theme)))
        .collect();

    let mut list_state = ListState::default();
    if focused && !items.is_empty() {
        list_state.select(Some(selected.min(items.len() - 1)));
    }

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(theme.surface_bright)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
