use engine::Account;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, DashboardFocus, RECENT_LIMIT, Service},
    ui::{
        components::{
            card::{Card, StatCard},
            charts::render_category_bars,
            money::{styled_balance, styled_percentage_change},
        },
        screens::transactions::render_list,
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Net worth and quick actions
            Constraint::Length(6), // Accounts
            Constraint::Min(0),    // Recent activity and spending
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(layout[0]);

    let greeting = format!("Good morning, {}", state.user.first_name());
    StatCard::new("Total Net Worth", state.ledger.net_worth().to_string(), &theme)
        .subtitle(Span::styled(greeting, Style::default().fg(theme.text_muted)))
        .render(frame, top[0]);
    render_quick_actions(frame, top[1], &theme);

    render_accounts(frame, layout[1], state, &theme);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[2]);

    let focused = state.dashboard.focus == DashboardFocus::Recent;
    let card = Card::new("Recent Transactions", &theme).focused(focused);
    let inner = card.inner(bottom[0]);
    card.render_frame(frame, bottom[0]);
    let recent: Vec<_> = state.ledger.transactions().iter().take(RECENT_LIMIT).collect();
    render_list(frame, inner, &recent, state.dashboard.recent, focused, &theme);

    let card = Card::new("Spending by Category", &theme);
    let inner = card.inner(bottom[1]);
    card.render_frame(frame, bottom[1]);
    render_category_bars(frame, inner, &state.ledger.spending_by_category(), &theme);
}

fn render_quick_actions(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let mut spans = vec![
        Span::styled("1", Style::default().fg(theme.accent)),
        Span::raw(" Transfer"),
    ];
    for (i, service) in Service::ALL.iter().enumerate() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            (i + 2).to_string(),
            Style::default().fg(theme.accent),
        ));
        spans.push(Span::raw(format!(" {}", service.action_label())));
    }
    Card::new("Quick Actions", theme).render_with(frame, area, Paragraph::new(Line::from(spans)));
}

fn render_accounts(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let accounts = state.ledger.accounts();
    if accounts.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, accounts.len() as u32); accounts.len()];
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let focus_on_accounts = state.dashboard.focus == DashboardFocus::Accounts;
    for (index, (account, column)) in accounts.iter().zip(columns.iter()).enumerate() {
        let focused = focus_on_accounts && index == state.dashboard.account;
        render_account_card(frame, *column, account, focused, theme);
    }
}

fn render_account_card(
    frame: &mut Frame<'_>,
    area: Rect,
    account: &Account,
    focused: bool,
    theme: &Theme,
) {
    let label = if account.is_credit() {
        "Available Balance"
    } else {
        account.kind.label()
    };
    let mut balance = vec![styled_balance(account.balance, theme)];
    if let Some(change) = account.change {
        balance.push(Span::raw("  "));
        balance.push(styled_percentage_change(change, theme));
    }

    let lines = vec![
        Line::styled(
            account.name.clone(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            format!("{label} •••• {}", account.number),
            Style::default().fg(theme.text_muted),
        ),
        Line::from(balance),
    ];
    Card::new("", theme)
        .focused(focused)
        .render_with(frame, area, Paragraph::new(lines));
}
