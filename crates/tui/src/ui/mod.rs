pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use engine::{LinkStep, ScanStatus, WizardState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{AppState, Route, SecurityStep};

use components::hints::{KeyHint, hint_separator, hints_to_spans};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    match state.route {
        Route::Login => screens::login::render(frame, area, state),
        _ => render_shell(frame, area, state, &theme),
    }
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Brand and user
            Constraint::Length(2), // Navigation
            Constraint::Length(1), // Page title
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Hints
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, theme);
    components::tabs::render_nav(frame, layout[1], &state.route, theme);
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {}", state.route.title()),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        layout[2],
    );

    let content = layout[3];
    match &state.route {
        Route::Login => {}
        Route::Dashboard => screens::dashboard::render(frame, content, state),
        Route::Transactions => screens::transactions::render(frame, content, state),
        Route::Transfer => screens::transfer::render(frame, content, state),
        Route::Account(id) => screens::account::render(frame, content, state, id),
        Route::Receipt(id) => screens::receipt::render(frame, content, state, id),
        Route::LinkAccount => screens::link_account::render(frame, content, state),
        Route::Advisor => screens::advisor::render(frame, content, state),
        Route::Security => screens::security::render(frame, content, state),
        Route::Service(service) => screens::placeholder::render(frame, content, *service),
    }

    render_bottom_bar(frame, layout[4], state, theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let two_factor = if state.gate.two_factor_enabled() {
        Span::styled("2FA on", Style::default().fg(theme.positive))
    } else {
        Span::styled("2FA off", Style::default().fg(theme.dim))
    };

    let line = Line::from(vec![
        Span::styled(
            " TrustBank ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Private Client  ", Style::default().fg(theme.text_muted)),
        Span::styled("Client", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.user.name)),
        two_factor,
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = hints_to_spans(&context_hints(state), theme);
    if !parts.is_empty() {
        parts.push(hint_separator(theme));
    }
    parts.push(Span::styled("Ctrl+C", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn context_hints(state: &AppState) -> Vec<KeyHint> {
    match &state.route {
        Route::Login => Vec::new(),
        Route::Dashboard => vec![
            KeyHint::new("Tab", "panel"),
            KeyHint::new("Enter", "open"),
            KeyHint::new("1-6", "actions"),
            KeyHint::new("r", "reports"),
            KeyHint::new("a", "advisor"),
            KeyHint::new("l", "link"),
            KeyHint::new("s", "security"),
            KeyHint::new("o", "sign out"),
        ],
        Route::Transactions if state.transactions.searching => vec![
            KeyHint::new("type", "search"),
            KeyHint::new("Enter", "done"),
        ],
        Route::Transactions => vec![
            KeyHint::new("/", "search"),
            KeyHint::new("f", "filter"),
            KeyHint::new("s", "sort"),
            KeyHint::new("c", "clear"),
            KeyHint::new("Enter", "receipt"),
            KeyHint::new("Esc", "back"),
        ],
        Route::Account(_) => vec![
            KeyHint::new("↑↓", "select"),
            KeyHint::new("Enter", "receipt"),
            KeyHint::new("e", "export"),
            KeyHint::new("t", "transfer"),
            KeyHint::new("Esc", "back"),
        ],
        Route::Transfer => transfer_hints(state),
        Route::LinkAccount => match state.link.wizard.step() {
            LinkStep::Select => vec![
                KeyHint::new("type", "search"),
                KeyHint::new("↑↓", "select"),
                KeyHint::new("Enter", "continue"),
                KeyHint::new("Esc", "back"),
            ],
            LinkStep::Credentials => vec![
                KeyHint::new("Tab", "next"),
                KeyHint::new("Enter", "connect"),
                KeyHint::new("Esc", "institutions"),
            ],
            LinkStep::Verifying => Vec::new(),
            LinkStep::Success => vec![
                KeyHint::new("Enter", "transfer"),
                KeyHint::new("Esc", "back"),
            ],
        },
        Route::Advisor => vec![KeyHint::new("Enter", "send"), KeyHint::new("Esc", "back")],
        Route::Security => match state.security.step {
            SecurityStep::Idle if state.gate.two_factor_enabled() => {
                vec![KeyHint::new("d", "disable 2FA"), KeyHint::new("Esc", "back")]
            }
            SecurityStep::Idle => {
                vec![KeyHint::new("Enter", "enable 2FA"), KeyHint::new("Esc", "back")]
            }
            SecurityStep::ShowSecret => {
                vec![KeyHint::new("Enter", "enter code"), KeyHint::new("Esc", "cancel")]
            }
            SecurityStep::Verify(_) => {
                vec![KeyHint::new("Enter", "verify"), KeyHint::new("Esc", "back")]
            }
        },
        Route::Receipt(_) | Route::Service(_) => vec![KeyHint::new("Esc", "back")],
    }
}

fn transfer_hints(state: &AppState) -> Vec<KeyHint> {
    match state.transfer.wizard.state() {
        WizardState::FormEntry { submitting: false } => vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("←→", "change"),
            KeyHint::new("l", "link account"),
            KeyHint::new("Enter", "submit"),
            KeyHint::new("Esc", "back"),
        ],
        WizardState::BiometricCheck {
            scan: ScanStatus::Rejected,
        } => vec![KeyHint::new("r", "retry"), KeyHint::new("Esc", "back")],
        WizardState::PasscodeChallenge { .. } => vec![
            KeyHint::new("0-9", "code"),
            KeyHint::new("Enter", "confirm"),
            KeyHint::new("Esc", "back"),
        ],
        WizardState::Processing {
            failure: Some(_), ..
        } => vec![KeyHint::new("r", "try again"), KeyHint::new("Esc", "back")],
        WizardState::Success(_) => vec![KeyHint::new("Enter", "dashboard")],
        _ => Vec::new(),
    }
}
