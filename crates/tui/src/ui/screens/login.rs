use engine::BiometricPhase;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, LoginField},
    ui::{
        components::input::{centered_box, input_line, passcode_line},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let card_area = centered_box(52, 14, area);
    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.panel));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Brand
            Constraint::Length(1), // Tagline
            Constraint::Length(1),
            Constraint::Length(3), // Form
            Constraint::Length(1),
            Constraint::Length(1), // Status
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .margin(1)
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "TRUSTBANK",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Private Wealth Portal",
            Style::default().fg(theme.text_muted),
        ))
        .alignment(Alignment::Center),
        rows[1],
    );

    let login = &state.login;
    let (form, hints) = match &login.second_factor {
        Some(code) => (
            vec![
                Line::from(Span::styled(
                    "Enter the 6-digit code from your authenticator app",
                    Style::default().fg(theme.text_muted),
                )),
                Line::raw(""),
                passcode_line(code, &theme),
            ],
            "Enter verify  Esc cancel",
        ),
        None => (
            vec![
                input_line(
                    "Client ID / Email",
                    &login.username,
                    "",
                    false,
                    login.focus == LoginField::Username,
                    &theme,
                ),
                Line::raw(""),
                input_line(
                    "Password",
                    &login.password,
                    "",
                    true,
                    login.focus == LoginField::Password,
                    &theme,
                ),
            ],
            "Tab switch  Enter sign in  Ctrl+B biometric ID",
        ),
    };
    frame.render_widget(Paragraph::new(form), rows[3]);

    let status = match (login.biometric.phase(), &login.message) {
        (BiometricPhase::Scanning, _) => {
            Span::styled("Scanning face...", Style::default().fg(theme.warning))
        }
        (BiometricPhase::Verified, _) => {
            Span::styled("Identity verified", Style::default().fg(theme.positive))
        }
        (_, Some(message)) => Span::styled(message.clone(), Style::default().fg(theme.error)),
        (BiometricPhase::Rejected, None) => {
            Span::styled("Face not recognised", Style::default().fg(theme.error))
        }
        (BiometricPhase::Idle, None) => Span::styled(
            "Or verify with Biometric ID",
            Style::default().fg(theme.dim),
        ),
    };
    frame.render_widget(
        Paragraph::new(status).alignment(Alignment::Center),
        rows[5],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(theme.dim)))
            .alignment(Alignment::Center),
        rows[7],
    );
}
