use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::{AppState, SecurityStep},
    ui::{
        components::{card::Card, input::passcode_line},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let security = &state.security;
    let enabled = state.gate.two_factor_enabled();

    let status = if enabled {
        Span::styled("Enabled", Style::default().fg(theme.positive).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("Disabled", Style::default().fg(theme.text_muted))
    };
    let mut lines = vec![
        Line::from(vec![Span::raw("Two-factor authentication: "), status]),
        Line::raw(""),
    ];

    match &security.step {
        SecurityStep::Idle if enabled => lines.push(Line::styled(
            "Sign-in and transfers require a code from your authenticator app.",
            Style::default().fg(theme.text_muted),
        )),
        SecurityStep::Idle => lines.push(Line::styled(
            "Protect your account with an authenticator app.",
            Style::default().fg(theme.text_muted),
        )),
        SecurityStep::ShowSecret => {
            lines.push(Line::styled(
                "Add this key to your authenticator app:",
                Style::default().fg(theme.text_muted),
            ));
            lines.push(Line::styled(
                security.secret.grouped(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::styled(
                security.secret.otpauth_uri(&state.user.email),
                Style::default().fg(theme.dim),
            ));
        }
        SecurityStep::Verify(code) => {
            lines.push(Line::styled(
                "Enter the 6-digit code shown in the app",
                Style::default().fg(theme.text),
            ));
            lines.push(Line::raw(""));
            lines.push(passcode_line(code, &theme));
        }
    }

    if let Some(message) = &security.message {
        lines.push(Line::raw(""));
        lines.push(Line::styled(message.clone(), Style::default().fg(theme.error)));
    }

    Card::new("Security Settings", &theme).render_with(
        frame,
        area,
        Paragraph::new(lines).wrap(Wrap { trim: false }),
    );
}
