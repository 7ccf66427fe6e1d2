use engine::{
    Ledger, Passcode, PasscodeError, ProcessingStage, ProvisioningSecret, ScanStatus,
    TransferFailure, TransferKind, TransferReceipt, WizardState,
};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::{AppState, TransferField, TransferScreen},
    ui::{
        components::{
            card::Card,
            input::{input_line, passcode_line},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let screen = &state.transfer;

    let (title, lines) = match screen.wizard.state() {
        WizardState::FormEntry { submitting } => (
            "Initiate Transfer",
            form_lines(screen, &state.ledger, *submitting, &theme),
        ),
        WizardState::BiometricCheck { scan } => ("Security Check", biometric_lines(*scan, &theme)),
        WizardState::PasscodeChallenge {
            passcode,
            provisioning,
            error,
        } => (
            "Two-Factor Authentication",
            passcode_lines(
                passcode,
                provisioning.as_ref(),
                error.as_ref(),
                &state.user.email,
                &theme,
            ),
        ),
        WizardState::Processing { revealed, failure } => (
            "Processing Transfer",
            processing_lines(revealed, failure.as_ref(), &theme),
        ),
        WizardState::Success(receipt) => (
            "Transfer Approved",
            success_lines(receipt, &state.ledger, &theme),
        ),
    };

    let content = Paragraph::new(lines).wrap(Wrap { trim: false });
    Card::new(title, &theme)
        .focused(true)
        .render_with(frame, area, content);
}

fn form_lines(
    screen: &TransferScreen,
    ledger: &Ledger,
    submitting: bool,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let form = screen.wizard.form();
    let current = screen.field();
    let mut lines = Vec::new();

    for field in screen.fields() {
        let focused = *field == current && !submitting;
        let label = field.label(form.kind);
        let line = match field {
            TransferField::Kind => choice_line(label, form.kind.title().to_string(), focused, theme),
            TransferField::From => {
                let value = ledger.account(&form.from_account_id).map_or_else(
                    || form.from_account_id.clone(),
                    |a| format!("{} · {}", a.masked_label(), a.balance),
                );
                choice_line(label, value, focused, theme)
            }
            TransferField::Destination if form.kind == TransferKind::Ach => {
                let value = form
                    .linked_account_id
                    .as_deref()
                    .and_then(|id| ledger.linked_account(id))
                    .map_or_else(|| "Select linked account".to_string(), |a| a.label());
                choice_line(label, value, focused, theme)
            }
            TransferField::Destination => {
                let value = form
                    .internal_destination(ledger)
                    .map_or_else(|| "No other account".to_string(), |a| a.masked_label());
                choice_line(label, value, focused, theme)
            }
            TransferField::Speed => {
                let value = format!("{} · {}", form.ach_speed.label(), form.ach_speed.detail());
                choice_line(label, value, focused, theme)
            }
            TransferField::Beneficiary => text_line(label, &form.beneficiary, *field, focused, theme),
            TransferField::Swift => text_line(label, &form.swift, *field, focused, theme),
            TransferField::Iban => text_line(label, &form.iban, *field, focused, theme),
            TransferField::Recipient => text_line(label, &form.recipient, *field, focused, theme),
            TransferField::Amount => {
                let mut line = text_line(label, &form.amount, *field, focused, theme);
                line.spans.insert(1, Span::styled("$", Style::default().fg(theme.text)));
                line
            }
        };
        lines.push(line);
        lines.push(Line::raw(""));
    }

    if submitting {
        lines.push(Line::styled(
            "Verifying details...",
            Style::default().fg(theme.warning),
        ));
    } else if let Some(error) = &screen.error {
        lines.push(Line::styled(error.to_string(), Style::default().fg(theme.error)));
    } else if !screen.wizard.can_submit() {
        lines.push(Line::styled(
            "Enter an amount to continue",
            Style::default().fg(theme.dim),
        ));
    }
    lines
}

fn choice_line(label: &str, value: String, focused: bool, theme: &Theme) -> Line<'static> {
    let (label_style, arrows) = if focused {
        (Style::default().fg(theme.accent), Style::default().fg(theme.accent))
    } else {
        (Style::default().fg(theme.text_muted), Style::default().fg(theme.dim))
    };
    Line::from(vec![
        Span::styled(format!("{label}: "), label_style),
        Span::styled("‹ ", arrows),
        Span::styled(value, Style::default().fg(theme.text)),
        Span::styled(" ›", arrows),
    ])
}

fn text_line(
    label: &str,
    value: &str,
    field: TransferField,
    focused: bool,
    theme: &Theme,
) -> Line<'static> {
    input_line(label, value, field.placeholder(), false, focused, theme)
}

fn biometric_lines(scan: ScanStatus, theme: &Theme) -> Vec<Line<'static>> {
    let (headline, detail, color) = match scan {
        ScanStatus::Scanning => (
            "Scanning Face ID...",
            "Hold still while we confirm your identity.",
            theme.warning,
        ),
        ScanStatus::Verified => ("Identity Verified", "Continuing to passcode...", theme.positive),
        ScanStatus::Rejected => (
            "Face not recognised",
            "Press r to scan again.",
            theme.error,
        ),
    };
    vec![
        Line::raw(""),
        Line::styled(headline, Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        Line::styled(detail, Style::default().fg(theme.text_muted)).alignment(Alignment::Center),
    ]
}

fn passcode_lines(
    passcode: &Passcode,
    provisioning: Option<&ProvisioningSecret>,
    error: Option<&PasscodeError>,
    email: &str,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(secret) = provisioning {
        lines.push(Line::styled(
            "Set up your authenticator app with this key:",
            Style::default().fg(theme.text_muted),
        ));
        lines.push(Line::styled(
            secret.grouped(),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::styled(
            secret.otpauth_uri(email),
            Style::default().fg(theme.dim),
        ));
        lines.push(Line::raw(""));
    }

    lines.push(Line::styled(
        "Enter the 6-digit code from your authenticator app",
        Style::default().fg(theme.text),
    ));
    lines.push(Line::raw(""));
    lines.push(passcode_line(passcode, theme));
    if let Some(error) = error {
        lines.push(Line::raw(""));
        lines.push(Line::styled(error.to_string(), Style::default().fg(theme.error)));
    }
    lines
}

fn processing_lines(
    revealed: &[ProcessingStage],
    failure: Option<&TransferFailure>,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = revealed
        .iter()
        .map(|stage| {
            Line::from(vec![
                Span::styled("● ", Style::default().fg(theme.positive)),
                Span::styled(stage.label(), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    match failure {
        Some(failure) => {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                failure.message(),
                Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            ));
            lines.push(Line::styled(
                "Press r to return to the form.",
                Style::default().fg(theme.dim),
            ));
        }
        None => {
            let next = ProcessingStage::ALL
                .iter()
                .find(|stage| !revealed.contains(stage));
            if let Some(stage) = next {
                lines.push(Line::from(vec![
                    Span::styled("○ ", Style::default().fg(theme.dim)),
                    Span::styled(stage.label(), Style::default().fg(theme.dim)),
                ]));
            }
        }
    }
    lines
}

fn success_lines(receipt: &TransferReceipt, ledger: &Ledger, theme: &Theme) -> Vec<Line<'static>> {
    let from = ledger
        .account(&receipt.from_account_id)
        .map_or_else(|| receipt.from_account_id.clone(), |a| a.masked_label());
    let field = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<12}"), Style::default().fg(theme.dim)),
            Span::styled(value, Style::default().fg(theme.text)),
        ])
    };

    vec![
        Line::styled(
            "✅ Transfer Approved",
            Style::default().fg(theme.positive).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(
            receipt.amount.to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        field("Type", receipt.kind.title().to_string()),
        field("From", from),
        field("Reference", receipt.reference.clone()),
    ]
}
