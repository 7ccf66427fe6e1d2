//! The funds-transfer wizard.
//!
//! An explicit state machine:
//!
//! ```text
//! FormEntry ─submit─▶ BiometricCheck ─▶ PasscodeChallenge ─confirm─▶ Processing ─▶ Success
//!     ▲                                                                  │
//!     └──────────────────────────── restart (low balance) ◀──────────────┘
//! ```
//!
//! All delays are [`WizardTimer`] events handed to a [`Scheduler`]. Each
//! timer carries the attempt it was scheduled for; a timer from an older
//! attempt is ignored by [`TransferWizard::on_timer`].

mod form;

use std::time::Duration;

use rand::Rng;
use thiserror::Error;

pub use form::{AchSpeed, FormError, TransferForm, TransferKind, ValidatedTransfer};

use crate::{
    Ledger, Money, Passcode, ProvisioningSecret, ResultEngine, Scheduler, TransferPosting,
    Verifier, scheduler::date_label,
};

const SUBMIT_DELAY: Duration = Duration::from_millis(1000);
const SCAN_DELAY: Duration = Duration::from_millis(2500);
const VERIFIED_DELAY: Duration = Duration::from_millis(1500);
const FAILURE_DELAY: Duration = Duration::from_millis(1000);
const SUCCESS_DELAY: Duration = Duration::from_millis(1200);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessingStage {
    Sending,
    SystemVerification,
    Processing,
    Processed,
    Approved,
}

impl ProcessingStage {
    pub const ALL: [ProcessingStage; 5] = [
        Self::Sending,
        Self::SystemVerification,
        Self::Processing,
        Self::Processed,
        Self::Approved,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Sending => "Sending...",
            Self::SystemVerification => "System Verification...",
            Self::Processing => "Processing...",
            Self::Processed => "Processed",
            Self::Approved => "✅ Approved",
        }
    }

    /// Time between the previous reveal and this one.
    fn delay(self) -> Duration {
        match self {
            Self::Sending | Self::Approved => Duration::from_millis(800),
            Self::SystemVerification | Self::Processing | Self::Processed => {
                Duration::from_millis(1000)
            }
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::Sending => Some(Self::SystemVerification),
            Self::SystemVerification => Some(Self::Processing),
            Self::Processing => Some(Self::Processed),
            Self::Processed => Some(Self::Approved),
            Self::Approved => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStatus {
    Scanning,
    Verified,
    Rejected,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasscodeError {
    #[error("Invalid Code – Please enter the complete 6-digit code.")]
    Incomplete,
    #[error("Invalid Code – The code was not accepted.")]
    Rejected,
    #[error("No passcode is being requested")]
    NotRequested,
}

/// Why a transfer stopped during processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransferFailure {
    LowBalance,
    Posting(String),
}

impl TransferFailure {
    pub fn message(&self) -> String {
        match self {
            Self::LowBalance => "❌ Low Balance – Transfer Not Possible".to_string(),
            Self::Posting(reason) => format!("❌ Transfer Failed – {reason}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub amount: Money,
    pub kind: TransferKind,
    /// `#TRX-<0..9999>`
    pub reference: String,
    pub transaction_id: String,
    pub from_account_id: String,
}

/// Returned by [`TransferWizard::confirm_passcode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasscodeOutcome {
    /// The challenge doubled as authenticator setup; the caller decides
    /// whether to turn 2FA on.
    pub provisioning_requested: bool,
    pub secret: ProvisioningSecret,
    pub passcode: Passcode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WizardState {
    FormEntry {
        submitting: bool,
    },
    BiometricCheck {
        scan: ScanStatus,
    },
    PasscodeChallenge {
        passcode: Passcode,
        /// Shown when no authenticator is provisioned yet.
        provisioning: Option<ProvisioningSecret>,
        error: Option<PasscodeError>,
    },
    Processing {
        revealed: Vec<ProcessingStage>,
        failure: Option<TransferFailure>,
    },
    Success(TransferReceipt),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    SubmitFinished,
    ScanFinished,
    ShowPasscode,
    Reveal(ProcessingStage),
    Failure,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WizardTimer {
    pub attempt: u64,
    pub kind: TimerKind,
}

#[derive(Debug)]
pub struct TransferWizard {
    form: TransferForm,
    state: WizardState,
    transfer: Option<ValidatedTransfer>,
    receipt_transaction: Option<String>,
    two_factor_enabled: bool,
    verifier: Box<dyn Verifier>,
    attempt: u64,
}

impl TransferWizard {
    pub fn new(ledger: &Ledger, verifier: Box<dyn Verifier>, two_factor_enabled: bool) -> Self {
        Self {
            form: TransferForm::new(ledger),
            state: WizardState::FormEntry { submitting: false },
            transfer: None,
            receipt_transaction: None,
            two_factor_enabled,
            verifier,
            attempt: 0,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn form(&self) -> &TransferForm {
        &self.form
    }

    /// The form, while it may still be edited.
    pub fn form_mut(&mut self) -> Option<&mut TransferForm> {
        match self.state {
            WizardState::FormEntry { submitting: false } => Some(&mut self.form),
            _ => None,
        }
    }

    /// The transfer being processed, once the form was accepted.
    pub fn transfer(&self) -> Option<&ValidatedTransfer> {
        self.transfer.as_ref()
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn select_kind(&mut self, kind: TransferKind) -> Result<(), FormError> {
        let form = self.form_mut().ok_or(FormError::Locked)?;
        form.kind = kind;
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, WizardState::FormEntry { submitting: false })
            && !self.form.amount.trim().is_empty()
    }

    pub fn submit(
        &mut self,
        ledger: &Ledger,
        scheduler: &mut dyn Scheduler<WizardTimer>,
    ) -> Result<(), FormError> {
        if !matches!(self.state, WizardState::FormEntry { submitting: false }) {
            return Err(FormError::Locked);
        }
        let transfer = self.form.validate(ledger)?;
        tracing::debug!(
            kind = transfer.kind.code(),
            account = %transfer.from_account_id,
            amount = %transfer.amount,
            "transfer submitted"
        );
        self.attempt += 1;
        self.transfer = Some(transfer);
        self.state = WizardState::FormEntry { submitting: true };
        self.schedule(scheduler, SUBMIT_DELAY, TimerKind::SubmitFinished);
        Ok(())
    }

    /// Starts a new face scan after a rejected one.
    pub fn retry_biometric(&mut self, scheduler: &mut dyn Scheduler<WizardTimer>) -> bool {
        if !matches!(
            self.state,
            WizardState::BiometricCheck {
                scan: ScanStatus::Rejected
            }
        ) {
            return false;
        }
        self.state = WizardState::BiometricCheck {
            scan: ScanStatus::Scanning,
        };
        self.schedule(scheduler, SCAN_DELAY, TimerKind::ScanFinished);
        true
    }

    /// The code being typed, while the challenge is shown.
    pub fn passcode(&self) -> Option<&Passcode> {
        match &self.state {
            WizardState::PasscodeChallenge { passcode, .. } => Some(passcode),
            _ => None,
        }
    }

    pub fn type_digit(&mut self, ch: char) -> bool {
        self.edit_passcode(|code| code.push(ch))
    }

    pub fn erase_digit(&mut self) -> bool {
        self.edit_passcode(|code| {
            code.pop();
            true
        })
    }

    pub fn paste_passcode(&mut self, text: &str) -> bool {
        self.edit_passcode(|code| code.paste(text))
    }

    fn edit_passcode(&mut self, edit: impl FnOnce(&mut Passcode) -> bool) -> bool {
        match &mut self.state {
            WizardState::PasscodeChallenge {
                passcode, error, ..
            } => {
                let changed = edit(passcode);
                if changed {
                    *error = None;
                }
                changed
            }
            _ => false,
        }
    }

    pub fn confirm_passcode(
        &mut self,
        scheduler: &mut dyn Scheduler<WizardTimer>,
    ) -> Result<PasscodeOutcome, PasscodeError> {
        let WizardState::PasscodeChallenge {
            passcode,
            provisioning,
            error,
        } = &mut self.state
        else {
            return Err(PasscodeError::NotRequested);
        };

        if !passcode.is_complete() {
            *error = Some(PasscodeError::Incomplete);
            return Err(PasscodeError::Incomplete);
        }
        if !self.verifier.passcode(passcode) {
            *error = Some(PasscodeError::Rejected);
            return Err(PasscodeError::Rejected);
        }

        let outcome = PasscodeOutcome {
            provisioning_requested: provisioning.is_some(),
            secret: provisioning.clone().unwrap_or_default(),
            passcode: passcode.clone(),
        };
        if outcome.provisioning_requested {
            // The caller persists the flag; later attempts skip the setup panel.
            self.two_factor_enabled = true;
        }

        self.state = WizardState::Processing {
            revealed: Vec::new(),
            failure: None,
        };
        let first = ProcessingStage::Sending;
        self.schedule(scheduler, first.delay(), TimerKind::Reveal(first));
        tracing::debug!(attempt = self.attempt, "passcode accepted, processing");
        Ok(outcome)
    }

    /// Back to the form after a failed attempt; form values are kept.
    pub fn restart(&mut self) -> ResultEngine<()> {
        match &self.state {
            WizardState::Processing {
                failure: Some(_), ..
            } => {
                self.attempt += 1;
                self.transfer = None;
                self.state = WizardState::FormEntry { submitting: false };
                tracing::debug!(attempt = self.attempt, "transfer wizard restarted");
                Ok(())
            }
            _ => Err(crate::EngineError::InvalidState(
                "only a failed transfer can be restarted".to_string(),
            )),
        }
    }

    pub fn on_timer(
        &mut self,
        timer: WizardTimer,
        ledger: &mut Ledger,
        scheduler: &mut dyn Scheduler<WizardTimer>,
    ) -> ResultEngine<()> {
        if timer.attempt != self.attempt {
            tracing::debug!(
                timer = timer.attempt,
                current = self.attempt,
                "stale wizard timer ignored"
            );
            return Ok(());
        }

        match (timer.kind, &mut self.state) {
            (TimerKind::SubmitFinished, WizardState::FormEntry { submitting: true }) => {
                self.state = WizardState::BiometricCheck {
                    scan: ScanStatus::Scanning,
                };
                self.schedule(scheduler, SCAN_DELAY, TimerKind::ScanFinished);
            }
            (
                TimerKind::ScanFinished,
                WizardState::BiometricCheck {
                    scan: scan @ ScanStatus::Scanning,
                },
            ) => {
                if self.verifier.biometric() {
                    *scan = ScanStatus::Verified;
                    self.schedule(scheduler, VERIFIED_DELAY, TimerKind::ShowPasscode);
                } else {
                    *scan = ScanStatus::Rejected;
                    tracing::debug!("biometric scan rejected");
                }
            }
            (
                TimerKind::ShowPasscode,
                WizardState::BiometricCheck {
                    scan: ScanStatus::Verified,
                },
            ) => {
                self.state = WizardState::PasscodeChallenge {
                    passcode: Passcode::new(),
                    provisioning: (!self.two_factor_enabled).then(ProvisioningSecret::default),
                    error: None,
                };
            }
            (TimerKind::Reveal(stage), WizardState::Processing { revealed, failure: None }) => {
                revealed.push(stage);
                self.on_stage_revealed(stage, ledger, scheduler)?;
            }
            (TimerKind::Failure, WizardState::Processing { failure, .. }) => {
                *failure = Some(TransferFailure::LowBalance);
                tracing::info!(attempt = self.attempt, "transfer declined: low balance");
            }
            (TimerKind::Complete, WizardState::Processing { failure: None, .. }) => {
                let Some(transfer) = self.transfer.as_ref() else {
                    return Ok(());
                };
                let reference = format!("#TRX-{}", rand::rng().random_range(0..10_000));
                self.state = WizardState::Success(TransferReceipt {
                    amount: transfer.amount,
                    kind: transfer.kind,
                    reference,
                    transaction_id: self.receipt_transaction.take().unwrap_or_default(),
                    from_account_id: transfer.from_account_id.clone(),
                });
                tracing::debug!(attempt = self.attempt, "transfer wizard finished");
            }
            (kind, _) => {
                tracing::debug!(?kind, "wizard timer does not apply to the current state");
            }
        }
        Ok(())
    }

    fn on_stage_revealed(
        &mut self,
        stage: ProcessingStage,
        ledger: &mut Ledger,
        scheduler: &mut dyn Scheduler<WizardTimer>,
    ) -> ResultEngine<()> {
        let Some(transfer) = self.transfer.clone() else {
            return Ok(());
        };

        match stage {
            ProcessingStage::SystemVerification => {
                if ledger
                    .ensure_covers(&transfer.from_account_id, transfer.amount)
                    .is_err()
                {
                    self.schedule(scheduler, FAILURE_DELAY, TimerKind::Failure);
                    return Ok(());
                }
            }
            ProcessingStage::Approved => {
                let posting = TransferPosting {
                    from_account_id: transfer.from_account_id,
                    amount: transfer.amount,
                    description: transfer.kind.description().to_string(),
                    category: transfer.kind.category().to_string(),
                    date: date_label(scheduler.today()),
                };
                match ledger.apply_transfer(posting) {
                    Ok(tx) => self.receipt_transaction = Some(tx.id.clone()),
                    Err(err) => {
                        if let WizardState::Processing { failure, .. } = &mut self.state {
                            *failure = Some(TransferFailure::Posting(err.to_string()));
                        }
                        return Err(err);
                    }
                }
                self.schedule(scheduler, SUCCESS_DELAY, TimerKind::Complete);
                return Ok(());
            }
            _ => {}
        }

        if let Some(next) = stage.next() {
            self.schedule(scheduler, next.delay(), TimerKind::Reveal(next));
        }
        Ok(())
    }

    fn schedule(&self, scheduler: &mut dyn Scheduler<WizardTimer>, delay: Duration, kind: TimerKind) {
        scheduler.schedule(
            delay,
            WizardTimer {
                attempt: self.attempt,
                kind,
            },
        );
    }
}
