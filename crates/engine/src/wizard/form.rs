//! The transfer form: kind, source, amount and per-kind fields.

use thiserror::Error;

use crate::{Account, Ledger, Money};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransferKind {
    #[default]
    Ach,
    Wire,
    Rtp,
    Internal,
}

impl TransferKind {
    pub const ALL: [TransferKind; 4] = [Self::Ach, Self::Wire, Self::Rtp, Self::Internal];

    pub fn code(self) -> &'static str {
        match self {
            Self::Ach => "ach",
            Self::Wire => "wire",
            Self::Rtp => "rtp",
            Self::Internal => "internal",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Ach => "ACH Transfer",
            Self::Wire => "Wire Transfer",
            Self::Rtp => "Real-Time (RTP)",
            Self::Internal => "Internal Transfer",
        }
    }

    /// Description of the transaction recorded for this kind.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ach => "Transfer to External Linked",
            _ => "Transfer to Recipient",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            Self::Internal => "Internal Transfer",
            _ => "Transfer",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AchSpeed {
    #[default]
    Standard,
    /// Advertised fee only; nothing is charged.
    NextDay,
}

impl AchSpeed {
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::NextDay => "Next Day",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Self::Standard => "1-3 Days (Free)",
            Self::NextDay => "Tomorrow ($10)",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Standard => Self::NextDay,
            Self::NextDay => Self::Standard,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Enter an amount")]
    EmptyAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount must be greater than $0.00")]
    NonPositiveAmount,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Unknown account: {0}")]
    UnknownAccount(String),
    #[error("Destination must differ from the source account")]
    SameAccount,
    #[error("The form cannot be edited right now")]
    Locked,
}

/// Raw form input, kept across restarts of the wizard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferForm {
    pub kind: TransferKind,
    pub from_account_id: String,
    pub amount: String,
    /// ACH destination; optional.
    pub linked_account_id: Option<String>,
    pub ach_speed: AchSpeed,
    pub beneficiary: String,
    pub swift: String,
    pub iban: String,
    pub recipient: String,
    /// Internal destination; `None` means the first other account.
    pub to_account_id: Option<String>,
}

/// What the form turned into once validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub kind: TransferKind,
    pub from_account_id: String,
    pub amount: Money,
}

impl TransferForm {
    /// The source defaults to the first account of the ledger.
    pub fn new(ledger: &Ledger) -> Self {
        Self {
            from_account_id: ledger
                .accounts()
                .first()
                .map(|a| a.id.clone())
                .unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Accounts an internal transfer can go to.
    pub fn internal_destinations<'a>(&self, ledger: &'a Ledger) -> Vec<&'a Account> {
        ledger
            .accounts()
            .iter()
            .filter(|a| a.id != self.from_account_id)
            .collect()
    }

    pub fn internal_destination<'a>(&self, ledger: &'a Ledger) -> Option<&'a Account> {
        match &self.to_account_id {
            Some(id) => ledger.account(id),
            None => self.internal_destinations(ledger).into_iter().next(),
        }
    }

    pub fn validate(&self, ledger: &Ledger) -> Result<ValidatedTransfer, FormError> {
        if self.amount.trim().is_empty() {
            return Err(FormError::EmptyAmount);
        }
        let amount: Money = self
            .amount
            .parse()
            .map_err(|_| FormError::InvalidAmount(self.amount.trim().to_string()))?;
        if !amount.is_positive() {
            return Err(FormError::NonPositiveAmount);
        }
        if ledger.account(&self.from_account_id).is_none() {
            return Err(FormError::UnknownAccount(self.from_account_id.clone()));
        }

        match self.kind {
            TransferKind::Ach => {
                if let Some(id) = &self.linked_account_id
                    && ledger.linked_account(id).is_none()
                {
                    return Err(FormError::UnknownAccount(id.clone()));
                }
            }
            TransferKind::Wire => {
                required(&self.beneficiary, "Beneficiary name")?;
                required(&self.swift, "SWIFT / BIC code")?;
                required(&self.iban, "IBAN / account number")?;
            }
            TransferKind::Rtp => required(&self.recipient, "Recipient email or mobile")?,
            TransferKind::Internal => {
                let destination = self
                    .internal_destination(ledger)
                    .ok_or(FormError::MissingField("Destination account"))?;
                if destination.id == self.from_account_id {
                    return Err(FormError::SameAccount);
                }
            }
        }

        Ok(ValidatedTransfer {
            kind: self.kind,
            from_account_id: self.from_account_id.clone(),
            amount,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(kind: TransferKind, amount: &str) -> (Ledger, TransferForm) {
        let ledger = Ledger::seeded();
        let mut form = TransferForm::new(&ledger);
        form.kind = kind;
        form.amount = amount.to_string();
        (ledger, form)
    }

    #[test]
    fn kind_labels() {
        assert_eq!(TransferKind::Ach.description(), "Transfer to External Linked");
        assert_eq!(TransferKind::Wire.description(), "Transfer to Recipient");
        assert_eq!(TransferKind::Internal.category(), "Internal Transfer");
        assert_eq!(TransferKind::Rtp.category(), "Transfer");
        assert_eq!(TransferKind::Internal.next(), TransferKind::Ach);
        assert_eq!(TransferKind::Ach.previous(), TransferKind::Internal);
    }

    #[test]
    fn amount_rules() {
        let (ledger, form) = filled(TransferKind::Ach, "");
        assert_eq!(form.validate(&ledger).unwrap_err(), FormError::EmptyAmount);

        let (ledger, form) = filled(TransferKind::Ach, "0");
        assert_eq!(form.validate(&ledger).unwrap_err(), FormError::NonPositiveAmount);

        let (ledger, form) = filled(TransferKind::Ach, "12.345");
        assert!(matches!(
            form.validate(&ledger).unwrap_err(),
            FormError::InvalidAmount(_)
        ));

        let (ledger, form) = filled(TransferKind::Ach, "500000");
        let transfer = form.validate(&ledger).unwrap();
        assert_eq!(transfer.amount, Money::dollars(500_000));
        assert_eq!(transfer.from_account_id, "acc_1");
    }

    #[test]
    fn wire_and_rtp_need_their_fields() {
        let (ledger, mut wire) = filled(TransferKind::Wire, "10");
        assert_eq!(
            wire.validate(&ledger).unwrap_err(),
            FormError::MissingField("Beneficiary name")
        );
        wire.beneficiary = "Jane Doe".to_string();
        wire.swift = "ABCDUS33XXX".to_string();
        wire.iban = " ".to_string();
        assert_eq!(
            wire.validate(&ledger).unwrap_err(),
            FormError::MissingField("IBAN / account number")
        );
        wire.iban = "DE89370400440532013000".to_string();
        assert!(wire.validate(&ledger).is_ok());

        let (ledger, mut rtp) = filled(TransferKind::Rtp, "10");
        assert!(rtp.validate(&ledger).is_err());
        rtp.recipient = "name@example.com".to_string();
        assert!(rtp.validate(&ledger).is_ok());
    }

    #[test]
    fn internal_destination_defaults_and_must_differ() {
        let (ledger, mut internal) = filled(TransferKind::Internal, "10");
        assert_eq!(internal.internal_destination(&ledger).unwrap().id, "acc_2");
        assert!(internal.validate(&ledger).is_ok());

        internal.to_account_id = Some("acc_1".to_string());
        assert_eq!(internal.validate(&ledger).unwrap_err(), FormError::SameAccount);
    }

    #[test]
    fn unknown_source_or_linked_account() {
        let (ledger, mut ach) = filled(TransferKind::Ach, "10");
        ach.linked_account_id = Some("ext_9".to_string());
        assert_eq!(
            ach.validate(&ledger).unwrap_err(),
            FormError::UnknownAccount("ext_9".to_string())
        );

        ach.linked_account_id = None;
        ach.from_account_id = "acc_9".to_string();
        assert!(matches!(
            ach.validate(&ledger).unwrap_err(),
            FormError::UnknownAccount(_)
        ));
    }
}
