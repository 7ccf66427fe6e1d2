//! The module contains the `Account` and `LinkedAccount` types.

use serde::{Deserialize, Serialize};

use crate::Money;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
}

impl AccountKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Checking => "Checking",
            Self::Savings => "Savings",
            Self::Credit => "Credit",
        }
    }
}

/// An account held at the bank.
///
/// The balance is signed: credit accounts usually carry a negative balance,
/// nothing enforces it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub kind: AccountKind,
    pub name: String,
    pub balance: Money,
    /// Last four digits of the account number.
    pub number: String,
    /// Daily change percentage.
    pub change: Option<f64>,
}

impl Account {
    pub fn new(
        id: impl Into<String>,
        kind: AccountKind,
        name: impl Into<String>,
        balance: Money,
        number: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            balance,
            number: number.into(),
            change: None,
        }
    }

    pub fn with_change(mut self, change: f64) -> Self {
        self.change = Some(change);
        self
    }

    pub fn is_credit(&self) -> bool {
        self.kind == AccountKind::Credit
    }

    /// `Private Client Checking (...4452)`
    pub fn masked_label(&self) -> String {
        format!("{} (...{})", self.name, self.number)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkedAccountKind {
    External,
    Brokerage,
}

/// An account at another institution, usable as an ACH destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    pub id: String,
    pub institution: String,
    pub name: String,
    pub mask: String,
    pub kind: LinkedAccountKind,
}

impl LinkedAccount {
    /// `Chase - Chase Platinum Checking (...8829)`
    pub fn label(&self) -> String {
        format!("{} - {} (...{})", self.institution, self.name, self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        let account = Account::new(
            "acc_1",
            AccountKind::Checking,
            "Private Client Checking",
            Money::dollars(10),
            "4452",
        )
        .with_change(1.2);
        assert_eq!(account.masked_label(), "Private Client Checking (...4452)");
        assert_eq!(account.change, Some(1.2));
        assert!(!account.is_credit());

        let linked = LinkedAccount {
            id: "ext_1".to_string(),
            institution: "Chase".to_string(),
            name: "Chase Platinum Checking".to_string(),
            mask: "8829".to_string(),
            kind: LinkedAccountKind::External,
        };
        assert_eq!(linked.label(), "Chase - Chase Platinum Checking (...8829)");
    }
}
