//! Static mock data the client starts from.

use crate::{
    Account, AccountKind, Direction, LinkedAccount, LinkedAccountKind, Money, Transaction,
};

/// The signed-in client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl UserProfile {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

pub fn current_user() -> UserProfile {
    UserProfile {
        id: "u_123".to_string(),
        name: "Howard R. Woods".to_string(),
        email: "howard.woods@trustbank.com".to_string(),
    }
}

pub fn accounts() -> Vec<Account> {
    vec![
        Account::new(
            "acc_1",
            AccountKind::Checking,
            "Private Client Checking",
            Money::dollars(8_500_000),
            "4452",
        )
        .with_change(1.2),
        Account::new(
            "acc_2",
            AccountKind::Savings,
            "Trust Heritage Holdings",
            Money::dollars(387_587_677),
            "9921",
        )
        .with_change(0.05),
        Account::new(
            "acc_3",
            AccountKind::Credit,
            "Palladium Reserve Card",
            Money::new(-424_050),
            "8832",
        )
        .with_change(0.0),
    ]
}

pub fn linked_accounts() -> Vec<LinkedAccount> {
    [
        ("ext_1", "Chase", "Chase Platinum Checking", "8829", LinkedAccountKind::External),
        ("ext_2", "Fidelity", "Brokerage Individual", "1102", LinkedAccountKind::Brokerage),
        ("ext_3", "Bank of America", "Advantage Savings", "3341", LinkedAccountKind::External),
    ]
    .into_iter()
    .map(|(id, institution, name, mask, kind)| LinkedAccount {
        id: id.to_string(),
        institution: institution.to_string(),
        name: name.to_string(),
        mask: mask.to_string(),
        kind,
    })
    .collect()
}

pub fn transactions() -> Vec<Transaction> {
    use Direction::{Credit, Debit};

    [
        ("t1", "Oct 25", "Gulfstream Aerospace", 1_250_000, Debit, "Travel", "Gulfstream", "acc_1"),
        ("t2", "Oct 24", "Dividend Payout - Trust Fund", 45_000_000, Credit, "Income", "Trust Fund A", "acc_2"),
        ("t3", "Oct 23", "Ritz-Carlton Hotel", 345_020, Debit, "Travel", "Ritz-Carlton", "acc_3"),
        ("t4", "Oct 22", "Sotheby's Auction", 12_500_000, Debit, "Shopping", "Sotheby's", "acc_1"),
        ("t5", "Oct 21", "Bloomberg Terminal", 200_000, Debit, "Business", "Bloomberg", "acc_1"),
        ("t6", "Oct 20", "Private Club Dues", 500_000, Debit, "Entertainment", "The Club", "acc_3"),
        ("t7", "Oct 19", "Venture Capital Distribution", 120_000_000, Credit, "Income", "VC Fund IV", "acc_2"),
        ("t8", "Oct 18", "Luxury Motors Service", 180_000, Debit, "Transport", "Luxury Motors", "acc_3"),
    ]
    .into_iter()
    .map(
        |(id, date, description, cents, direction, category, merchant, account)| Transaction {
            id: id.to_string(),
            date: date.to_string(),
            description: description.to_string(),
            amount: Money::new(cents),
            direction,
            category: category.to_string(),
            merchant: Some(merchant.to_string()),
            account_id: Some(account.to_string()),
        },
    )
    .collect()
}
