//! The application state container.
//!
//! [`Ledger`] owns every account and transaction of the session. Screens get
//! a shared reference; the only way to change balances or history is
//! [`Ledger::apply_transfer`], invoked by the transfer wizard once per
//! approved transfer.

use serde::Serialize;
use uuid::Uuid;

use crate::{
    Account, Direction, EngineError, LinkedAccount, Money, ResultEngine, Transaction,
    TransactionQuery, seed,
};

/// Merchant recorded on every transfer-generated transaction.
pub const TRANSFER_MERCHANT: &str = "Transfer";

/// The debit produced by an approved transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferPosting {
    pub from_account_id: String,
    pub amount: Money,
    pub description: String,
    pub category: String,
    /// Date label for the new transaction, e.g. `Oct 14`.
    pub date: String,
}

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    linked_accounts: Vec<LinkedAccount>,
}

impl Ledger {
    pub fn new(
        accounts: Vec<Account>,
        transactions: Vec<Transaction>,
        linked_accounts: Vec<LinkedAccount>,
    ) -> Self {
        Self {
            accounts,
            transactions,
            linked_accounts,
        }
    }

    /// A ledger loaded with the mock book.
    pub fn seeded() -> Self {
        Self::new(seed::accounts(), seed::transactions(), seed::linked_accounts())
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn linked_accounts(&self) -> &[LinkedAccount] {
        &self.linked_accounts
    }

    pub fn linked_account(&self, id: &str) -> Option<&LinkedAccount> {
        self.linked_accounts.iter().find(|a| a.id == id)
    }

    /// Newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn account_transactions(&self, account_id: &str) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.account_id.as_deref() == Some(account_id))
            .collect()
    }

    pub fn query(&self, query: &TransactionQuery) -> Vec<&Transaction> {
        query.apply(&self.transactions)
    }

    /// Sum of every account balance, credit balances included.
    pub fn net_worth(&self) -> Money {
        self.accounts.iter().map(|a| a.balance).sum()
    }

    /// Debit totals per category, in the order categories first appear.
    pub fn spending_by_category(&self) -> Vec<(String, Money)> {
        let mut out: Vec<(String, Money)> = Vec::new();
        for tx in self.transactions.iter().filter(|t| t.direction == Direction::Debit) {
            match out.iter_mut().find(|(category, _)| *category == tx.category) {
                Some((_, total)) => *total += tx.amount,
                None => out.push((tx.category.clone(), tx.amount)),
            }
        }
        out
    }

    /// Fails with [`EngineError::InsufficientFunds`] when the account balance
    /// is strictly less than `amount`.
    pub fn ensure_covers(&self, account_id: &str, amount: Money) -> ResultEngine<()> {
        let account = self
            .account(account_id)
            .ok_or_else(|| EngineError::KeyNotFound(account_id.to_string()))?;
        if account.balance < amount {
            return Err(EngineError::InsufficientFunds(format!(
                "{} holds {}, requested {}",
                account.id, account.balance, amount
            )));
        }
        Ok(())
    }

    /// Debits the source account and prepends the matching transaction.
    ///
    /// This is the single mutation entry point of the ledger.
    pub fn apply_transfer(&mut self, posting: TransferPosting) -> ResultEngine<&Transaction> {
        if !posting.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "transfer amount must be > 0".to_string(),
            ));
        }
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.id == posting.from_account_id)
            .ok_or_else(|| EngineError::KeyNotFound(posting.from_account_id.clone()))?;
        account.balance = account
            .balance
            .checked_sub(posting.amount)
            .ok_or_else(|| EngineError::InvalidAmount("balance overflow".to_string()))?;

        let transaction = Transaction {
            id: format!("t_{}", Uuid::new_v4().simple()),
            date: posting.date,
            description: posting.description,
            amount: posting.amount,
            direction: Direction::Debit,
            category: posting.category,
            merchant: Some(TRANSFER_MERCHANT.to_string()),
            account_id: Some(posting.from_account_id),
        };
        tracing::info!(
            account = %account.id,
            amount = %transaction.amount,
            transaction = %transaction.id,
            "transfer posted"
        );
        self.transactions.insert(0, transaction);
        Ok(&self.transactions[0])
    }

    /// CSV statement of one account's transactions.
    pub fn export_statement(&self, account_id: &str) -> ResultEngine<Vec<u8>> {
        if self.account(account_id).is_none() {
            return Err(EngineError::KeyNotFound(account_id.to_string()));
        }

        #[derive(Serialize)]
        struct StatementRow<'a> {
            id: &'a str,
            date: &'a str,
            description: &'a str,
            category: &'a str,
            direction: &'a str,
            amount: String,
        }

        let mut writer = csv::Writer::from_writer(vec![]);
        for tx in self.account_transactions(account_id) {
            writer.serialize(StatementRow {
                id: &tx.id,
                date: &tx.date,
                description: &tx.description,
                category: &tx.category,
                direction: tx.direction.as_str(),
                amount: tx.amount.plain(),
            })?;
        }
        writer
            .into_inner()
            .map_err(|err| EngineError::Storage(err.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(account: &str, dollars: i64) -> TransferPosting {
        TransferPosting {
            from_account_id: account.to_string(),
            amount: Money::dollars(dollars),
            description: "Transfer to Recipient".to_string(),
            category: "Transfer".to_string(),
            date: "Oct 14".to_string(),
        }
    }

    #[test]
    fn apply_transfer_debits_and_prepends() {
        let mut ledger = Ledger::seeded();
        let before = ledger.transactions().len();

        let tx = ledger.apply_transfer(posting("acc_1", 500_000)).unwrap();
        assert!(tx.id.starts_with("t_"));
        assert_eq!(tx.merchant.as_deref(), Some(TRANSFER_MERCHANT));
        assert_eq!(tx.account_id.as_deref(), Some("acc_1"));

        assert_eq!(ledger.account("acc_1").unwrap().balance, Money::dollars(8_000_000));
        assert_eq!(ledger.transactions().len(), before + 1);
        assert_eq!(ledger.transactions()[0].direction, Direction::Debit);
        assert_eq!(ledger.transactions()[0].amount, Money::dollars(500_000));
        assert_eq!(ledger.transactions()[1].id, "t1");
    }

    #[test]
    fn apply_transfer_unknown_account_leaves_ledger_untouched() {
        let mut ledger = Ledger::seeded();
        let err = ledger.apply_transfer(posting("acc_9", 1)).unwrap_err();
        assert_eq!(err, EngineError::KeyNotFound("acc_9".to_string()));
        assert_eq!(ledger.transactions().len(), 8);
    }

    #[test]
    fn apply_transfer_rejects_non_positive_amounts() {
        let mut ledger = Ledger::seeded();
        assert!(ledger.apply_transfer(posting("acc_1", 0)).is_err());
        assert_eq!(ledger.account("acc_1").unwrap().balance, Money::dollars(8_500_000));
    }

    #[test]
    fn ensure_covers_uses_strict_less_than() {
        let ledger = Ledger::seeded();
        assert!(ledger.ensure_covers("acc_1", Money::dollars(8_500_000)).is_ok());
        assert!(matches!(
            ledger.ensure_covers("acc_1", Money::new(850_000_001)),
            Err(EngineError::InsufficientFunds(_))
        ));
        assert!(matches!(
            ledger.ensure_covers("acc_3", Money::dollars(50)),
            Err(EngineError::InsufficientFunds(_))
        ));
    }

    #[test]
    fn aggregates() {
        let ledger = Ledger::seeded();
        assert_eq!(
            ledger.net_worth(),
            Money::dollars(8_500_000) + Money::dollars(387_587_677) + Money::new(-424_050)
        );

        let spending = ledger.spending_by_category();
        assert_eq!(spending[0], ("Travel".to_string(), Money::new(1_250_000 + 345_020)));
        assert!(spending.iter().all(|(category, _)| category != "Income"));

        assert_eq!(ledger.account_transactions("acc_3").len(), 3);
    }

    #[test]
    fn export_statement_writes_csv() {
        let ledger = Ledger::seeded();
        let csv = String::from_utf8(ledger.export_statement("acc_1").unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,date,description,category,direction,amount")
        );
        assert_eq!(
            lines.next(),
            Some("t1,Oct 25,Gulfstream Aerospace,Travel,debit,12500.00")
        );
        assert_eq!(lines.count(), 2);

        assert!(ledger.export_statement("nope").is_err());
    }
}
