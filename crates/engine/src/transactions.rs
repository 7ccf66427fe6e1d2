//! Transaction primitives.
//!
//! A `Transaction` is an immutable record of money moving in or out of an
//! account. The ledger keeps them newest first.

use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction direction: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Free-text date label such as `Oct 25`; not a timestamp.
    pub date: String,
    pub description: String,
    /// Always positive; the sign lives in `direction`.
    pub amount: Money,
    pub direction: Direction,
    pub category: String,
    pub merchant: Option<String>,
    pub account_id: Option<String>,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        self.direction == Direction::Credit
    }

    /// The amount with the direction applied: credits positive, debits
    /// negative.
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            Direction::Credit => self.amount,
            Direction::Debit => -self.amount,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.description.to_lowercase().contains(needle)
            || self
                .merchant
                .as_deref()
                .is_some_and(|m| m.to_lowercase().contains(needle))
            || self.category.to_lowercase().contains(needle)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectionFilter {
    #[default]
    All,
    /// Credits.
    Income,
    /// Debits.
    Expense,
}

impl DirectionFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// All → Income → Expense → All.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Income,
            Self::Income => Self::Expense,
            Self::Expense => Self::All,
        }
    }

    fn accepts(self, direction: Direction) -> bool {
        match self {
            Self::All => true,
            Self::Income => direction == Direction::Credit,
            Self::Expense => direction == Direction::Debit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmountOrder {
    Ascending,
    Descending,
}

impl AmountOrder {
    /// Toggling starts from descending, like the column header does.
    pub fn toggle(current: Option<Self>) -> Self {
        match current {
            Some(Self::Descending) => Self::Ascending,
            _ => Self::Descending,
        }
    }
}

/// Filters applied to the transaction history screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub direction: DirectionFilter,
    pub search: String,
    pub order: Option<AmountOrder>,
}

impl TransactionQuery {
    pub(crate) fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let needle = self.search.trim().to_lowercase();
        let mut out: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| self.direction.accepts(tx.direction))
            .filter(|tx| needle.is_empty() || tx.matches(&needle))
            .collect();

        match self.order {
            Some(AmountOrder::Ascending) => out.sort_by_key(|tx| tx.amount),
            Some(AmountOrder::Descending) => out.sort_by(|a, b| b.amount.cmp(&a.amount)),
            None => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, amount: i64, direction: Direction, category: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: "Oct 1".to_string(),
            description: format!("Payment {id}"),
            amount: Money::dollars(amount),
            direction,
            category: category.to_string(),
            merchant: Some("Acme".to_string()),
            account_id: None,
        }
    }

    #[test]
    fn signed_amount_follows_direction() {
        assert_eq!(
            tx("a", 5, Direction::Debit, "Travel").signed_amount(),
            Money::dollars(-5)
        );
        assert_eq!(
            tx("b", 5, Direction::Credit, "Income").signed_amount(),
            Money::dollars(5)
        );
    }

    #[test]
    fn direction_round_trips_through_str() {
        assert_eq!(Direction::try_from("debit").unwrap(), Direction::Debit);
        assert!(Direction::try_from("refund").is_err());
    }

    #[test]
    fn query_filters_searches_and_sorts() {
        let list = vec![
            tx("a", 30, Direction::Debit, "Travel"),
            tx("b", 10, Direction::Credit, "Income"),
            tx("c", 20, Direction::Debit, "Shopping"),
        ];

        let expenses = TransactionQuery {
            direction: DirectionFilter::Expense,
            ..Default::default()
        };
        let ids: Vec<_> = expenses.apply(&list).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);

        let search = TransactionQuery {
            search: "  SHOP ".to_string(),
            ..Default::default()
        };
        let ids: Vec<_> = search.apply(&list).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["c"]);

        let ascending = TransactionQuery {
            order: Some(AmountOrder::Ascending),
            ..Default::default()
        };
        let ids: Vec<_> = ascending.apply(&list).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn order_toggle_starts_descending() {
        assert_eq!(AmountOrder::toggle(None), AmountOrder::Descending);
        assert_eq!(
            AmountOrder::toggle(Some(AmountOrder::Descending)),
            AmountOrder::Ascending
        );
        assert_eq!(
            AmountOrder::toggle(Some(AmountOrder::Ascending)),
            AmountOrder::Descending
        );
    }
}
