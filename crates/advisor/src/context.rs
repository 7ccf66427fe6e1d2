//! System instruction sent with every conversation.

use engine::Transaction;
use serde::Serialize;

pub const SYSTEM_INSTRUCTION: &str = "
You are TrustBot, a helpful and secure AI financial assistant for TrustBank.
You have access to the user's recent transaction history to answer questions about their spending.
Be concise, professional, and friendly.
If asking about specific amounts, refer to the provided context.
Do not give specific investment advice (e.g., \"buy this stock\"), but you can give general budgeting tips.
Format your responses with Markdown for readability (e.g., bold for amounts).
";

#[derive(Serialize)]
struct TransactionContext<'a> {
    date: &'a str,
    merchant: Option<&'a str>,
    amount: f64,
    #[serde(rename = "type")]
    direction: &'a str,
    category: &'a str,
}

/// The fixed prompt followed by the client's transactions as JSON.
pub fn system_instruction(transactions: &[Transaction]) -> Result<String, serde_json::Error> {
    let context: Vec<TransactionContext<'_>> = transactions
        .iter()
        .map(|tx| TransactionContext {
            date: &tx.date,
            merchant: tx.merchant.as_deref(),
            amount: tx.amount.as_major(),
            direction: tx.direction.as_str(),
            category: &tx.category,
        })
        .collect();
    let json = serde_json::to_string(&context)?;
    Ok(format!(
        "{SYSTEM_INSTRUCTION}\n\nUser Transaction Data Context:\n{json}"
    ))
}
