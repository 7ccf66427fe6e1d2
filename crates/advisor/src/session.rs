use std::sync::Arc;

use engine::Transaction;

use crate::{ChatMessage, ChatRequest, ChatTransport, context};

pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response at this time.";
pub const CONNECTION_TROUBLE: &str =
    "I'm having trouble connecting to the bank's secure AI server. Please try again later.";

/// A conversation primed with the client's transactions.
#[derive(Clone, Debug)]
pub struct AdvisorSession {
    transport: Arc<dyn ChatTransport>,
    system_instruction: String,
    history: Vec<ChatMessage>,
}

impl AdvisorSession {
    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Turns the model has seen and answered.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Sends `message` and returns the reply.
    ///
    /// Never fails: an empty reply or any transport error is turned into a
    /// fixed apology. The history grows whenever the model answered, even
    /// with an empty reply; a failed request leaves it unchanged.
    pub async fn send_message(&mut self, message: &str) -> String {
        let mut contents = self.history.clone();
        contents.push(ChatMessage::user(message));

        let request = ChatRequest {
            system_instruction: &self.system_instruction,
            contents: &contents,
        };
        match self.transport.generate(request).await {
            Ok(reply) if reply.trim().is_empty() => {
                tracing::warn!("advisor returned an empty reply");
                contents.push(ChatMessage::model(String::new()));
                self.history = contents;
                EMPTY_REPLY.to_string()
            }
            Ok(reply) => {
                contents.push(ChatMessage::model(reply.clone()));
                self.history = contents;
                reply
            }
            Err(err) => {
                tracing::error!(error = %err, "advisor request failed");
                CONNECTION_TROUBLE.to_string()
            }
        }
    }
}

pub fn create_financial_chat(
    transactions: &[Transaction],
    transport: Arc<dyn ChatTransport>,
) -> AdvisorSession {
    let system_instruction = context::system_instruction(transactions).unwrap_or_else(|err| {
        tracing::error!(error = %err, "cannot serialize transaction context");
        context::SYSTEM_INSTRUCTION.to_string()
    });
    tracing::debug!(transactions = transactions.len(), "advisor session created");
    AdvisorSession {
        transport,
        system_instruction,
        history: Vec::new(),
    }
}

pub async fn send_message_to_advisor(session: &mut AdvisorSession, message: &str) -> String {
    session.send_message(message).await
}
