//! TrustBot, the chat advisor.
//!
//! A session is primed with the client's transactions and talks to a
//! [`ChatTransport`]; the shipped transport is [`GeminiTransport`]. Sending
//! a message never fails from the caller's point of view: errors become a
//! fixed apology text.

pub use error::AdvisorError;
pub use message::{ChatLog, ChatMessage, GREETING, Role};
pub use session::{
    AdvisorSession, CONNECTION_TROUBLE, EMPTY_REPLY, create_financial_chat,
    send_message_to_advisor,
};
pub use transport::{
    AdvisorConfig, ChatRequest, ChatTransport, DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiTransport,
};

pub mod context;
mod error;
mod message;
mod session;
mod transport;
