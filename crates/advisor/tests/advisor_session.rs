use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use advisor::{
    AdvisorConfig, AdvisorError, CONNECTION_TROUBLE, ChatRequest, ChatTransport, EMPTY_REPLY,
    GeminiTransport, Role, create_financial_chat, send_message_to_advisor,
};
use engine::Ledger;

/// Replies with queued answers and records what it was sent.
#[derive(Debug, Default)]
struct ScriptedTransport {
    replies: Mutex<Vec<Result<String, ()>>>,
    seen: Mutex<Vec<usize>>,
}

impl ScriptedTransport {
    fn new(replies: Vec<Result<String, ()>>) -> Self {
        Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn generate(&self, request: ChatRequest<'_>) -> Result<String, AdvisorError> {
        self.seen.lock().unwrap().push(request.contents.len());
        assert_eq!(request.contents.last().unwrap().role, Role::User);
        match self.replies.lock().unwrap().remove(0) {
            Ok(text) => Ok(text),
            Err(()) => Err(AdvisorError::MissingApiKey),
        }
    }
}

#[tokio::test]
async fn replies_extend_history() {
    let ledger = Ledger::seeded();
    let transport = Arc::new(ScriptedTransport::new(vec![
        Ok("You spent **$15,950.20** on travel.".to_string()),
        Ok("Anything else?".to_string()),
    ]));
    let mut session = create_financial_chat(ledger.transactions(), transport.clone());
    assert!(session.system_instruction().contains("Gulfstream"));

    let reply = send_message_to_advisor(&mut session, "Travel spend?").await;
    assert_eq!(reply, "You spent **$15,950.20** on travel.");
    let reply = session.send_message("Thanks").await;
    assert_eq!(reply, "Anything else?");

    assert_eq!(session.history().len(), 4);
    assert_eq!(*transport.seen.lock().unwrap(), [1, 3]);
}

#[tokio::test]
async fn failures_and_empty_replies_become_fixed_texts() {
    let ledger = Ledger::seeded();
    let transport = Arc::new(ScriptedTransport::new(vec![
        Err(()),
        Ok("   ".to_string()),
        Ok("About travel: **$15,950.20**.".to_string()),
    ]));
    let mut session = create_financial_chat(ledger.transactions(), transport.clone());

    assert_eq!(session.send_message("hello").await, CONNECTION_TROUBLE);
    assert!(session.history().is_empty());

    assert_eq!(session.send_message("Travel spend?").await, EMPTY_REPLY);
    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].text, "Travel spend?");
    assert_eq!(history[1].role, Role::Model);
    assert!(history[1].text.is_empty());

    // The unanswered question is still part of the next request.
    session.send_message("Please try again").await;
    assert_eq!(*transport.seen.lock().unwrap(), [1, 1, 3]);
    assert_eq!(session.history().len(), 4);
}

#[tokio::test]
async fn missing_api_key_yields_connection_apology() {
    let transport = GeminiTransport::new(AdvisorConfig::default()).unwrap();
    let mut session = create_financial_chat(&[], Arc::new(transport));
    assert_eq!(session.send_message("hello").await, CONNECTION_TROUBLE);
}

#[tokio::test]
async fn unreachable_endpoint_yields_connection_apology() {
    let transport = GeminiTransport::new(AdvisorConfig {
        api_key: Some("test-key".to_string()),
        base_url: "http://127.0.0.1:9".to_string(),
        timeout_secs: 2,
        ..Default::default()
    })
    .unwrap();
    let mut session = create_financial_chat(Ledger::seeded().transactions(), Arc::new(transport));
    assert_eq!(session.send_message("hello").await, CONNECTION_TROUBLE);
}
