//! Wall-clock delivery of engine timers.

use std::time::Duration;

use advisor::AdvisorSession;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use engine::{LinkTimer, Scheduler, SignInTimer, WizardTimer};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Everything that reaches the event loop besides terminal input.
#[derive(Debug)]
pub enum AppEvent {
    Wizard(WizardTimer),
    SignIn(SignInTimer),
    Link(LinkTimer),
    ToastExpired(u64),
    /// The chat session comes back together with its answer.
    AdvisorReply {
        session: AdvisorSession,
        reply: String,
    },
}

/// Hides the toast with this id, unless a newer one replaced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastTimer {
    pub id: u64,
}

impl From<ToastTimer> for AppEvent {
    fn from(timer: ToastTimer) -> Self {
        Self::ToastExpired(timer.id)
    }
}

impl From<WizardTimer> for AppEvent {
    fn from(timer: WizardTimer) -> Self {
        Self::Wizard(timer)
    }
}

impl From<SignInTimer> for AppEvent {
    fn from(timer: SignInTimer) -> Self {
        Self::SignIn(timer)
    }
}

impl From<LinkTimer> for AppEvent {
    fn from(timer: LinkTimer) -> Self {
        Self::Link(timer)
    }
}

/// Sleeps on the tokio runtime, then posts the event back to the loop.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    tx: UnboundedSender<AppEvent>,
    timezone: Tz,
}

impl TokioScheduler {
    pub fn new(timezone: Tz) -> (Self, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx, timezone }, rx)
    }

    pub fn sender(&self) -> UnboundedSender<AppEvent> {
        self.tx.clone()
    }
}

impl<E> Scheduler<E> for TokioScheduler
where
    E: Into<AppEvent> + Send + 'static,
{
    fn schedule(&mut self, delay: Duration, event: E) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(event.into()).is_err() {
                tracing::debug!("event loop gone, timer dropped");
            }
        });
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_after_delay() {
        let (mut scheduler, mut rx) = TokioScheduler::new(chrono_tz::America::New_York);
        Scheduler::<LinkTimer>::schedule(
            &mut scheduler,
            Duration::from_millis(20),
            LinkTimer { attempt: 3 },
        );
        assert!(rx.try_recv().is_err());

        match rx.recv().await {
            Some(AppEvent::Link(timer)) => assert_eq!(timer.attempt, 3),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
