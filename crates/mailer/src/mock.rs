//! `MockMailer` — a test double for `EmailSender`.
//!
//! Records every email it is asked to send and returns a
//! programmer-specified result, optionally after a delay (useful with
//! paused-time tests to hold an execution in flight).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::{EmailSender, OutboundEmail, SendError};

/// Behaviour injected into `MockMailer` at construction time.
pub enum MockBehaviour {
    /// Accept the email immediately.
    Succeed,
    /// Accept the email after sleeping for the given duration.
    SucceedAfter(Duration),
    /// Fail with the given error.
    Fail(SendError),
}

/// A mock sender that records every call it receives.
pub struct MockMailer {
    pub behaviour: MockBehaviour,
    /// All emails seen by this mailer (in call order).
    pub sent: Arc<Mutex<Vec<OutboundEmail>>>,
}

impl MockMailer {
    /// A mailer that accepts everything.
    pub fn succeeding() -> Self {
        Self {
            behaviour: MockBehaviour::Succeed,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mailer that accepts everything after a delay.
    pub fn succeeding_after(delay: Duration) -> Self {
        Self {
            behaviour: MockBehaviour::SucceedAfter(delay),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mailer that rejects everything with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            behaviour: MockBehaviour::Fail(SendError::Rejected(message.into())),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of emails dispatched through this mailer.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Snapshot of every recorded email.
    pub fn sent_emails(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for MockMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendError> {
        match &self.behaviour {
            MockBehaviour::Succeed => {
                self.sent.lock().unwrap().push(email.clone());
                Ok(())
            }
            MockBehaviour::SucceedAfter(delay) => {
                tokio::time::sleep(*delay).await;
                self.sent.lock().unwrap().push(email.clone());
                Ok(())
            }
            MockBehaviour::Fail(err) => Err(err.clone()),
        }
    }
}
