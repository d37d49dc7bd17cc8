//! The `EmailSender` trait — the contract every outbound channel fulfils.

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::SendError;

/// One rendered email ready for dispatch.  Field names serialize to the
/// remote send function's wire shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub content: String,
    pub from_name: String,
    pub candidate_id: Uuid,
    pub email_type: String,
}

/// The outbound dispatch trait.
///
/// Implementations do not enforce a deadline themselves; callers wrap
/// `send` in their own timeout.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendError>;
}
