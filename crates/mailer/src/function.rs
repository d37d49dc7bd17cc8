//! `FunctionMailer` — posts outbound email to the remote send function.

use async_trait::async_trait;
use tracing::debug;

use crate::{EmailSender, OutboundEmail, SendError};

/// HTTP client for the hosted send function.
pub struct FunctionMailer {
    client: reqwest::Client,
    function_url: String,
    api_key: Option<String>,
}

impl FunctionMailer {
    /// `function_url` is the full endpoint URL; `api_key`, when present,
    /// is sent as a bearer token.
    pub fn new(function_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            function_url: function_url.into(),
            api_key,
        }
    }
}

#[async_trait]
impl EmailSender for FunctionMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), SendError> {
        debug!(to = %email.to, email_type = %email.email_type, "posting email to send function");

        let mut request = self.client.post(&self.function_url).json(email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected(format!("{status}: {body}")));
        }

        Ok(())
    }
}
