//! Email provider boundary and the built-in transports.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use studio_shared::{Result, StudioError};

/// User-Agent string for provider requests.
const USER_AGENT: &str = concat!("studio/", env!("CARGO_PKG_VERSION"));

/// Characters of the body echoed by [`LogTransport`].
const PREVIEW_CHARS: usize = 100;

/// A single outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// What the provider reported for one send.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delivery {
    pub success: bool,
    /// Provider message id, when the provider issues one.
    pub id: Option<String>,
}

impl Delivery {
    pub fn sent(id: Option<String>) -> Self {
        Self { success: true, id }
    }

    pub fn rejected() -> Self {
        Self {
            success: false,
            id: None,
        }
    }
}

/// Sends one email. `Err` means the provider could not be reached at all;
/// a reachable provider that refuses the message returns `success = false`.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, email: &Email) -> Result<Delivery>;

    /// Human-readable transport name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// LogTransport
// ---------------------------------------------------------------------------

/// Simulated provider: every email becomes a structured log event.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl EmailTransport for LogTransport {
    async fn send(&self, email: &Email) -> Result<Delivery> {
        let preview: String = email.body.chars().take(PREVIEW_CHARS).collect();
        info!(
            to = %email.to,
            subject = %email.subject,
            reply_to = email.reply_to.as_deref().unwrap_or(""),
            preview = %preview,
            "mock email sent"
        );
        Ok(Delivery::sent(None))
    }

    fn name(&self) -> &str {
        "log"
    }
}

// ---------------------------------------------------------------------------
// ResendTransport
// ---------------------------------------------------------------------------

/// Delivers through the Resend HTTP API (`POST {base_url}/emails`).
#[derive(Debug, Clone)]
pub struct ResendTransport {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    #[serde(default)]
    id: Option<String>,
}

impl ResendTransport {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        from: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| StudioError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            from: from.into(),
        })
    }
}

#[async_trait]
impl EmailTransport for ResendTransport {
    async fn send(&self, email: &Email) -> Result<Delivery> {
        let request = ResendRequest {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            text: &email.body,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| StudioError::Transport(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(%status, detail = %detail, "email provider rejected message");
            return Ok(Delivery::rejected());
        }

        let body: ResendResponse = response
            .json()
            .await
            .map_err(|e| StudioError::Transport(format!("invalid provider response: {e}")))?;

        Ok(Delivery::sent(body.id))
    }

    fn name(&self) -> &str {
        "resend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn email() -> Email {
        Email {
            to: "hello@studio.com".into(),
            subject: "New Project Inquiry from Ada".into(),
            body: "Name: Ada".into(),
            reply_to: Some("ada@example.com".into()),
        }
    }

    fn transport(server: &MockServer) -> ResendTransport {
        ResendTransport::new(
            &server.uri(),
            "test-key",
            "noreply@studio.com",
            Duration::from_secs(5),
        )
        .expect("build transport")
    }

    #[tokio::test]
    async fn log_transport_always_succeeds() {
        let delivery = LogTransport.send(&email()).await.expect("send");
        assert!(delivery.success);
        assert_eq!(delivery.id, None);
    }

    #[tokio::test]
    async fn resend_success_returns_provider_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "from": "noreply@studio.com",
                "to": ["hello@studio.com"],
                "subject": "New Project Inquiry from Ada",
                "reply_to": "ada@example.com",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "re_123" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let delivery = transport(&server).send(&email()).await.expect("send");
        assert_eq!(delivery, Delivery::sent(Some("re_123".into())));
    }

    #[tokio::test]
    async fn resend_error_status_is_a_rejection() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(422).set_body_string("invalid from"))
            .mount(&server)
            .await;

        let delivery = transport(&server).send(&email()).await.expect("send");
        assert!(!delivery.success);
    }

    #[tokio::test]
    async fn unreachable_provider_is_an_error() {
        let transport = ResendTransport::new(
            "http://127.0.0.1:9",
            "test-key",
            "noreply@studio.com",
            Duration::from_secs(2),
        )
        .expect("build transport");

        let err = transport.send(&email()).await.unwrap_err();
        assert!(matches!(err, StudioError::Transport(_)));
    }
}
