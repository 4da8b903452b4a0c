//! Contact submission pipeline: validate, fan out both dispatches, settle.

use serde_json::Value;
use tracing::{error, info, instrument, warn};

use studio_shared::{ContactSubmission, EmailDispatchResult, Result, StudioError, SubmissionResult};

use crate::dispatch::Mailer;
use crate::validation::validate_submission;

/// Handles contact form submissions end to end.
#[derive(Debug, Clone)]
pub struct ContactService {
    mailer: Mailer,
}

impl ContactService {
    pub fn new(mailer: Mailer) -> Self {
        Self { mailer }
    }

    pub fn mailer(&self) -> &Mailer {
        &self.mailer
    }

    /// Validate a raw form body, then deliver it.
    ///
    /// Nothing is sent unless validation passes.
    #[instrument(skip_all)]
    pub async fn submit(&self, body: &Value) -> Result<SubmissionResult> {
        let form = validate_submission(body)?;
        self.deliver(&form).await
    }

    /// Run both dispatches concurrently and wait for both to settle.
    #[instrument(skip_all, fields(budget = %form.budget, needs_ai = form.needs_ai))]
    pub async fn deliver(&self, form: &ContactSubmission) -> Result<SubmissionResult> {
        let (primary, confirmation) = tokio::join!(
            self.mailer.send_primary(form),
            self.mailer.send_confirmation(form),
        );

        settle(primary, confirmation)
    }
}

/// Combine both dispatch outcomes. The primary alone decides success.
pub fn settle(
    primary: Result<EmailDispatchResult>,
    confirmation: Result<EmailDispatchResult>,
) -> Result<SubmissionResult> {
    match &confirmation {
        Ok(result) if result.success => {}
        Ok(result) => warn!(message = %result.message, "failed to send confirmation email"),
        Err(e) => warn!(error = %e, "failed to send confirmation email"),
    }

    match primary {
        Ok(result) if result.success => {
            info!(id = result.id.as_deref().unwrap_or(""), "contact submission delivered");
            Ok(result)
        }
        Ok(result) => {
            error!(message = %result.message, "primary email reported failure");
            Err(StudioError::Dispatch(result.message))
        }
        Err(e) => {
            error!(error = %e, "primary email failed");
            Err(StudioError::Dispatch(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::dispatch::{DispatchProfile, TRANSIENT_FAILURE_MESSAGE};
    use crate::transport::{Delivery, Email, EmailTransport};
    use studio_shared::Latency;

    const INBOX: &str = "hello@studio.com";

    /// Records every send; fails for the configured recipients.
    #[derive(Default)]
    struct ScriptedTransport {
        sent: Mutex<Vec<Email>>,
        error_for: Vec<String>,
        reject_for: Vec<String>,
    }

    impl ScriptedTransport {
        fn erroring_for(recipient: &str) -> Self {
            Self {
                error_for: vec![recipient.to_string()],
                ..Self::default()
            }
        }

        fn rejecting_for(recipient: &str) -> Self {
            Self {
                reject_for: vec![recipient.to_string()],
                ..Self::default()
            }
        }

        fn recipients(&self) -> Vec<String> {
            let mut recipients: Vec<String> = self
                .sent
                .lock()
                .expect("sent lock")
                .iter()
                .map(|e| e.to.clone())
                .collect();
            recipients.sort();
            recipients
        }
    }

    #[async_trait]
    impl EmailTransport for ScriptedTransport {
        async fn send(&self, email: &Email) -> Result<Delivery> {
            if self.error_for.contains(&email.to) {
                return Err(StudioError::Transport("connection reset".into()));
            }
            self.sent.lock().expect("sent lock").push(email.clone());
            if self.reject_for.contains(&email.to) {
                return Ok(Delivery::rejected());
            }
            Ok(Delivery::sent(Some(format!("prov_{}", email.to))))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn service(transport: Arc<ScriptedTransport>) -> ContactService {
        ContactService::new(Mailer::new(transport, INBOX))
    }

    fn body() -> Value {
        json!({
            "name": "Al",
            "email": "al@example.com",
            "budget": "under-10k",
            "timeline": "asap",
            "projectGoals": "Launch a landing page",
            "needsAI": true,
        })
    }

    fn ok(message: &str) -> Result<EmailDispatchResult> {
        Ok(EmailDispatchResult {
            success: true,
            message: message.into(),
            id: Some("id_1".into()),
        })
    }

    #[tokio::test]
    async fn both_succeed() {
        let transport = Arc::new(ScriptedTransport::default());
        let result = service(transport.clone()).submit(&body()).await.expect("submit");

        assert!(result.success);
        assert_eq!(result.message, "Thank you! We'll get back to you within 24 hours.");
        assert_eq!(result.id.as_deref(), Some("prov_hello@studio.com"));
        assert_eq!(transport.recipients(), vec!["al@example.com", INBOX]);
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut body = body();
        body["projectGoals"] = json!("x".repeat(19));

        let err = service(transport.clone()).submit(&body).await.unwrap_err();
        assert_eq!(err.field_errors()[0].field, "projectGoals");
        assert!(transport.recipients().is_empty());
    }

    #[tokio::test]
    async fn primary_error_fails_even_if_confirmation_succeeds() {
        let transport = Arc::new(ScriptedTransport::erroring_for(INBOX));
        let err = service(transport.clone()).submit(&body()).await.unwrap_err();

        assert!(matches!(err, StudioError::Dispatch(_)));
        // The confirmation still went out; neither dispatch cancels the other.
        assert_eq!(transport.recipients(), vec!["al@example.com"]);
    }

    #[tokio::test]
    async fn primary_rejection_fails() {
        let transport = Arc::new(ScriptedTransport::rejecting_for(INBOX));
        let err = service(transport).submit(&body()).await.unwrap_err();
        assert!(matches!(err, StudioError::Dispatch(_)));
    }

    #[tokio::test]
    async fn confirmation_failure_is_not_surfaced() {
        let transport = Arc::new(ScriptedTransport::erroring_for("al@example.com"));
        let result = service(transport.clone()).submit(&body()).await.expect("submit");

        assert!(result.success);
        assert_eq!(result.id.as_deref(), Some("prov_hello@studio.com"));
        assert_eq!(transport.recipients(), vec![INBOX]);
    }

    #[tokio::test]
    async fn simulated_primary_failure_fails_submission() {
        let transport = Arc::new(ScriptedTransport::default());
        let mailer = Mailer::new(transport.clone(), INBOX).with_primary(DispatchProfile {
            latency: Latency::NONE,
            failure_rate: 1.0,
        });

        let err = ContactService::new(mailer).submit(&body()).await.unwrap_err();
        assert_eq!(err.to_string(), format!("dispatch error: {TRANSIENT_FAILURE_MESSAGE}"));
        assert_eq!(transport.recipients(), vec!["al@example.com"]);
    }

    #[test]
    fn settle_echoes_primary_result() {
        let confirmation = Err(StudioError::Transport("smtp down".into()));
        let result = settle(ok("primary ok"), confirmation).expect("settled");
        assert_eq!(result.message, "primary ok");
        assert_eq!(result.id.as_deref(), Some("id_1"));
    }

    #[test]
    fn settle_gates_on_primary_only() {
        let failed = Ok(EmailDispatchResult {
            success: false,
            message: "nope".into(),
            id: None,
        });
        assert!(settle(failed, ok("confirmation ok")).is_err());

        let thrown = Err(StudioError::Transport("boom".into()));
        let err = settle(thrown, ok("confirmation ok")).unwrap_err();
        assert_eq!(err.to_string(), "dispatch error: transport error: boom");
    }
}
