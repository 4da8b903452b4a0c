//! The two contact-form dispatches: owner notification and submitter receipt.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use studio_shared::{
    ContactSubmission, DispatchConfig, EmailConfig, EmailDispatchResult, Latency, Result,
    StudioError,
};

use crate::transport::{Email, EmailTransport};

/// Message shown when the primary dispatch hits a simulated provider error.
pub const TRANSIENT_FAILURE_MESSAGE: &str = "Temporary error sending email. Please try again.";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which of the two emails a dispatch sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Primary,
    Confirmation,
}

impl DispatchKind {
    fn id_prefix(&self) -> &'static str {
        match self {
            Self::Primary => "msg",
            Self::Confirmation => "conf",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            Self::Primary => "Thank you! We'll get back to you within 24 hours.",
            Self::Confirmation => "Confirmation email sent",
        }
    }

    fn rejected_message(&self) -> &'static str {
        match self {
            Self::Primary => "Failed to send email",
            Self::Confirmation => "Failed to send confirmation email",
        }
    }
}

impl std::fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Confirmation => f.write_str("confirmation"),
        }
    }
}

/// Simulated provider behaviour applied before a dispatch reaches the transport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchProfile {
    pub latency: Latency,
    /// Probability in `[0, 1]` of a simulated transient error.
    pub failure_rate: f64,
}

impl DispatchProfile {
    /// No delay, never fails on its own.
    pub const IMMEDIATE: Self = Self {
        latency: Latency::NONE,
        failure_rate: 0.0,
    };
}

impl Default for DispatchProfile {
    fn default() -> Self {
        Self::IMMEDIATE
    }
}

impl From<&DispatchConfig> for DispatchProfile {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            latency: config.latency(),
            failure_rate: config.failure_rate,
        }
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Composes contact emails and sends them through an [`EmailTransport`].
#[derive(Clone)]
pub struct Mailer {
    transport: Arc<dyn EmailTransport>,
    contact_address: String,
    primary: DispatchProfile,
    confirmation: DispatchProfile,
    timeout: Duration,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailer")
            .field("transport", &self.transport.name())
            .field("contact_address", &self.contact_address)
            .field("primary", &self.primary)
            .field("confirmation", &self.confirmation)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Mailer {
    pub fn new(transport: Arc<dyn EmailTransport>, contact_address: impl Into<String>) -> Self {
        Self {
            transport,
            contact_address: contact_address.into(),
            primary: DispatchProfile::IMMEDIATE,
            confirmation: DispatchProfile::IMMEDIATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Mailer with the profiles, inbox and timeout from `[email]`.
    pub fn from_config(config: &EmailConfig, transport: Arc<dyn EmailTransport>) -> Self {
        Self::new(transport, config.contact_address())
            .with_primary((&config.primary).into())
            .with_confirmation((&config.confirmation).into())
            .with_timeout(config.timeout())
    }

    pub fn with_primary(mut self, profile: DispatchProfile) -> Self {
        self.primary = profile;
        self
    }

    pub fn with_confirmation(mut self, profile: DispatchProfile) -> Self {
        self.confirmation = profile;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn contact_address(&self) -> &str {
        &self.contact_address
    }

    /// Notify the studio inbox about a new inquiry.
    #[instrument(skip_all, fields(transport = self.transport.name()))]
    pub async fn send_primary(&self, form: &ContactSubmission) -> Result<EmailDispatchResult> {
        let email = primary_email(form, &self.contact_address);
        self.dispatch(DispatchKind::Primary, email, self.primary).await
    }

    /// Send the courtesy receipt to the submitter.
    #[instrument(skip_all, fields(transport = self.transport.name()))]
    pub async fn send_confirmation(
        &self,
        form: &ContactSubmission,
    ) -> Result<EmailDispatchResult> {
        let email = confirmation_email(form);
        self.dispatch(DispatchKind::Confirmation, email, self.confirmation)
            .await
    }

    async fn dispatch(
        &self,
        kind: DispatchKind,
        email: Email,
        profile: DispatchProfile,
    ) -> Result<EmailDispatchResult> {
        let attempt = async {
            let (delay, transient_failure) = {
                let mut rng = rand::rng();
                (
                    profile.latency.sample(&mut rng),
                    rng.random_bool(profile.failure_rate.clamp(0.0, 1.0)),
                )
            };

            if !delay.is_zero() {
                debug!(%kind, delay_ms = delay.as_millis() as u64, "simulating provider latency");
                tokio::time::sleep(delay).await;
            }

            if transient_failure {
                warn!(%kind, "simulated transient provider error");
                return Ok(EmailDispatchResult {
                    success: false,
                    message: TRANSIENT_FAILURE_MESSAGE.into(),
                    id: None,
                });
            }

            let delivery = self.transport.send(&email).await?;
            if !delivery.success {
                return Ok(EmailDispatchResult {
                    success: false,
                    message: kind.rejected_message().into(),
                    id: None,
                });
            }

            let id = delivery
                .id
                .unwrap_or_else(|| format!("{}_{}", kind.id_prefix(), Uuid::now_v7().simple()));
            info!(%kind, to = %email.to, %id, "email dispatched");

            Ok(EmailDispatchResult {
                success: true,
                message: kind.success_message().into(),
                id: Some(id),
            })
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(StudioError::Dispatch(format!(
                "{kind} email timed out after {}s",
                self.timeout.as_secs_f64()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Message composition
// ---------------------------------------------------------------------------

/// Owner notification listing every submitted field.
pub fn primary_email(form: &ContactSubmission, contact_address: &str) -> Email {
    let body = format!(
        "New Project Inquiry\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Company: {company}\n\
         Budget: {budget} ({budget_value})\n\
         Timeline: {timeline} ({timeline_value})\n\
         Needs AI: {needs_ai}\n\
         Referral source: {referral}\n\
         Submitted: {submitted}\n\n\
         Project Goals:\n{goals}\n",
        name = form.name,
        email = form.email,
        company = form.company.as_deref().unwrap_or("Not provided"),
        budget = form.budget.label(),
        budget_value = form.budget,
        timeline = form.timeline.label(),
        timeline_value = form.timeline,
        needs_ai = if form.needs_ai { "Yes" } else { "No" },
        referral = form.referral_source.as_deref().unwrap_or("Not provided"),
        submitted = Utc::now().to_rfc3339(),
        goals = form.project_goals,
    );

    Email {
        to: contact_address.to_string(),
        subject: format!("New Project Inquiry from {}", form.name),
        body,
        reply_to: Some(form.email.clone()),
    }
}

/// Receipt sent back to the person who filled in the form.
pub fn confirmation_email(form: &ContactSubmission) -> Email {
    let body = format!(
        "Hi {name},\n\n\
         Thanks for reaching out! We received your project inquiry and will get back \
         to you within 24 hours.\n\n\
         Budget: {budget}\n\
         Timeline: {timeline}\n",
        name = form.name,
        budget = form.budget.label(),
        timeline = form.timeline.label(),
    );

    Email {
        to: form.email.clone(),
        subject: "We received your project inquiry".into(),
        body,
        reply_to: None,
    }
}
