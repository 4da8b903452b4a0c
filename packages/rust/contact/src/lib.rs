//! Contact form submission pipeline.
//!
//! A raw form body is validated against the contact schema, then two
//! independent emails go out concurrently: the owner notification (which
//! decides the outcome) and a best-effort receipt to the submitter.

pub mod dispatch;
pub mod pipeline;
pub mod transport;
pub mod validation;

use std::sync::Arc;

use tracing::info;

use studio_shared::{EmailConfig, EmailProvider, Result};

pub use dispatch::{DispatchKind, DispatchProfile, Mailer};
pub use pipeline::{ContactService, settle};
pub use transport::{Delivery, Email, EmailTransport, LogTransport, ResendTransport};
pub use validation::{is_valid_email, validate_submission};

/// User-facing message for a failed primary dispatch.
pub const DISPATCH_FAILURE_MESSAGE: &str = "Failed to send your message. Please try again.";

/// Build the transport selected by `[email] provider`.
///
/// `api_key` is only read for providers that need one.
pub fn build_transport(config: &EmailConfig, api_key: &str) -> Result<Arc<dyn EmailTransport>> {
    let transport: Arc<dyn EmailTransport> = match config.provider {
        EmailProvider::Log => Arc::new(LogTransport),
        EmailProvider::Resend => Arc::new(ResendTransport::new(
            &config.resend.base_url,
            api_key,
            &config.from_address,
            config.timeout(),
        )?),
    };

    info!(transport = transport.name(), "email transport ready");
    Ok(transport)
}

/// Contact service wired from `[email]`.
pub fn service_from_config(config: &EmailConfig, api_key: &str) -> Result<ContactService> {
    let transport = build_transport(config, api_key)?;
    Ok(ContactService::new(Mailer::from_config(config, transport)))
}
