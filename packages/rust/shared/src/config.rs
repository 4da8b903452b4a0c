//! Application configuration for the studio backend.
//!
//! User config lives at `~/.studio/studio.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StudioError};
use crate::types::Latency;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "studio.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".studio";

/// Env var that overrides `[email] contact_address`.
pub const CONTACT_EMAIL_ENV: &str = "CONTACT_EMAIL";

// ---------------------------------------------------------------------------
// Config structs (matching studio.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// AI demo widget.
    #[serde(default)]
    pub outline: OutlineConfig,

    /// Contact form email delivery.
    #[serde(default)]
    pub email: EmailConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}

/// `[outline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Lower bound of the cosmetic "thinking" delay.
    #[serde(default = "default_outline_min_delay")]
    pub min_delay_ms: u64,

    /// Upper bound of the cosmetic "thinking" delay.
    #[serde(default = "default_outline_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_outline_min_delay(),
            max_delay_ms: default_outline_max_delay(),
        }
    }
}

impl OutlineConfig {
    pub fn latency(&self) -> Latency {
        Latency::between_ms(self.min_delay_ms, self.max_delay_ms)
    }
}

fn default_outline_min_delay() -> u64 {
    1500
}
fn default_outline_max_delay() -> u64 {
    2500
}

/// Which email provider delivers contact form messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailProvider {
    /// Simulated provider: emails are written to the log.
    #[default]
    Log,
    /// Resend HTTP API.
    Resend,
}

/// `[email]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub provider: EmailProvider,

    /// Inbox that receives project inquiries.
    #[serde(default = "default_contact_address")]
    pub contact_address: String,

    /// Sender address used for both emails.
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Upper bound on a single dispatch, including simulated latency.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Owner notification.
    #[serde(default = "DispatchConfig::primary")]
    pub primary: DispatchConfig,

    /// Courtesy receipt to the submitter.
    #[serde(default = "DispatchConfig::confirmation")]
    pub confirmation: DispatchConfig,

    #[serde(default)]
    pub resend: ResendConfig,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::default(),
            contact_address: default_contact_address(),
            from_address: default_from_address(),
            timeout_secs: default_timeout_secs(),
            primary: DispatchConfig::primary(),
            confirmation: DispatchConfig::confirmation(),
            resend: ResendConfig::default(),
        }
    }
}

impl EmailConfig {
    /// Contact inbox, honouring the `CONTACT_EMAIL` override.
    pub fn contact_address(&self) -> String {
        match std::env::var(CONTACT_EMAIL_ENV) {
            Ok(addr) if !addr.trim().is_empty() => addr,
            _ => self.contact_address.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_contact_address() -> String {
    "hello@studio.com".into()
}
fn default_from_address() -> String {
    "noreply@studio.com".into()
}
fn default_timeout_secs() -> u64 {
    10
}

/// `[email.primary]` / `[email.confirmation]` sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub min_delay_ms: u64,

    #[serde(default)]
    pub max_delay_ms: u64,

    /// Probability in `[0, 1]` of a simulated transient provider error.
    #[serde(default)]
    pub failure_rate: f64,
}

impl DispatchConfig {
    fn primary() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 1500,
            failure_rate: 0.05,
        }
    }

    fn confirmation() -> Self {
        Self {
            min_delay_ms: 500,
            max_delay_ms: 500,
            failure_rate: 0.0,
        }
    }

    pub fn latency(&self) -> Latency {
        Latency::between_ms(self.min_delay_ms, self.max_delay_ms)
    }
}

/// `[email.resend]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResendConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_resend_base_url")]
    pub base_url: String,
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_resend_base_url(),
        }
    }
}

fn default_api_key_env() -> String {
    "RESEND_API_KEY".into()
}
fn default_resend_base_url() -> String {
    "https://api.resend.com".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.studio/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| StudioError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.studio/studio.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| StudioError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| StudioError::config(format!("failed to parse {}: {e}", path.display())))?;

    validate_config(&config)?;
    Ok(config)
}

/// Reject values that would make the runtime misbehave.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    for (name, dispatch) in [
        ("primary", &config.email.primary),
        ("confirmation", &config.email.confirmation),
    ] {
        if !(0.0..=1.0).contains(&dispatch.failure_rate) {
            return Err(StudioError::config(format!(
                "email.{name}.failure_rate must be between 0 and 1, got {}",
                dispatch.failure_rate
            )));
        }
    }

    if config.email.timeout_secs == 0 {
        return Err(StudioError::config("email.timeout_secs must be at least 1"));
    }

    if config.email.provider == EmailProvider::Resend {
        url::Url::parse(&config.email.resend.base_url).map_err(|e| {
            StudioError::config(format!(
                "email.resend.base_url '{}' is not a valid URL: {e}",
                config.email.resend.base_url
            ))
        })?;
    }

    Ok(())
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| StudioError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content = toml::to_string_pretty(&config).map_err(|e| StudioError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| StudioError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check that the Resend API key env var is set and non-empty.
///
/// Always succeeds for the simulated provider.
pub fn validate_api_key(config: &AppConfig) -> Result<String> {
    if config.email.provider != EmailProvider::Resend {
        return Ok(String::new());
    }

    let var_name = &config.email.resend.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(StudioError::config(format!(
            "Resend API key not found. Set the {var_name} environment variable."
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("contact_address"));
        assert!(toml_str.contains("RESEND_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.email.primary, DispatchConfig::primary());
        assert_eq!(parsed.email.provider, EmailProvider::Log);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let toml_str = r#"
[outline]
min_delay_ms = 0
max_delay_ms = 0

[email]
provider = "resend"

[email.primary]
failure_rate = 0.5
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.outline.latency().is_none());
        assert_eq!(config.email.provider, EmailProvider::Resend);
        assert_eq!(config.email.primary.failure_rate, 0.5);
        assert_eq!(config.email.primary.max_delay_ms, 0);
        assert_eq!(config.email.confirmation.min_delay_ms, 500);
        assert_eq!(config.email.resend.base_url, "https://api.resend.com");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn failure_rate_out_of_range_is_rejected() {
        let mut config = AppConfig::default();
        config.email.confirmation.failure_rate = 1.5;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("email.confirmation.failure_rate"));
    }

    #[test]
    fn load_config_from_reports_parse_errors() {
        let dir = std::env::temp_dir().join(format!("studio-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[server]\nport = \"not a number\"\n").expect("write");

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        assert!(validate_api_key(&config).is_ok());

        config.email.provider = EmailProvider::Resend;
        // Use a unique env var name to avoid interfering with other tests
        config.email.resend.api_key_env = "STUDIO_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
