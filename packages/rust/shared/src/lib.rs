//! Shared types, error model, and configuration for the studio backend.
//!
//! This crate is the foundation depended on by all other studio crates.
//! It provides:
//! - [`StudioError`] — the unified error type
//! - Domain types ([`ProjectOutline`], [`ContactSubmission`], [`Latency`], ...)
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DispatchConfig, EmailConfig, EmailProvider, OutlineConfig, ResendConfig,
    ServerConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
    validate_api_key, validate_config,
};
pub use error::{FieldError, Result, StudioError};
pub use types::{
    Budget, Complexity, ContactSubmission, EmailDispatchResult, Latency, ProjectIdeaInput,
    ProjectOutline, SubmissionResult, Timeline,
};
