//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use studio_i18n::{Catalog, Language};
use studio_outline::OutlineGenerator;
use studio_shared::{
    AppConfig, Latency, ProjectIdeaInput, init_config, load_config, load_config_from,
    validate_api_key,
};

use crate::routes::{self, AppState};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Studio — contact form and AI demo backend for the agency website.
#[derive(Parser)]
#[command(
    name = "studio",
    version,
    about = "Serve the studio website API: contact submissions, project outlines and UI text.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.studio/studio.toml).
    #[arg(long, global = true, env = "STUDIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start the HTTP API.
    Serve {
        /// Address to bind (overrides [server] host).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides [server] port).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate a project outline for an idea and print it as JSON.
    Outline {
        /// Free-text project idea (10-1000 characters).
        idea: String,

        /// Skip the simulated processing delay.
        #[arg(long)]
        no_delay: bool,
    },

    /// Look up a UI text key.
    Translate {
        /// Dotted key, e.g. `nav.home`.
        key: String,

        /// Language: en or ru.
        #[arg(short, long, default_value = "en")]
        lang: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "studio=info,tower_http=info",
        1 => "studio=debug,tower_http=debug",
        _ => "studio=trace,tower_http=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { host, port } => {
            let config = resolve_config(cli.config.as_deref())?;
            cmd_serve(&config, host, port).await
        }
        Command::Outline { idea, no_delay } => {
            let config = resolve_config(cli.config.as_deref())?;
            cmd_outline(&config, idea, no_delay).await
        }
        Command::Translate { key, lang } => cmd_translate(&key, &lang),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(cli.config.as_deref()),
        },
    }
}

fn resolve_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

async fn cmd_serve(config: &AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let api_key = validate_api_key(config)?;
    let state = AppState::from_config(config, &api_key)?;

    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("failed to bind {addr}: {e}"))?;

    info!(
        %addr,
        provider = ?config.email.provider,
        outline_delay_ms = config.outline.max_delay_ms,
        "studio API listening"
    );

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| eyre!("server error: {e}"))?;

    info!("studio API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

async fn cmd_outline(config: &AppConfig, idea: String, no_delay: bool) -> Result<()> {
    let latency = if no_delay {
        Latency::NONE
    } else {
        config.outline.latency()
    };
    let generator = OutlineGenerator::new(latency);

    let spinner = Spinner::new("Analyzing your idea")?;
    let result = generator.generate(&ProjectIdeaInput::new(idea)).await;
    spinner.finish();

    let outline = result?;
    println!("{}", serde_json::to_string_pretty(&outline)?);
    Ok(())
}

fn cmd_translate(key: &str, lang: &str) -> Result<()> {
    let language: Language = lang.parse()?;
    let catalog = Catalog::builtin()?;
    println!("{}", catalog.t(language, key));
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&std::path::Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI spinner
// ---------------------------------------------------------------------------

/// Spinner shown while a simulated remote call is in flight.
struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn new(message: &str) -> Result<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Ok(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
