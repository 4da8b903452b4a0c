//! Studio backend — contact form and AI demo API for the agency website.
//!
//! Serves the contact submission endpoint, the project outline generator
//! and the UI text lookup over HTTP, and exposes the same operations on the
//! command line.

mod commands;
mod routes;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
