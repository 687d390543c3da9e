//! Hostel Admin - warden account console
//!
//! Reviews warden registrations, moves accounts through their lifecycle and
//! summarizes active hostels.

use clap::Parser;
use hostel_admin_core::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod state;

fn main() {
    let cli = cli::Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!(?config, "Starting Hostel Admin");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let app_state = state::AppState::new(config)?;
        commands::run(&app_state, cli.command).await
    });

    match result {
        Ok(output) => print!("{}", ensure_newline(output)),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn ensure_newline(mut output: String) -> String {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output
}
