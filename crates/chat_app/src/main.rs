mod cli;
mod config;
mod terminal;

use std::sync::Arc;

use anyhow::Result;
use chat_engine::{Backend, ClientRoutes, HttpBackend};
use chat_logging::{chat_error, chat_info};
use chat_relay::{RelayConfig, RelayServer};
use clap::Parser;
use log::LevelFilter;

use cli::{Cli, Command};
use config::AppConfig;

/// Shown by `info` when the backend greeting cannot be fetched.
const INFO_FALLBACK: &str = "Failed to load data from backend.";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let destination = cli
        .global
        .log
        .unwrap_or_else(|| cli.command.default_log_destination());
    let level = if cli.global.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    chat_logging::initialize(destination, level);

    let mut config = AppConfig::load(cli.global.config.as_deref())?;
    config.apply_overrides(&cli.global);

    match cli.command {
        Command::Serve => serve(&config),
        Command::Chat { direct } => {
            let backend = http_backend(&config, direct)?;
            terminal::run_chat(Arc::new(backend), config.reply_policy.clone())
        }
        Command::Info { direct } => info(&config, direct),
    }
}

fn serve(config: &AppConfig) -> Result<()> {
    let relay = RelayServer::new(RelayConfig {
        bind_addr: config.bind_addr,
        backend_url: config.backend_base()?,
    })?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(relay.run())
}

fn info(config: &AppConfig, direct: bool) -> Result<()> {
    let backend = http_backend(config, direct)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let message = match runtime.block_on(backend.info()) {
        Ok(info) => info.message,
        Err(err) => {
            chat_error!("Fetching backend greeting failed: {}", err);
            INFO_FALLBACK.to_string()
        }
    };
    println!("Message from backend: {message}");
    Ok(())
}

/// Client for the relay, or for the backend itself with `direct`.
fn http_backend(config: &AppConfig, direct: bool) -> Result<HttpBackend> {
    let (base, routes) = if direct {
        (config.backend_base()?, ClientRoutes::direct())
    } else {
        (config.relay_base()?, ClientRoutes::default())
    };
    chat_info!("Using {} endpoints at {}", if direct { "backend" } else { "relay" }, base);
    Ok(HttpBackend::new(base, routes, &config.client_settings())?)
}
