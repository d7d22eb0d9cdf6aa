//! Souq Admin - a terminal dashboard for the Souq food-delivery marketplace.
//!
//! Manage users, restaurants, orders, categories, coupons and platform
//! settings in English or Arabic.

mod api;
mod app;
mod cache;
mod config;
mod error;
mod events;
mod i18n;
mod logging;
mod table;
mod tasks;
mod terminal;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use crate::api::types::AdminSession;
use crate::api::{ClientOptions, SouqClient};
use crate::app::App;
use crate::config::Config;
use crate::error::AppError;
use crate::events::EventHandler;
use crate::i18n::Language;
use crate::tasks::ApiMessage;
use crate::terminal::TerminalGuard;
use crate::ui::{init_theme, Theme};

#[derive(Parser, Debug)]
#[command(name = "souq-admin")]
#[command(about = "Terminal admin dashboard for the Souq food-delivery marketplace")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, short, env = "SOUQ_CONFIG")]
    config: Option<PathBuf>,

    /// Display language: en or ar
    #[arg(long, short)]
    lang: Option<Language>,

    /// Answer requests immediately instead of simulating network latency
    #[arg(long, conflicts_with = "latency_ms")]
    no_latency: bool,

    /// Fixed simulated latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Start signed in as the configured admin
    #[arg(long)]
    skip_login: bool,

    /// Event loop tick in milliseconds
    #[arg(long, default_value = "100")]
    tick_rate: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init()?;

    let loaded = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            (Config::default(), Some(e))
        }
    };
    let settings = config.settings;

    let mut options = ClientOptions::from_settings(&settings);
    if args.no_latency {
        options = options.instant();
    } else if let Some(ms) = args.latency_ms {
        options = options.with_latency(Duration::from_millis(ms));
    }
    let client = SouqClient::seeded(options);
    let (mut rx, spawner) = tasks::create_task_channel();

    init_theme(Theme::default());
    let mut app = App::new(&settings, client, spawner);
    if let Some(lang) = args.lang {
        app.set_language(lang);
    }
    if let Some(e) = config_error {
        app.handle_error(&AppError::from(e));
    }
    if args.skip_login {
        let display_name = settings
            .admin_email
            .split('@')
            .next()
            .unwrap_or("admin")
            .to_string();
        app.sign_in(AdminSession {
            email: settings.admin_email.clone(),
            display_name,
        });
    }

    let result = run(&mut app, &mut rx, args.tick_rate);
    logging::shutdown();
    if let (Err(e), Some(dir)) = (&result, logging::log_directory()) {
        eprintln!("souq-admin: {:#} (logs: {})", e, dir.display());
    }
    result
}

/// Draw, wait for input, apply finished tasks. The terminal is restored on return.
fn run(app: &mut App, rx: &mut UnboundedReceiver<ApiMessage>, tick_rate: u64) -> Result<()> {
    let mut guard = TerminalGuard::new()?;
    let events = EventHandler::with_tick_rate(tick_rate);
    info!("Entering main loop");

    while !app.should_quit() {
        guard.terminal().draw(|frame| app.view(frame))?;

        let event = events.next()?;
        app.update(event);

        while let Ok(message) = rx.try_recv() {
            app.handle_api_message(message);
        }
    }
    Ok(())
}
