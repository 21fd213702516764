//! Gymbot — webhook fulfillment entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at configured level
//!   4. Build session store, credential provider, notifier
//!   5. Spawn Ctrl-C → shutdown signal watcher
//!   6. Serve the webhook until shutdown

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use gymbot::push::{GoogleTokenProvider, Notifier};
use gymbot::session::{InMemorySessionStore, SessionStore};
use gymbot::webhook::{self, AppState};
use gymbot::{config, error, logger};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), error::AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;

    logger::init(&config.log_level)?;

    info!(
        bot_name = %config.bot_name,
        bind = %config.bind,
        log_level = %config.log_level,
        push_endpoint = %config.push.endpoint,
        sandbox = config.push.sandbox,
        "config loaded"
    );

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
    let tokens = Arc::new(GoogleTokenProvider::new(&config.push));
    let notifier = Arc::new(Notifier::new(&config.push, tokens)?);

    let state = AppState {
        bot_name: Arc::from(config.bot_name.as_str()),
        notification_intent: Arc::from(config.push.notification_intent.as_str()),
        store,
        notifier,
    };

    // Shared shutdown token — Ctrl-C cancels it, the server watches it.
    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received — initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    webhook::serve(&config.bind, state, shutdown).await
}
