// SPDX-FileCopyrightText: 2026 Roost Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `roost serve` command implementation.
//!
//! Wires the full gateway: SQLite storage with runtime settings, provider
//! clients, the session store, the router, the inactivity reaper, and the
//! serenity gateway client. Supports graceful shutdown via signal handlers.

use std::sync::Arc;
use std::time::Duration;

use serenity::http::Http;
use tracing::{error, info};

use roost_config::RoostConfig;
use roost_core::{ChannelId, GatewayError};
use roost_discord::{gateway_intents, Handler, SerenityPlatform};
use roost_gemini::GeminiClient;
use roost_models::ModelCatalog;
use roost_openrouter::OpenRouterClient;
use roost_reaper::Reaper;
use roost_router::{Providers, Router};
use roost_session::SessionStore;
use roost_storage::{ConfigController, Database};

use crate::shutdown;

/// Runs the `roost serve` command until a shutdown signal arrives.
pub async fn run_serve(config: RoostConfig) -> Result<(), GatewayError> {
    init_tracing(&config.agent.log_level);
    info!("starting roost serve");

    let Some(token) = config.discord.token.clone() else {
        error!("no discord token configured");
        eprintln!("error: Discord bot token required. Set discord.token or ROOST_DISCORD_TOKEN.");
        return Err(GatewayError::InternalConfig("discord token missing".into()));
    };

    // Storage and the admin-mutable runtime settings.
    let db = Database::open(&config.storage.database_path).await?;
    let controller = Arc::new(
        ConfigController::load(
            db.clone(),
            config.discord.entry_channel_id.map(ChannelId),
            config.reaper.inactivity_timeout_hours,
        )
        .await?,
    );
    let catalog = ModelCatalog::new(&config.agent.default_model, &config.openrouter.model)?;

    // Provider clients: either may be absent, but not both.
    let request_timeout = Duration::from_secs(config.agent.request_timeout_secs);
    let gemini = match &config.gemini.api_key {
        Some(key) => Some(GeminiClient::new(key.clone(), request_timeout)?),
        None => {
            info!("gemini provider disabled (no API key)");
            None
        }
    };
    let openrouter = match &config.openrouter.api_key {
        Some(key) => Some(OpenRouterClient::new(
            key,
            config.openrouter.referer.as_deref(),
            config.openrouter.title.as_deref(),
            request_timeout,
        )?),
        None => {
            info!("openrouter provider disabled (no API key)");
            None
        }
    };
    if gemini.is_none() && openrouter.is_none() {
        error!("no provider API key configured");
        eprintln!(
            "error: at least one provider API key is required. \
             Set gemini.api_key or openrouter.api_key."
        );
        return Err(GatewayError::InternalConfig("no provider configured".into()));
    }
    let providers = Providers::new(gemini, openrouter);

    // The platform needs its own HTTP client so the router can act before
    // the gateway connection is up.
    let http = Arc::new(Http::new(&token));
    let platform = Arc::new(SerenityPlatform::connect(http).await?);

    let store = Arc::new(SessionStore::new());
    let router = Arc::new(Router::new(
        platform.clone(),
        db.clone(),
        controller.clone(),
        catalog.clone(),
        providers,
        store.clone(),
    ));
    let reaper = Arc::new(Reaper::new(
        platform,
        db.clone(),
        controller,
        catalog,
        store,
        Duration::from_secs(config.reaper.sweep_interval_secs),
    ));

    let cancel = shutdown::install_signal_handler();
    {
        let reaper = reaper.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { reaper.run(cancel).await });
    }

    let handler = Handler::new(router, reaper);
    let mut client = serenity::Client::builder(&token, gateway_intents())
        .event_handler(handler)
        .await
        .map_err(|e| GatewayError::Platform {
            message: format!("failed to build discord client: {e}"),
            source: Some(Box::new(e)),
        })?;

    let shard_manager = client.shard_manager.clone();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            cancel.cancelled().await;
            info!("shutting down discord client");
            shard_manager.shutdown_all().await;
        });
    }

    if let Err(e) = client.start().await {
        error!(error = %e, "discord client stopped with error");
        return Err(GatewayError::Platform {
            message: e.to_string(),
            source: Some(Box::new(e)),
        });
    }

    db.close().await?;
    info!("roost serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{log_level},serenity=warn,tracing=warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
