use gaia_brain::Assistant;
use gaia_core::config::Config;
use gaia_core::error::Result;
use gaia_store::StudioStore;
use gaia_telegram::bot::TelegramBot;
use gaia_webhook::WebhookState;
use std::path::Path;
use std::sync::Arc;

mod logging;

#[tokio::main]
async fn main() {
    let config_path = std::env::var("GAIA_CONFIG").unwrap_or_else(|_| "gaia.toml".to_string());

    let config = Config::load(Path::new(&config_path)).unwrap_or_else(|e| {
        eprintln!("fatal: failed to load config: {e}");
        std::process::exit(1);
    });

    logging::init(&config.log);

    // Keep serving so the webhook can answer 500 until credentials are fixed.
    if let Err(e) = config.validate() {
        tracing::warn!(error = %e, "configuration incomplete");
    }

    let store = Arc::new(open_store(&config).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to open studio store");
        std::process::exit(1);
    }));

    let bot = TelegramBot::with_api_base(&config.telegram.api_base_url, &config.telegram.token);
    if !config.telegram.token.is_empty() {
        announce(&bot, &config).await;
    }

    let assistant = Assistant::new(store.clone(), store, &config);
    let state = Arc::new(WebhookState {
        config,
        assistant,
        bot,
    });

    if let Err(e) = gaia_webhook::serve(state).await {
        tracing::error!(error = %e, "webhook stopped");
        std::process::exit(1);
    }
}

async fn open_store(config: &Config) -> Result<StudioStore> {
    if config.database.is_remote() {
        StudioStore::new_remote(&config.database.turso_url, &config.database.turso_token).await
    } else {
        StudioStore::new(&config.database.path).await
    }
}

/// Log the bot identity and register the public webhook URL, if configured.
/// Neither step is required to serve requests.
async fn announce(bot: &TelegramBot, config: &Config) {
    match bot.get_me().await {
        Ok(me) => tracing::info!(
            username = me.username.as_deref().unwrap_or("unknown"),
            "bot identity confirmed"
        ),
        Err(e) => tracing::warn!(error = %e, "getMe failed"),
    }

    if config.telegram.public_url.is_empty() {
        return;
    }

    let url = format!(
        "{}{}",
        config.telegram.public_url.trim_end_matches('/'),
        config.server.webhook_path
    );
    match bot.set_webhook(&url).await {
        Ok(()) => tracing::info!(%url, "webhook registered"),
        Err(e) => tracing::warn!(%url, error = %e, "setWebhook failed"),
    }
}
