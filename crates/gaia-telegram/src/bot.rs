use gaia_core::error::{GaiaError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::*;

pub struct TelegramBot {
    client: Client,
    base_url: String,
}

impl TelegramBot {
    /// Bot for `token` on the Bot API host `api_base` (the public
    /// `https://api.telegram.org`, a self-hosted server, or a test double).
    pub fn with_api_base(api_base: &str, token: &str) -> Self {
        let base_url = format!("{}/bot{token}", api_base.trim_end_matches('/'));
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await?.ok_or_else(|| {
            GaiaError::Telegram("missing result in response".to_string())
        })
    }

    /// Register `url` as the bot's webhook endpoint.
    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        let body = serde_json::json!({
            "url": url,
            "allowed_updates": ["message", "edited_message"],
        });
        self.call::<_, serde_json::Value>("setWebhook", &body).await?;
        Ok(())
    }

    /// Deliver a formatted message. Fails on HTTP errors and on `ok: false`.
    pub async fn send_message(&self, message: &SendMessage) -> Result<()> {
        self.call::<_, serde_json::Value>("sendMessage", message)
            .await?;
        tracing::debug!(chat_id = message.chat_id, "message delivered");
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{method}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GaiaError::Telegram(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GaiaError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let telegram_response: TelegramResponse<T> = response
            .json()
            .await
            .map_err(|e| GaiaError::Telegram(e.without_url().to_string()))?;

        if !telegram_response.ok {
            return Err(GaiaError::Telegram(
                telegram_response
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        Ok(telegram_response.result)
    }
}
