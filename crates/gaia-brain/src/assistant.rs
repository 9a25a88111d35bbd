use std::sync::Arc;

use gaia_core::config::{Config, MessagesConfig};
use gaia_core::types::{IncomingMessage, OutgoingResponse};
use gaia_telegram::types::SendMessage;

use crate::matcher::find_trigger;
use crate::resolver::resolve;
use crate::responder;
use crate::source::{ProfileSource, TriggerSource};

/// The keyword-trigger engine: store → matcher → resolver → responder.
///
/// Holds no per-request state, so one instance serves concurrent webhooks.
pub struct Assistant {
    triggers: Arc<dyn TriggerSource>,
    profiles: Arc<dyn ProfileSource>,
    profile_id: String,
    messages: MessagesConfig,
}

impl Assistant {
    pub fn new(
        triggers: Arc<dyn TriggerSource>,
        profiles: Arc<dyn ProfileSource>,
        config: &Config,
    ) -> Self {
        Self {
            triggers,
            profiles,
            profile_id: config.studio.profile_id.clone(),
            messages: config.messages.clone(),
        }
    }

    /// Compose the answer to a free-text message.
    pub async fn reply(&self, text: &str) -> OutgoingResponse {
        let triggers = match self.triggers.enabled_triggers().await {
            Ok(triggers) => triggers,
            Err(e) => {
                tracing::error!(error = %e, "failed to load triggers");
                return OutgoingResponse::text(&self.messages.memory_failure);
            }
        };

        let Some(trigger) = find_trigger(text, &triggers) else {
            tracing::debug!(candidates = triggers.len(), "no trigger matched");
            return OutgoingResponse::text(&self.messages.not_understood);
        };

        tracing::info!(
            trigger_id = %trigger.id,
            action = trigger.action_type.as_str(),
            "trigger matched"
        );

        resolve(trigger, &self.messages, || self.profiles.profile(&self.profile_id)).await
    }

    /// Compose the answer and format it for the chat it came from.
    pub async fn handle(&self, message: &IncomingMessage) -> SendMessage {
        let response = self.reply(&message.text).await;
        responder::format(message.chat_id, &response)
    }
}
