use std::future::Future;

use gaia_core::config::MessagesConfig;
use gaia_core::error::Result;
use gaia_core::types::*;

/// Turn a matched trigger into the final answer.
///
/// `lookup` is only awaited for `ask_location`; every other action is answered
/// from the trigger alone.
pub async fn resolve<F, Fut>(
    trigger: &Trigger,
    messages: &MessagesConfig,
    lookup: F,
) -> OutgoingResponse
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<StudioProfile>>>,
{
    match trigger.action_type {
        ActionType::Greeting => greeting(trigger),
        ActionType::AskLocation => {
            let profile = match lookup().await {
                Ok(Some(profile)) => profile,
                Ok(None) => {
                    tracing::warn!(trigger_id = %trigger.id, "studio profile not found");
                    return OutgoingResponse::text(&messages.location_unavailable);
                }
                Err(e) => {
                    tracing::warn!(trigger_id = %trigger.id, error = %e, "studio profile lookup failed");
                    return OutgoingResponse::text(&messages.location_unavailable);
                }
            };
            location(trigger, &profile, messages)
        }
        // Booking flow is not wired yet; answer with the stored text.
        ActionType::AskAppointment => OutgoingResponse::text(&trigger.response_text),
        ActionType::Generic => OutgoingResponse::text(&trigger.response_text),
    }
}

fn greeting(trigger: &Trigger) -> OutgoingResponse {
    let row = trigger
        .buttons()
        .unwrap_or_default()
        .iter()
        .map(|button| Button {
            label: button.label.clone(),
            url: button.url_template.clone(),
        })
        .collect();
    OutgoingResponse::with_row(&trigger.response_text, row)
}

fn location(trigger: &Trigger, profile: &StudioProfile, messages: &MessagesConfig) -> OutgoingResponse {
    if let (Some(maps_url), Some(buttons)) = (profile.maps_url(), trigger.buttons()) {
        let row = buttons
            .iter()
            .map(|button| Button {
                label: button.label.clone(),
                url: button.url_template.replace(GOOGLE_MAPS_PLACEHOLDER, maps_url),
            })
            .collect();
        return OutgoingResponse::with_row(&trigger.response_text, row);
    }

    match profile.formatted_address() {
        Some(address) => OutgoingResponse::text(format!(
            "{}\n\n{}{address}",
            trigger.response_text, messages.address_prefix
        )),
        None => OutgoingResponse::text(&messages.address_not_configured),
    }
}
