use gaia_core::types::{OutgoingResponse, ReplyMarkup};
use gaia_telegram::bot::TelegramBot;
use gaia_telegram::types::*;

/// Map a resolved answer onto a `sendMessage` body.
pub fn format(chat_id: i64, response: &OutgoingResponse) -> SendMessage {
    let reply_markup = match &response.reply_markup {
        ReplyMarkup::NoButtons => None,
        ReplyMarkup::InlineKeyboard(rows) => Some(InlineKeyboardMarkup {
            inline_keyboard: rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| InlineKeyboardButton {
                            text: button.label.clone(),
                            url: button.url.clone(),
                        })
                        .collect()
                })
                .collect(),
        }),
    };

    SendMessage {
        chat_id,
        text: response.text.clone(),
        reply_markup,
        parse_mode: PARSE_MODE_MARKDOWN,
    }
}

/// Send once. Delivery failures are logged and reported as `false`, never retried.
pub async fn dispatch(bot: &TelegramBot, message: &SendMessage) -> bool {
    match bot.send_message(message).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(chat_id = message.chat_id, error = %e, "failed to deliver reply");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaia_core::types::Button;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_format_inline_keyboard() {
        let response = OutgoingResponse::with_row(
            "Hello!",
            vec![Button {
                label: "Book".to_string(),
                url: "https://x".to_string(),
            }],
        );
        let json = serde_json::to_value(format(42, &response)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "chat_id": 42,
                "text": "Hello!",
                "reply_markup": {"inline_keyboard": [[{"text": "Book", "url": "https://x"}]]},
                "parse_mode": "Markdown",
            })
        );
    }

    #[test]
    fn test_format_without_buttons() {
        let message = format(7, &OutgoingResponse::text("Hi"));
        assert_eq!(message.reply_markup, None);
        assert_eq!(message.parse_mode, "Markdown");
    }

    #[tokio::test]
    async fn test_dispatch_reports_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bottoken/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .mount(&server)
            .await;

        let bot = TelegramBot::with_api_base(&server.uri(), "token");
        let message = format(7, &OutgoingResponse::text("Hi"));
        assert!(!dispatch(&bot, &message).await);
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bottoken/sendMessage"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true, "result": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let bot = TelegramBot::with_api_base(&server.uri(), "token");
        let message = format(7, &OutgoingResponse::text("Hi"));
        assert!(dispatch(&bot, &message).await);
    }
}
