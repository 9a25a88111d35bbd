use serde::{Deserialize, Serialize};

/// Parse mode sent with every outbound message.
pub const PARSE_MODE_MARKDOWN: &str = "Markdown";

#[derive(Debug, Deserialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub chat: Option<Chat>,
    pub text: Option<String>,
}

/// Inbound webhook update. Only the fields the assistant reads are modelled.
#[derive(Debug, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
    pub edited_message: Option<TelegramMessage>,
}

impl Update {
    /// Chat id and text of the (possibly edited) message, if both are present.
    pub fn chat_and_text(&self) -> Option<(i64, &str)> {
        let msg = self.message.as_ref().or(self.edited_message.as_ref())?;
        let chat_id = msg.chat.as_ref()?.id;
        let text = msg.text.as_deref()?;
        Some((chat_id, text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// Body of a `sendMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
    pub parse_mode: &'static str,
}
