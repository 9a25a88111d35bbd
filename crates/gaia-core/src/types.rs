use serde::{Deserialize, Serialize};

/// Placeholder substituted with the studio's Google Maps link in button urls.
pub const GOOGLE_MAPS_PLACEHOLDER: &str = "{{googleMapsUrl}}";

/// Generate a random trigger ID.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Unix epoch timestamp in seconds.
pub fn now_unix() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Behavior class attached to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Greeting,
    AskLocation,
    AskAppointment,
    #[serde(other)]
    Generic,
}

impl ActionType {
    /// Parse the stored column value. Anything unrecognised is `Generic`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "greeting" => Self::Greeting,
            "ask_location" => Self::AskLocation,
            "ask_appointment" => Self::AskAppointment,
            _ => Self::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::AskLocation => "ask_location",
            Self::AskAppointment => "ask_appointment",
            Self::Generic => "generic",
        }
    }
}

/// A button as stored on a trigger; `url` may contain placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonTemplate {
    #[serde(alias = "text")]
    pub label: String,
    #[serde(rename = "url")]
    pub url_template: String,
}

/// A stored rule mapping keywords to a canned action and response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub keywords: Vec<String>,
    pub is_enabled: bool,
    pub action_type: ActionType,
    pub response_text: String,
    #[serde(default)]
    pub response_buttons: Option<Vec<ButtonTemplate>>,
    pub created_at: i64,
}

impl Trigger {
    /// Buttons attached to this trigger, treating an empty list as none.
    pub fn buttons(&self) -> Option<&[ButtonTemplate]> {
        self.response_buttons
            .as_deref()
            .filter(|buttons| !buttons.is_empty())
    }
}

/// Fields needed to create a trigger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrigger {
    pub keywords: Vec<String>,
    pub action_type: ActionType,
    pub response_text: String,
    #[serde(default)]
    pub response_buttons: Option<Vec<ButtonTemplate>>,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// The tenant's business metadata used to enrich location answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioProfile {
    pub google_maps_url: Option<String>,
    pub address_street: Option<String>,
    pub address_number: Option<String>,
    pub address_neighborhood: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
}

impl StudioProfile {
    /// Maps link, if set to something non-blank.
    pub fn maps_url(&self) -> Option<&str> {
        self.google_maps_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Human-readable address in street, number, neighborhood, city, state
    /// order, skipping blank fields. `None` when every field is blank.
    pub fn formatted_address(&self) -> Option<String> {
        let parts: Vec<&str> = [
            &self.address_street,
            &self.address_number,
            &self.address_neighborhood,
            &self.address_city,
            &self.address_state,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref().map(str::trim))
        .filter(|field| !field.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReplyMarkup {
    #[default]
    NoButtons,
    InlineKeyboard(Vec<Vec<Button>>),
}

/// A fully resolved answer, ready to be formatted for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingResponse {
    pub text: String,
    pub reply_markup: ReplyMarkup,
}

impl OutgoingResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reply_markup: ReplyMarkup::NoButtons,
        }
    }

    /// Text with a single row of buttons. An empty row collapses to no buttons.
    pub fn with_row(text: impl Into<String>, row: Vec<Button>) -> Self {
        let reply_markup = if row.is_empty() {
            ReplyMarkup::NoButtons
        } else {
            ReplyMarkup::InlineKeyboard(vec![row])
        };
        Self {
            text: text.into(),
            reply_markup,
        }
    }
}
