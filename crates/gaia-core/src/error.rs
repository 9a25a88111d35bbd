use thiserror::Error;

#[derive(Debug, Error)]
pub enum GaiaError {
    #[error("telegram error: {0}")]
    Telegram(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("http error ({status}): {body}")]
    Http { status: u16, body: String },
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("server error: {0}")]
    Server(String),
}

impl From<serde_json::Error> for GaiaError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GaiaError>;
