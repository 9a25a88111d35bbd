pub mod http;

pub use http::{router, serve, WebhookState};
