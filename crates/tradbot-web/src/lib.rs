//! Web interface for tradbot.
//!
//! This crate exposes the dialog engine over HTTP:
//!
//! - `POST /api/chat` (and the `/chat` alias) runs one conversation turn.
//! - `DELETE /api/sessions/{id}` drops a conversation.
//! - `GET /api/status` reports the loaded rule table and live conversations.
//!
//! Each conversation id maps to its own [`tradbot_engine::Engine`]; all of
//! them share one [`tradbot_engine::RuleTable`].

use std::time::Duration;

pub mod api;
pub mod error;
pub mod server;
pub mod state;

pub use error::{Result, WebError};
pub use server::WebServer;
pub use state::AppState;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
    /// How long a conversation may sit unused before it is evicted.
    pub session_idle: Duration,
    /// Upper bound on live conversations.
    pub max_sessions: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 5000,
            session_idle: Duration::from_secs(30 * 60),
            max_sessions: 10_000,
        }
    }
}
