//! Main web server setup and startup.
//!
//! [`WebServer`] composes the Axum router, registers all routes, and starts
//! the HTTP listener.

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};

use tradbot_engine::RuleTable;

use crate::WebConfig;
use crate::api;
use crate::error::{Result, WebError};
use crate::state::AppState;

/// The tradbot web server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// # Arguments
    ///
    /// * `config` - Bind address, port, and conversation limits.
    /// * `rules` - The rule table shared by every conversation.
    pub fn new(config: WebConfig, rules: Arc<RuleTable>) -> Self {
        let state = Arc::new(AppState::new(config.clone(), rules));
        Self { config, state }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers(Any);

        Router::new()
            .route("/api/status", get(api::status))
            .route("/api/chat", post(api::chat))
            .route("/chat", post(api::chat))
            .route("/api/sessions/{id}", delete(api::delete_session))
            .layer(cors)
            .with_state(Arc::clone(&self.state))
    }

    /// Start the server and block until it is shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound or the server
    /// loop fails.
    pub async fn start(self) -> Result<()> {
        let addr = self.addr();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|source| WebError::Bind {
                addr: addr.clone(),
                source,
            })?;

        tracing::info!(
            addr = %addr,
            intents = self.state.rules.len(),
            "starting web server"
        );

        axum::serve(listener, router).await.map_err(WebError::Serve)?;

        Ok(())
    }
}
