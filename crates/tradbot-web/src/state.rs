//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers.  It holds the compiled rule table and the registry of live
//! conversations, each an [`Engine`] behind its own mutex.

use std::sync::{Arc, Mutex};

use moka::sync::Cache;
use tradbot_engine::{Engine, RuleTable};

use crate::WebConfig;

/// One conversation's engine.  Turns on the same conversation serialize on
/// the mutex; different conversations never contend.
pub type SharedEngine = Arc<Mutex<Engine>>;

/// Shared state accessible from every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Rules shared read-only by every conversation.
    pub rules: Arc<RuleTable>,

    /// Conversation id → engine, evicted after `config.session_idle`.
    pub sessions: Cache<String, SharedEngine>,

    /// Web server configuration.
    pub config: WebConfig,
}

impl AppState {
    pub fn new(config: WebConfig, rules: Arc<RuleTable>) -> Self {
        let sessions = Cache::builder()
            .max_capacity(config.max_sessions)
            .time_to_idle(config.session_idle)
            .build();
        Self {
            rules,
            sessions,
            config,
        }
    }

    /// Fetch the engine for `id`, creating a fresh conversation if none is
    /// live under that id.
    pub fn engine_for(&self, id: &str) -> tradbot_engine::Result<SharedEngine> {
        self.sessions
            .try_get_with(id.to_owned(), || {
                tracing::debug!(session_id = %id, "starting conversation");
                Engine::new(Arc::clone(&self.rules)).map(|engine| Arc::new(Mutex::new(engine)))
            })
            .map_err(unshare)
    }

    /// Drop a conversation.  Returns `false` if `id` was not live.
    pub fn end(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Number of live conversations after pending evictions are applied.
    pub fn active_sessions(&self) -> u64 {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count()
    }
}

// `try_get_with` hands every waiter the same `Arc`'d error; the engine only
// fails while building its dialog flow, which is reported as a flow error.
fn unshare(err: Arc<tradbot_engine::EngineError>) -> tradbot_engine::EngineError {
    Arc::try_unwrap(err).unwrap_or_else(|shared| tradbot_engine::EngineError::InvalidFlow {
        reason: shared.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const RULES: &str = r#"{
        "capabilities": [],
        "help_text": "test",
        "intents": {
            "size_small": {"pattern": "\\bsmall\\b", "responses": []}
        }
    }"#;

    fn state() -> AppState {
        let rules = Arc::new(RuleTable::from_json_str(RULES).unwrap());
        AppState::new(WebConfig::default(), rules)
    }

    #[test]
    fn same_id_same_engine() {
        let state = state();
        let a = state.engine_for("a").unwrap();
        let again = state.engine_for("a").unwrap();
        let b = state.engine_for("b").unwrap();
        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(state.active_sessions(), 2);
    }

    #[test]
    fn end_removes_conversation() {
        let state = state();
        state.engine_for("a").unwrap();
        assert!(state.end("a"));
        assert!(!state.end("a"));
        assert_eq!(state.active_sessions(), 0);
    }

    #[test]
    fn ended_conversation_restarts_fresh() {
        let state = state();
        {
            let engine = state.engine_for("a").unwrap();
            let mut engine = engine.lock().unwrap();
            engine.respond("order pizza");
            engine.respond("small");
            assert_eq!(engine.current_state(), "size");
        }
        state.end("a");
        let engine = state.engine_for("a").unwrap();
        assert_eq!(engine.lock().unwrap().current_state(), "start");
    }

    #[test]
    fn idle_conversations_expire() {
        let rules = Arc::new(RuleTable::from_json_str(RULES).unwrap());
        let config = WebConfig {
            session_idle: Duration::from_millis(50),
            ..WebConfig::default()
        };
        let state = AppState::new(config, rules);
        state.engine_for("a").unwrap();
        std::thread::sleep(Duration::from_millis(150));
        assert!(!state.sessions.contains_key("a"));
    }
}
