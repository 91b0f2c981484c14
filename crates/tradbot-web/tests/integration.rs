//! Integration tests for the tradbot-web crate.
//!
//! These tests verify server configuration and state setup without opening
//! a socket; HTTP round trips live in `e2e_chat.rs`.

use std::sync::Arc;
use std::time::Duration;

use tradbot_engine::RuleTable;
use tradbot_web::{AppState, WebConfig, WebServer};

fn shipped_rules() -> Arc<RuleTable> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/patterns.json");
    Arc::new(RuleTable::from_path(path).expect("shipped rule file loads"))
}

#[test]
fn web_config_defaults() {
    let config = WebConfig::default();
    assert_eq!(config.bind_addr, "127.0.0.1");
    assert_eq!(config.port, 5000);
    assert_eq!(config.session_idle, Duration::from_secs(1800));
    assert_eq!(config.max_sessions, 10_000);
}

#[test]
fn web_config_custom() {
    let config = WebConfig {
        bind_addr: "0.0.0.0".into(),
        port: 8080,
        ..WebConfig::default()
    };
    let server = WebServer::new(config, shipped_rules());
    assert_eq!(server.addr(), "0.0.0.0:8080");
}

#[test]
fn conversations_share_one_rule_table() {
    let rules = shipped_rules();
    let state = AppState::new(WebConfig::default(), Arc::clone(&rules));

    let a = state.engine_for("a").unwrap();
    let b = state.engine_for("b").unwrap();
    assert!(Arc::ptr_eq(a.lock().unwrap().rules(), &rules));
    assert!(Arc::ptr_eq(b.lock().unwrap().rules(), &rules));
}
