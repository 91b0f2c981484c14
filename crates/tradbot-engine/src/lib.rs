//! Rule-based dialog engine.
//!
//! Turns a line of free text into a deterministic reply by combining ordered
//! regular-expression intent rules with a small finite-state dialog:
//!
//! - **[`normalize`]**: whitespace collapsing and lowercasing applied to
//!   every input.
//! - **[`config`]**: JSON rule file parsing with declaration order kept.
//! - **[`rules`]**: the compiled, immutable [`RuleTable`] and the
//!   [`IntentCategory`] tag resolved for each rule at load time.
//! - **[`matcher`]**: first-match-wins [`IntentMatcher`].
//! - **[`slots`]**: per-conversation [`Session`] and the intent → slot table.
//! - **[`fsm`]**: validated [`DialogFlow`] graphs and the [`DialogMachine`]
//!   that walks them; **[`pizza`]** is the built-in ordering flow.
//! - **[`commands`]**: literal system commands and dialog triggers.
//! - **[`engine`]**: the [`Engine`] orchestrating all of the above behind
//!   [`Engine::respond`].
//!
//! A [`RuleTable`] is `Send + Sync` and meant to be shared through `Arc`.
//! An [`Engine`] holds one conversation's mutable state; create one per
//! conversation.
//!
//! ```rust
//! # use std::sync::Arc;
//! # use tradbot_engine::{Engine, RuleTable};
//! let rules = RuleTable::from_json_str(r#"{
//!     "capabilities": ["Say hello"],
//!     "help_text": "A tiny bot.",
//!     "intents": {
//!         "greeting": {"pattern": "\\bhello\\b", "responses": ["Hello!"]},
//!         "size_small": {"pattern": "\\bsmall\\b", "responses": []}
//!     }
//! }"#).unwrap();
//!
//! let mut engine = Engine::with_seed(Arc::new(rules), 42).unwrap();
//! assert_eq!(engine.respond("  HELLO "), "Hello!");
//! assert!(engine.respond("order pizza").contains("What size"));
//! assert!(engine.respond("small").contains("What crust"));
//! ```

pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod matcher;
pub mod normalize;
pub mod pizza;
pub mod rules;
pub mod slots;

// Re-export the most commonly used types at the crate root for convenience.
pub use commands::{Command, SystemCommand};
pub use config::{IntentSpec, RuleConfig};
pub use engine::{Engine, FALLBACK_REPLY, GOODBYE_REPLY, RESET_REPLY, Reply, Route};
pub use error::{EngineError, Result};
pub use fsm::{DialogFlow, DialogMachine, DialogState, Transition};
pub use matcher::IntentMatcher;
pub use normalize::normalize;
pub use rules::{IntentCategory, IntentRule, RuleTable};
pub use slots::{Session, SlotAssignment};
