//! The per-conversation dialog engine.
//!
//! [`Engine::respond`] is the only way to drive a conversation.  Each call
//! runs this pipeline, stopping at the first step that produces a reply:
//!
//! 1. **System command**: exact `help`, `reset`, `quit`, ... phrases.
//! 2. **Dialog trigger**: exact `order pizza`, ... phrases restart the flow.
//! 3. **Intent matching**: first matching rule in declaration order.
//! 4. **Slot tracking**: always runs on the matched intent (even outside the
//!    dialog).
//! 5. **Dialog dispatch**: dialog-namespace intents drive the state machine.
//!    While a triggered dialog is still running, input that matched nothing
//!    is dispatched too, which re-asks the current question.
//! 6. **Generic reply**: a random pick from the rule's responses.
//! 7. **Fallback**: a fixed "didn't understand" message.
//!
//! The engine never fails once built.

use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::commands::{self, Command, SystemCommand};
use crate::error::Result;
use crate::fsm::DialogMachine;
use crate::matcher::IntentMatcher;
use crate::normalize::normalize;
use crate::pizza;
use crate::rules::{IntentCategory, RuleTable};
use crate::slots::{self, Session};

/// Reply to anything the engine cannot place.
pub const FALLBACK_REPLY: &str = "Sorry, I didn't understand that. Try 'help' to see what I can do, \
     or type 'order pizza' to start the pizza demo.";

/// Reply to `reset` / `restart`.
pub const RESET_REPLY: &str = "Dialog has been reset. Type 'order pizza' to start again.";

/// Reply to `exit` / `quit`.
pub const GOODBYE_REPLY: &str = "Goodbye!";

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// Which pipeline step produced a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Route {
    /// A literal system command.
    System { command: SystemCommand },
    /// A dialog trigger phrase restarted the flow.
    DialogStart,
    /// Input was dispatched to the state machine.  `intent` is `None` when
    /// nothing matched inside a running dialog.
    Dialog {
        intent: Option<String>,
        from: &'static str,
        to: &'static str,
        advanced: bool,
    },
    /// A generic intent answered from its response list.
    Generic { intent: String },
    /// Nothing applied.  `intent` is set when a rule matched but had no
    /// responses to offer.
    Fallback { intent: Option<String> },
}

impl Route {
    pub fn category(&self) -> Option<IntentCategory> {
        match self {
            Self::System { .. } => Some(IntentCategory::System),
            Self::DialogStart => Some(IntentCategory::DialogTrigger),
            Self::Dialog { .. } => Some(IntentCategory::DialogSlot),
            Self::Generic { .. } => Some(IntentCategory::Generic),
            Self::Fallback { .. } => None,
        }
    }
}

/// A reply plus the route that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub route: Route,
}

impl Reply {
    /// Whether the user asked to leave (`exit` / `quit`).
    pub fn is_exit(&self) -> bool {
        matches!(
            self.route,
            Route::System {
                command: SystemCommand::Exit
            }
        )
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// One conversation: a shared rule table plus this conversation's session,
/// dialog position, and random source.
///
/// An `Engine` is driven through `&mut self`; give every conversation its
/// own instance.
pub struct Engine {
    rules: Arc<RuleTable>,
    session: Session,
    dialog: DialogMachine,
    /// Set by a dialog trigger, cleared by `reset`.
    triggered: bool,
    rng: Box<dyn RngCore + Send>,
}

impl Engine {
    /// Create an engine whose response choices are seeded from OS entropy.
    pub fn new(rules: Arc<RuleTable>) -> Result<Self> {
        Self::with_rng(rules, StdRng::from_entropy())
    }

    /// Create an engine with a fixed seed, for reproducible replies.
    pub fn with_seed(rules: Arc<RuleTable>, seed: u64) -> Result<Self> {
        Self::with_rng(rules, StdRng::seed_from_u64(seed))
    }

    /// Create an engine drawing response choices from `rng`.
    pub fn with_rng(rules: Arc<RuleTable>, rng: impl RngCore + Send + 'static) -> Result<Self> {
        let dialog = DialogMachine::new(pizza::flow()?);
        Ok(Self {
            rules,
            session: Session::new(),
            dialog,
            triggered: false,
            rng: Box::new(rng),
        })
    }

    /// Produce a reply for one line of user input.
    pub fn respond(&mut self, text: &str) -> String {
        self.respond_with_route(text).text
    }

    /// Like [`respond`](Self::respond), but also report which step answered.
    pub fn respond_with_route(&mut self, text: &str) -> Reply {
        let normalized = normalize(text);
        let reply = self.turn(&normalized);
        debug!(
            input = %normalized,
            route = ?reply.route,
            state = self.dialog.current_id(),
            "turn complete"
        );
        reply
    }

    /// Whether the dialog has reached its terminal state.
    pub fn is_done(&self) -> bool {
        self.dialog.is_done()
    }

    /// Current dialog state id.
    pub fn current_state(&self) -> &'static str {
        self.dialog.current_id()
    }

    /// Whether a dialog was started with a trigger phrase and has not yet
    /// reached its terminal state.
    pub fn in_dialog(&self) -> bool {
        self.triggered && !self.dialog.is_done()
    }

    /// Read-only view of the conversation's slots.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn rules(&self) -> &Arc<RuleTable> {
        &self.rules
    }

    // -- Pipeline -----------------------------------------------------------

    fn turn(&mut self, normalized: &str) -> Reply {
        if let Some(command) = commands::lookup(normalized) {
            return self.run_command(command);
        }

        let rules = Arc::clone(&self.rules);
        let matched = IntentMatcher::new(&rules).find(normalized);

        slots::track(&mut self.session, matched.map(|rule| rule.id.as_str()));

        let Some(rule) = matched else {
            if self.in_dialog() {
                return self.dispatch(None);
            }
            return fallback(None);
        };

        match rule.category {
            IntentCategory::DialogSlot => self.dispatch(Some(rule.id.as_str())),
            _ => match rule.responses.choose(&mut self.rng) {
                Some(response) => Reply {
                    text: response.clone(),
                    route: Route::Generic {
                        intent: rule.id.clone(),
                    },
                },
                None => fallback(Some(rule.id.clone())),
            },
        }
    }

    fn dispatch(&mut self, intent: Option<&str>) -> Reply {
        let transition = self.dialog.dispatch(intent, &self.session);
        Reply {
            text: transition.prompt,
            route: Route::Dialog {
                intent: intent.map(str::to_owned),
                from: transition.from,
                to: transition.to,
                advanced: transition.advanced,
            },
        }
    }

    fn run_command(&mut self, command: Command) -> Reply {
        match command {
            Command::System(SystemCommand::Help) => Reply {
                text: self.help_reply(),
                route: Route::System {
                    command: SystemCommand::Help,
                },
            },
            Command::System(SystemCommand::Reset) => {
                self.reset_dialog();
                self.triggered = false;
                Reply {
                    text: RESET_REPLY.to_owned(),
                    route: Route::System {
                        command: SystemCommand::Reset,
                    },
                }
            }
            Command::System(SystemCommand::Exit) => Reply {
                text: GOODBYE_REPLY.to_owned(),
                route: Route::System {
                    command: SystemCommand::Exit,
                },
            },
            Command::StartDialog => {
                self.reset_dialog();
                self.triggered = true;
                Reply {
                    text: self.dialog.prompt(&self.session),
                    route: Route::DialogStart,
                }
            }
        }
    }

    fn reset_dialog(&mut self) {
        self.dialog.reset(&mut self.session);
        info!("dialog reset");
    }

    fn help_reply(&self) -> String {
        let mut text = String::from(self.rules.help_text());
        text.push_str("\n\nCapabilities:");
        for capability in self.rules.capabilities() {
            text.push_str("\n- ");
            text.push_str(capability);
        }
        text
    }
}

fn fallback(intent: Option<String>) -> Reply {
    Reply {
        text: FALLBACK_REPLY.to_owned(),
        route: Route::Fallback { intent },
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("intents", &self.rules.len())
            .field("state", &self.dialog.current_id())
            .field("in_dialog", &self.in_dialog())
            .field("session", &self.session)
            .field("rng", &"<rng>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;

    use super::*;

    const RULES: &str = r#"{
        "capabilities": ["Greetings", "Pizza ordering"],
        "help_text": "I am a test bot.",
        "intents": {
            "greeting": {"pattern": "\\b(hello|hi)\\b", "responses": ["Hello!", "Hi there!", "Hey!"]},
            "silent": {"pattern": "\\bshh\\b", "responses": []},
            "size_small": {"pattern": "\\bsmall\\b", "responses": []},
            "size_large": {"pattern": "\\blarge\\b", "responses": []},
            "crust_thin": {"pattern": "\\bthin\\b", "responses": []},
            "topping_olives": {"pattern": "\\bolives?\\b", "responses": []},
            "cancel_dialog": {"pattern": "\\bcancel\\b", "responses": []},
            "confirm_yes": {"pattern": "^yes\\b", "responses": []}
        }
    }"#;

    fn engine() -> Engine {
        let rules = Arc::new(RuleTable::from_json_str(RULES).unwrap());
        Engine::with_rng(rules, StepRng::new(0, 0)).unwrap()
    }

    #[test]
    fn starts_in_start_state() {
        let e = engine();
        assert_eq!(e.current_state(), pizza::START);
        assert!(!e.is_done());
        assert!(e.session().is_empty());
    }

    #[test]
    fn help_lists_capabilities_in_order() {
        let mut e = engine();
        let reply = e.respond("Help");
        assert_eq!(
            reply,
            "I am a test bot.\n\nCapabilities:\n- Greetings\n- Pizza ordering"
        );
        assert_eq!(e.respond("what can you do"), reply);
        assert_eq!(e.respond("capabilities"), reply);
    }

    #[test]
    fn exit_is_flagged() {
        let mut e = engine();
        let reply = e.respond_with_route("  QUIT ");
        assert_eq!(reply.text, GOODBYE_REPLY);
        assert!(reply.is_exit());
        assert!(!e.respond_with_route("hello").is_exit());
    }

    #[test]
    fn generic_reply_uses_injected_rng() {
        let mut e = engine();
        // StepRng(0, 0) always draws index 0.
        assert_eq!(e.respond("hello"), "Hello!");
        assert_eq!(e.respond("hi"), "Hello!");
    }

    #[test]
    fn seeded_engines_agree() {
        let rules = Arc::new(RuleTable::from_json_str(RULES).unwrap());
        let mut a = Engine::with_seed(Arc::clone(&rules), 7).unwrap();
        let mut b = Engine::with_seed(rules, 7).unwrap();
        for _ in 0..20 {
            assert_eq!(a.respond("hello"), b.respond("  HELLO  "));
        }
    }

    #[test]
    fn rule_without_responses_falls_back() {
        let mut e = engine();
        let reply = e.respond_with_route("shh");
        assert_eq!(reply.text, FALLBACK_REPLY);
        assert_eq!(
            reply.route,
            Route::Fallback {
                intent: Some("silent".into())
            }
        );
    }

    #[test]
    fn unknown_and_degenerate_input_falls_back() {
        let mut e = engine();
        let long = "z".repeat(100_000);
        for input in ["asdfghjk", "", "   ", "\u{0}\u{1}\u{7f}", long.as_str()] {
            assert_eq!(e.respond(input), FALLBACK_REPLY);
        }
    }

    #[test]
    fn reset_clears_session_and_state() {
        let mut e = engine();
        e.respond("order pizza");
        e.respond("small");
        e.respond("thin");
        assert_eq!(e.current_state(), pizza::CRUST);
        assert!(!e.session().is_empty());

        assert_eq!(e.respond("restart"), RESET_REPLY);
        assert_eq!(e.current_state(), pizza::START);
        assert!(e.session().is_empty());
    }

    #[test]
    fn dialog_trigger_resets_and_prompts() {
        let mut e = engine();
        e.respond("large");
        let reply = e.respond_with_route("pizza");
        assert_eq!(reply.route, Route::DialogStart);
        assert!(reply.text.contains("What size"));
        assert_eq!(e.current_state(), pizza::START);
        assert!(e.session().is_empty());
    }

    #[test]
    fn unaccepted_dialog_intent_reprompts() {
        let mut e = engine();
        e.respond("order pizza");
        let prompt = e.respond("small");
        let reply = e.respond_with_route("olives");
        assert_eq!(reply.text, prompt);
        assert_eq!(
            reply.route,
            Route::Dialog {
                intent: Some("topping_olives".into()),
                from: pizza::SIZE,
                to: pizza::SIZE,
                advanced: false,
            }
        );
    }

    #[test]
    fn unmatched_input_inside_dialog_reprompts() {
        let mut e = engine();
        e.respond("order pizza");
        e.respond("small");
        let prompt = e.respond("thin");
        assert!(e.in_dialog());

        let reply = e.respond_with_route("banana");
        assert_eq!(reply.text, prompt);
        assert_eq!(e.current_state(), pizza::CRUST);
        assert_eq!(
            reply.route,
            Route::Dialog {
                intent: None,
                from: pizza::CRUST,
                to: pizza::CRUST,
                advanced: false,
            }
        );
    }

    #[test]
    fn unmatched_input_outside_dialog_falls_back() {
        let mut e = engine();
        // Advancing the machine without a trigger does not open a dialog.
        e.respond("small");
        assert!(!e.in_dialog());
        assert_eq!(e.respond("banana"), FALLBACK_REPLY);

        e.respond("order pizza");
        e.respond("cancel");
        assert!(e.is_done());
        assert!(!e.in_dialog());
        assert_eq!(e.respond("banana"), FALLBACK_REPLY);

        e.respond("order pizza");
        e.respond("reset");
        assert!(!e.in_dialog());
        assert_eq!(e.respond("banana"), FALLBACK_REPLY);
    }

    #[test]
    fn generic_intent_answers_inside_dialog() {
        let mut e = engine();
        e.respond("order pizza");
        assert_eq!(e.respond("hello"), "Hello!");
        assert_eq!(e.current_state(), pizza::START);
    }

    #[test]
    fn cancel_ends_dialog_with_cancellation() {
        let mut e = engine();
        e.respond("order pizza");
        e.respond("small");
        let reply = e.respond("cancel");
        assert!(e.is_done());
        assert!(reply.contains("cancelled"));
    }

    // Slot writes are not gated on dialog position: a slot word uttered
    // anywhere lands in the session.
    #[test]
    fn slot_written_outside_expected_state() {
        let mut e = engine();
        e.respond("order pizza");
        e.respond("olives");
        assert_eq!(e.current_state(), pizza::START);
        assert_eq!(e.session().get("topping"), Some("olives"));
    }

    #[test]
    fn help_with_no_capabilities() {
        let rules = Arc::new(
            RuleTable::from_json_str(r#"{"capabilities": [], "help_text": "Hi.", "intents": {}}"#)
                .unwrap(),
        );
        let mut e = Engine::with_seed(rules, 1).unwrap();
        assert_eq!(e.respond("help"), "Hi.\n\nCapabilities:");
    }

    #[test]
    fn engine_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Engine>();
    }
}
