//! Finite-state dialog controller.
//!
//! A [`DialogFlow`] is a validated, immutable graph of [`DialogState`]s.  A
//! [`DialogMachine`] walks one flow for one conversation.
//!
//! Each state has an entry action, a plain function from the current
//! [`Session`] to prompt text, and a transition table keyed by intent id.
//! When an intent is not in the current state's table the machine stays
//! where it is and repeats the current prompt.

use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::slots::Session;

/// Renders a state's prompt from the session.  Must not fail on absent slots.
pub type EntryAction = fn(&Session) -> String;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// One node of a dialog flow.
#[derive(Debug, Clone)]
pub struct DialogState {
    id: &'static str,
    entry: EntryAction,
    transitions: Vec<(&'static str, &'static str)>,
}

impl DialogState {
    pub fn new(id: &'static str, entry: EntryAction) -> Self {
        Self {
            id,
            entry,
            transitions: Vec::new(),
        }
    }

    /// Add an edge: on `intent`, move to `target`.
    pub fn on(mut self, intent: &'static str, target: &'static str) -> Self {
        self.transitions.push((intent, target));
        self
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// Target state for `intent`, if this state accepts it.
    pub fn target(&self, intent: &str) -> Option<&'static str> {
        self.transitions
            .iter()
            .find(|(accepted, _)| *accepted == intent)
            .map(|(_, target)| *target)
    }

    /// Intents this state accepts, in declaration order.
    pub fn accepts(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.transitions.iter().map(|(intent, _)| *intent)
    }

    /// Run the entry action against `session`.
    pub fn render(&self, session: &Session) -> String {
        (self.entry)(session)
    }
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// A validated dialog graph with a start and a terminal state.
#[derive(Debug, Clone)]
pub struct DialogFlow {
    states: Vec<DialogState>,
    start: usize,
    terminal: usize,
}

impl DialogFlow {
    /// Begin building a flow that starts at `start` and completes at
    /// `terminal`.
    pub fn builder(start: &'static str, terminal: &'static str) -> DialogFlowBuilder {
        DialogFlowBuilder {
            start,
            terminal,
            states: Vec::new(),
            universal: Vec::new(),
        }
    }

    pub fn start(&self) -> &DialogState {
        &self.states[self.start]
    }

    pub fn terminal(&self) -> &DialogState {
        &self.states[self.terminal]
    }

    pub fn state(&self, id: &str) -> Option<&DialogState> {
        self.states.iter().find(|s| s.id == id)
    }

    pub fn states(&self) -> &[DialogState] {
        &self.states
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.states.iter().position(|s| s.id == id)
    }
}

/// Builder for [`DialogFlow`]; [`build`](Self::build) checks the graph.
#[derive(Debug)]
pub struct DialogFlowBuilder {
    start: &'static str,
    terminal: &'static str,
    states: Vec<DialogState>,
    universal: Vec<(&'static str, &'static str)>,
}

impl DialogFlowBuilder {
    pub fn state(mut self, state: DialogState) -> Self {
        self.states.push(state);
        self
    }

    /// Add an edge to every non-terminal state.
    pub fn universal(mut self, intent: &'static str, target: &'static str) -> Self {
        self.universal.push((intent, target));
        self
    }

    /// Validate and freeze the flow.
    ///
    /// Rejects duplicate state ids, an undefined start or terminal state,
    /// edges pointing at undefined states, a state accepting the same intent
    /// twice, and a terminal state with outgoing edges.
    pub fn build(mut self) -> Result<DialogFlow> {
        for (i, state) in self.states.iter().enumerate() {
            if self.states[..i].iter().any(|s| s.id == state.id) {
                return Err(invalid(format!("state `{}` is defined twice", state.id)));
            }
        }

        let terminal = self.terminal;
        for state in self.states.iter_mut().filter(|s| s.id != terminal) {
            for &(intent, target) in &self.universal {
                if state.target(intent).is_none() {
                    state.transitions.push((intent, target));
                }
            }
        }

        let flow = DialogFlow {
            start: position(&self.states, self.start)
                .ok_or_else(|| invalid(format!("start state `{}` is not defined", self.start)))?,
            terminal: position(&self.states, self.terminal).ok_or_else(|| {
                invalid(format!("terminal state `{}` is not defined", self.terminal))
            })?,
            states: self.states,
        };

        for state in &flow.states {
            for (i, &(intent, target)) in state.transitions.iter().enumerate() {
                if flow.index_of(target).is_none() {
                    return Err(invalid(format!(
                        "state `{}` routes `{intent}` to undefined state `{target}`",
                        state.id
                    )));
                }
                if state.transitions[..i].iter().any(|(seen, _)| *seen == intent) {
                    return Err(invalid(format!(
                        "state `{}` accepts `{intent}` more than once",
                        state.id
                    )));
                }
            }
        }

        if !flow.terminal().transitions.is_empty() {
            return Err(invalid(format!(
                "terminal state `{}` has outgoing transitions",
                flow.terminal().id
            )));
        }

        tracing::debug!(
            states = flow.states.len(),
            start = flow.start().id,
            terminal = flow.terminal().id,
            "dialog flow built"
        );
        Ok(flow)
    }
}

fn position(states: &[DialogState], id: &str) -> Option<usize> {
    states.iter().position(|s| s.id == id)
}

fn invalid(reason: String) -> EngineError {
    EngineError::InvalidFlow { reason }
}

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

/// Outcome of dispatching one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: &'static str,
    pub to: &'static str,
    /// Whether an edge was taken (self-loops count).
    pub advanced: bool,
    /// Prompt of the state now current (re-emitted when nothing advanced).
    pub prompt: String,
}

/// One conversation's position within a [`DialogFlow`].
#[derive(Debug, Clone)]
pub struct DialogMachine {
    flow: DialogFlow,
    current: usize,
}

impl DialogMachine {
    /// Create a machine positioned at the flow's start state.
    pub fn new(flow: DialogFlow) -> Self {
        let current = flow.start;
        Self { flow, current }
    }

    pub fn flow(&self) -> &DialogFlow {
        &self.flow
    }

    pub fn current(&self) -> &DialogState {
        &self.flow.states[self.current]
    }

    pub fn current_id(&self) -> &'static str {
        self.current().id
    }

    pub fn terminal_id(&self) -> &'static str {
        self.flow.terminal().id
    }

    /// Whether the machine sits in the terminal state.
    pub fn is_done(&self) -> bool {
        self.current == self.flow.terminal
    }

    /// Return to the start state and clear `session`.
    pub fn reset(&mut self, session: &mut Session) {
        self.current = self.flow.start;
        session.clear();
    }

    /// Render the current state's prompt.
    pub fn prompt(&self, session: &Session) -> String {
        self.current().render(session)
    }

    /// Advance on `intent` if the current state accepts it, then render the
    /// (possibly unchanged) current state's prompt.
    pub fn dispatch(&mut self, intent: Option<&str>, session: &Session) -> Transition {
        let from = self.current_id();
        let target = intent.and_then(|i| self.current().target(i));

        let advanced = match target.and_then(|t| self.flow.index_of(t)) {
            Some(next) => {
                self.current = next;
                tracing::debug!(from, to = self.current_id(), intent = ?intent, "dialog advanced");
                true
            }
            None => {
                tracing::debug!(state = from, intent = ?intent, "dialog input not accepted, re-prompting");
                false
            }
        };

        Transition {
            from,
            to: self.current_id(),
            advanced,
            prompt: self.prompt(session),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
