//! Conversation slots.
//!
//! A [`Session`] holds the key/value facts gathered during one conversation
//! (pizza size, crust, ...).  The slot tracker writes into it from a fixed
//! table that maps intent identifiers to assignments; the assignment for each
//! rule is looked up once when the rule table is compiled.

use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Per-conversation slot storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    slots: BTreeMap<String, String>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a slot value.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    /// Look up a slot value, substituting `placeholder` when it is unset.
    pub fn get_or<'a>(&'a self, slot: &str, placeholder: &'a str) -> &'a str {
        self.get(slot).unwrap_or(placeholder)
    }

    /// Set a slot, replacing any previous value.
    pub fn set(&mut self, slot: impl Into<String>, value: impl Into<String>) {
        self.slots.insert(slot.into(), value.into());
    }

    /// Remove every slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over `(slot, value)` pairs in slot-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Slot tracking
// ---------------------------------------------------------------------------

/// A single `(slot, value)` write triggered by an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotAssignment {
    pub slot: &'static str,
    pub value: &'static str,
}

impl SlotAssignment {
    /// Apply this assignment to `session`.
    pub fn apply(&self, session: &mut Session) {
        session.set(self.slot, self.value);
    }
}

/// Intent identifier → slot write.
const SLOT_TABLE: &[(&str, SlotAssignment)] = &[
    ("size_small", assign("size", "small")),
    ("size_medium", assign("size", "medium")),
    ("size_large", assign("size", "large")),
    ("crust_thin", assign("crust", "thin")),
    ("crust_regular", assign("crust", "regular")),
    ("crust_deep", assign("crust", "deep-dish")),
    ("topping_pepperoni", assign("topping", "pepperoni")),
    ("topping_mushrooms", assign("topping", "mushrooms")),
    ("topping_onions", assign("topping", "onions")),
    ("topping_olives", assign("topping", "olives")),
    ("confirm_yes", assign("outcome", "confirmed")),
    ("confirm_no", assign("outcome", "declined")),
    ("cancel_dialog", assign("outcome", "cancelled")),
];

const fn assign(slot: &'static str, value: &'static str) -> SlotAssignment {
    SlotAssignment { slot, value }
}

/// Return the slot write associated with an intent identifier, if any.
pub fn assignment_for(intent_id: &str) -> Option<SlotAssignment> {
    SLOT_TABLE
        .iter()
        .find(|(id, _)| *id == intent_id)
        .map(|(_, assignment)| *assignment)
}

/// Apply the slot write for `intent_id` (if it has one) to `session`.
///
/// Unknown identifiers and `None` leave the session untouched.  The write
/// happens regardless of which dialog state is active.
pub fn track(session: &mut Session, intent_id: Option<&str>) {
    if let Some(assignment) = intent_id.and_then(assignment_for) {
        tracing::trace!(slot = assignment.slot, value = assignment.value, "slot written");
        assignment.apply(session);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
