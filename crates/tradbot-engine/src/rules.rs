//! Rule table: the ordered, compiled set of intents.
//!
//! A [`RuleTable`] is built once from a [`RuleConfig`] and is immutable
//! afterwards.  It is `Send + Sync`, so a single table is normally wrapped in
//! an `Arc` and shared by every conversation's [`Engine`](crate::Engine).
//!
//! # Ordering
//!
//! **Declaration order is part of the table's meaning.**  The matcher walks
//! the rules in the order they appear in the rule file and stops at the first
//! pattern that matches, so moving a rule above another can change which
//! intent a piece of text resolves to.  Put narrow patterns before broad ones.

use std::path::Path;

use regex::Regex;
use serde::Serialize;

use crate::config::{IntentSpec, RuleConfig};
use crate::error::{EngineError, Result};
use crate::slots::{self, SlotAssignment};

/// Identifier prefixes reserved for the dialog vocabulary.
const DIALOG_NAMESPACES: &[&str] = &["size_", "crust_", "topping_", "confirm_", "cancel_"];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// How an utterance is routed once recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    /// Built-in command (`help`, `reset`, `quit`, ...).
    System,
    /// Literal phrase that (re)starts the dialog flow.
    DialogTrigger,
    /// Rule whose identifier is in the dialog namespace; handled by the FSM.
    DialogSlot,
    /// Any other rule; answered from its own response list.
    Generic,
}

impl IntentCategory {
    /// Classify a rule identifier from the rule file.
    ///
    /// Only [`DialogSlot`](Self::DialogSlot) and [`Generic`](Self::Generic)
    /// can come out of a rule file; the other two belong to the literal
    /// command tables.
    pub fn of_rule(id: &str) -> Self {
        if DIALOG_NAMESPACES.iter().any(|prefix| id.starts_with(prefix)) {
            Self::DialogSlot
        } else {
            Self::Generic
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::DialogTrigger => "dialog_trigger",
            Self::DialogSlot => "dialog_slot",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A compiled intent rule.
#[derive(Debug, Clone)]
pub struct IntentRule {
    /// Unique identifier within the table.
    pub id: String,
    /// Routing category, fixed at load time.
    pub category: IntentCategory,
    /// Slot write performed whenever this intent is detected.
    pub slot: Option<SlotAssignment>,
    /// Candidate replies for generic intents.
    pub responses: Vec<String>,
    /// The original pattern string.
    pub pattern: String,
    compiled: Regex,
}

impl IntentRule {
    fn compile(spec: IntentSpec) -> Result<Self> {
        let compiled = Regex::new(&spec.pattern).map_err(|e| EngineError::InvalidPattern {
            intent: spec.id.clone(),
            pattern: spec.pattern.clone(),
            reason: e.to_string(),
        })?;

        let category = IntentCategory::of_rule(&spec.id);
        let slot = slots::assignment_for(&spec.id);

        tracing::debug!(
            intent = %spec.id,
            pattern = %spec.pattern,
            category = %category,
            "intent rule compiled"
        );

        Ok(Self {
            slot,
            category,
            compiled,
            id: spec.id,
            responses: spec.responses,
            pattern: spec.pattern,
        })
    }

    /// Whether the rule's pattern occurs anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.compiled.is_match(text)
    }
}

// ---------------------------------------------------------------------------
// RuleTable
// ---------------------------------------------------------------------------

/// Ordered, immutable collection of compiled intents plus the help content.
#[derive(Debug, Clone)]
pub struct RuleTable {
    capabilities: Vec<String>,
    help_text: String,
    rules: Vec<IntentRule>,
}

impl RuleTable {
    /// Compile a validated configuration.
    ///
    /// Fails on the first pattern that does not compile; nothing is returned
    /// in that case.
    pub fn from_config(config: RuleConfig) -> Result<Self> {
        let rules = config
            .intents
            .into_iter()
            .map(IntentRule::compile)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            intents = rules.len(),
            capabilities = config.capabilities.len(),
            "rule table built"
        );

        Ok(Self {
            capabilities: config.capabilities,
            help_text: config.help_text,
            rules,
        })
    }

    /// Parse, validate, and compile a JSON rule document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_config(RuleConfig::from_json_str(json)?)
    }

    /// Parse, validate, and compile JSON rule bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_config(RuleConfig::from_json_slice(bytes)?)
    }

    /// Load and compile a JSON rule file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_config(RuleConfig::from_path(path)?)
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    /// Look up a rule by identifier.
    pub fn get(&self, id: &str) -> Option<&IntentRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
