//! Rule file format.
//!
//! A rule file is a JSON document with three required fields:
//!
//! ```json
//! {
//!   "capabilities": ["Greetings", "Pizza ordering demo"],
//!   "help_text": "I'm a small rule-based bot.",
//!   "intents": {
//!     "greeting": { "pattern": "\\b(hi|hello)\\b", "responses": ["Hello!"] }
//!   }
//! }
//! ```
//!
//! The order of keys under `intents` is kept exactly as written, because the
//! matcher evaluates rules in declaration order.  Every field is read as
//! optional first and then validated, so an absent field is reported as
//! [`EngineError::MissingField`] with its dotted path instead of a generic
//! decode error.

use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

/// A validated rule document, ready to be compiled into a
/// [`RuleTable`](crate::RuleTable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleConfig {
    /// Human-readable capability lines, listed by the `help` command.
    pub capabilities: Vec<String>,
    /// Free text printed ahead of the capability list.
    pub help_text: String,
    /// Intent declarations in file order.
    pub intents: Vec<IntentSpec>,
}

/// One validated intent declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentSpec {
    /// Intent identifier (the key under `intents`).
    pub id: String,
    /// Regular expression searched for in normalized input.
    pub pattern: String,
    /// Candidate replies; may be empty.
    pub responses: Vec<String>,
}

impl RuleConfig {
    /// Parse and validate a rule document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawRuleConfig = serde_json::from_str(json)?;
        raw.validate()
    }

    /// Parse and validate a rule document from raw bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let raw: RawRuleConfig = serde_json::from_slice(bytes)?;
        raw.validate()
    }

    /// Read, parse, and validate a rule file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "rule file read");
        Self::from_json_slice(&bytes)
    }
}

// ---------------------------------------------------------------------------
// Raw (unvalidated) document
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRuleConfig {
    capabilities: Option<Vec<String>>,
    help_text: Option<String>,
    intents: Option<OrderedIntents>,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    pattern: Option<String>,
    responses: Option<Vec<String>>,
}

/// The `intents` object, kept as an ordered list of entries.
#[derive(Debug)]
struct OrderedIntents(Vec<(String, RawIntent)>);

impl<'de> Deserialize<'de> for OrderedIntents {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = OrderedIntents;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping intent identifiers to intent declarations")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, intent)) = map.next_entry::<String, RawIntent>()? {
                    entries.push((id, intent));
                }
                Ok(OrderedIntents(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

impl RawRuleConfig {
    fn validate(self) -> Result<RuleConfig> {
        let capabilities = self.capabilities.ok_or_else(|| missing("capabilities"))?;
        let help_text = self.help_text.ok_or_else(|| missing("help_text"))?;
        let OrderedIntents(entries) = self.intents.ok_or_else(|| missing("intents"))?;

        let mut intents: Vec<IntentSpec> = Vec::with_capacity(entries.len());
        for (id, raw) in entries {
            if intents.iter().any(|existing| existing.id == id) {
                return Err(EngineError::DuplicateIntent { id });
            }
            let pattern = raw
                .pattern
                .ok_or_else(|| missing(&format!("intents.{id}.pattern")))?;
            let responses = raw
                .responses
                .ok_or_else(|| missing(&format!("intents.{id}.responses")))?;
            intents.push(IntentSpec {
                id,
                pattern,
                responses,
            });
        }

        Ok(RuleConfig {
            capabilities,
            help_text,
            intents,
        })
    }
}

fn missing(field: &str) -> EngineError {
    EngineError::MissingField {
        field: field.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
