//! Engine error types.
//!
//! Every failure the engine can report happens while it is being built:
//! loading the rule file, compiling patterns, or assembling the dialog flow.
//! Once an [`Engine`](crate::Engine) exists, [`respond`](crate::Engine::respond)
//! is total and never surfaces an error.

use std::path::PathBuf;

/// Configuration error raised while constructing a rule table, dialog flow,
/// or engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    // -- Rule file errors ---------------------------------------------------
    /// The rule file could not be read from disk.
    #[error("failed to read rule file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rule document is not valid JSON or has fields of the wrong type.
    #[error("malformed rule configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A required field is absent.  `field` is a dotted path such as
    /// `intents.greeting.pattern`.
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    /// The same intent identifier is declared more than once.
    #[error("intent `{id}` is declared more than once")]
    DuplicateIntent { id: String },

    /// An intent's pattern failed to compile as a regular expression.
    #[error("invalid pattern for intent `{intent}` (`{pattern}`): {reason}")]
    InvalidPattern {
        intent: String,
        pattern: String,
        reason: String,
    },

    // -- Dialog flow errors -------------------------------------------------
    /// The dialog flow definition violates a structural invariant.
    #[error("invalid dialog flow: {reason}")]
    InvalidFlow { reason: String },
}

/// Convenience alias used throughout the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;
