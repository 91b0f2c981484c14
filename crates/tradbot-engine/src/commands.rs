//! Literal command phrases.
//!
//! These are checked before any rule is evaluated and only fire when the
//! normalized input is *exactly* one of the listed phrases; `"help me"` is
//! not a help command.

use serde::Serialize;

use crate::rules::IntentCategory;

/// Built-in system commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemCommand {
    /// Print the help text and capability list.
    Help,
    /// Reset the dialog and clear the session.
    Reset,
    /// Say goodbye.  Front ends decide whether to end the conversation.
    Exit,
}

/// Result of looking up a literal phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    System(SystemCommand),
    /// Restart the pizza dialog from its first state.
    StartDialog,
}

impl Command {
    pub fn category(self) -> IntentCategory {
        match self {
            Self::System(_) => IntentCategory::System,
            Self::StartDialog => IntentCategory::DialogTrigger,
        }
    }
}

const PHRASES: &[(&str, Command)] = &[
    ("help", Command::System(SystemCommand::Help)),
    ("capabilities", Command::System(SystemCommand::Help)),
    ("what can you do", Command::System(SystemCommand::Help)),
    ("reset", Command::System(SystemCommand::Reset)),
    ("restart", Command::System(SystemCommand::Reset)),
    ("exit", Command::System(SystemCommand::Exit)),
    ("quit", Command::System(SystemCommand::Exit)),
    ("order pizza", Command::StartDialog),
    ("pizza", Command::StartDialog),
    ("start order", Command::StartDialog),
];

/// Look up already-normalized text in the command table.
pub fn lookup(normalized: &str) -> Option<Command> {
    PHRASES
        .iter()
        .find(|(phrase, _)| *phrase == normalized)
        .map(|(_, command)| *command)
}

/// Every phrase that maps to `command`, in table order.
pub fn phrases_for(command: Command) -> impl Iterator<Item = &'static str> {
    PHRASES
        .iter()
        .filter(move |(_, c)| *c == command)
        .map(|(phrase, _)| *phrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_phrases_only() {
        assert_eq!(lookup("help"), Some(Command::System(SystemCommand::Help)));
        assert_eq!(
            lookup("what can you do"),
            Some(Command::System(SystemCommand::Help))
        );
        assert_eq!(lookup("quit"), Some(Command::System(SystemCommand::Exit)));
        assert_eq!(lookup("start order"), Some(Command::StartDialog));
        assert_eq!(lookup("help me"), None);
        assert_eq!(lookup("i want pizza"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn categories() {
        assert_eq!(
            Command::System(SystemCommand::Reset).category(),
            IntentCategory::System
        );
        assert_eq!(Command::StartDialog.category(), IntentCategory::DialogTrigger);
    }

    #[test]
    fn phrases_listed_per_command() {
        let resets: Vec<_> = phrases_for(Command::System(SystemCommand::Reset)).collect();
        assert_eq!(resets, ["reset", "restart"]);
        let triggers: Vec<_> = phrases_for(Command::StartDialog).collect();
        assert_eq!(triggers, ["order pizza", "pizza", "start order"]);
    }
}
