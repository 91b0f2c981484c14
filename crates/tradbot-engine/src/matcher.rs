//! First-match-wins intent matching over a [`RuleTable`].

use crate::rules::{IntentRule, RuleTable};

/// Evaluates a rule table against normalized text.
///
/// Rules are tried in declaration order and the first whose pattern is found
/// anywhere in the text wins.  When two rules could match, the one declared
/// earlier always takes it.
#[derive(Debug, Clone, Copy)]
pub struct IntentMatcher<'t> {
    table: &'t RuleTable,
}

impl<'t> IntentMatcher<'t> {
    pub fn new(table: &'t RuleTable) -> Self {
        Self { table }
    }

    /// Return the first rule matching `normalized`, or `None`.
    pub fn find(&self, normalized: &str) -> Option<&'t IntentRule> {
        let found = self.table.rules().iter().find(|rule| rule.is_match(normalized));
        match found {
            Some(rule) => tracing::debug!(intent = %rule.id, "intent matched"),
            None => tracing::debug!("no intent matched"),
        }
        found
    }

    /// Every rule matching `normalized`, in declaration order.
    ///
    /// The first element (if any) is what [`find`](Self::find) returns; the
    /// rest are the rules it shadows.
    pub fn candidates(&self, normalized: &str) -> Vec<&'t IntentRule> {
        self.table
            .rules()
            .iter()
            .filter(|rule| rule.is_match(normalized))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn table(json: &str) -> RuleTable {
        RuleTable::from_json_str(json).unwrap()
    }

    #[test]
    fn earlier_rule_wins() {
        let first = table(
            r#"{"capabilities": [], "help_text": "", "intents": {
                "broad": {"pattern": "pizza", "responses": []},
                "narrow": {"pattern": "pizza place", "responses": []}
            }}"#,
        );
        let swapped = table(
            r#"{"capabilities": [], "help_text": "", "intents": {
                "narrow": {"pattern": "pizza place", "responses": []},
                "broad": {"pattern": "pizza", "responses": []}
            }}"#,
        );

        let text = "best pizza place in town";
        assert_eq!(IntentMatcher::new(&first).find(text).unwrap().id, "broad");
        assert_eq!(IntentMatcher::new(&swapped).find(text).unwrap().id, "narrow");
    }

    #[test]
    fn substring_search_not_equality() {
        let t = table(
            r#"{"capabilities": [], "help_text": "", "intents": {
                "thanks": {"pattern": "thank", "responses": []}
            }}"#,
        );
        assert!(IntentMatcher::new(&t).find("well thank you kindly").is_some());
    }

    #[test]
    fn no_match_returns_none() {
        let t = table(
            r#"{"capabilities": [], "help_text": "", "intents": {
                "greeting": {"pattern": "\\bhello\\b", "responses": []}
            }}"#,
        );
        let matcher = IntentMatcher::new(&t);
        assert!(matcher.find("asdfghjk").is_none());
        assert!(matcher.find("").is_none());
    }

    #[test]
    fn candidates_lists_shadowed_rules() {
        let t = table(
            r#"{"capabilities": [], "help_text": "", "intents": {
                "a": {"pattern": "x", "responses": []},
                "b": {"pattern": "y", "responses": []},
                "c": {"pattern": "xy", "responses": []}
            }}"#,
        );
        let ids: Vec<&str> = IntentMatcher::new(&t)
            .candidates("xy")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn deterministic_across_calls() {
        let t = table(
            r#"{"capabilities": [], "help_text": "", "intents": {
                "a": {"pattern": "o", "responses": []},
                "b": {"pattern": "oo", "responses": []}
            }}"#,
        );
        let matcher = IntentMatcher::new(&t);
        for _ in 0..10 {
            assert_eq!(matcher.find("foo").unwrap().id, "a");
        }
    }
}
