//! The `check` subcommand: validate a rule file and show match order.

use std::io::{self, Write};

use tradbot_engine::RuleTable;

/// Write one line per intent, in the order the matcher tries them.
pub fn write_report<W: Write>(rules: &RuleTable, mut out: W) -> io::Result<()> {
    writeln!(
        out,
        "{} intents, {} capabilities",
        rules.len(),
        rules.capabilities().len()
    )?;
    for (index, rule) in rules.rules().iter().enumerate() {
        let slot = rule
            .slot
            .map(|s| format!("  -> {}={}", s.slot, s.value))
            .unwrap_or_default();
        writeln!(
            out,
            "{:>3}  {:<20} {:<14} {}{}",
            index + 1,
            rule.id,
            rule.category,
            rule.pattern,
            slot
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_rules_in_order_with_category() {
        let rules = RuleTable::from_json_str(
            r#"{
                "capabilities": ["One"],
                "help_text": "",
                "intents": {
                    "greeting": {"pattern": "\\bhi\\b", "responses": ["Hi"]},
                    "size_small": {"pattern": "\\bsmall\\b", "responses": []}
                }
            }"#,
        )
        .unwrap();

        let mut out = Vec::new();
        write_report(&rules, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "2 intents, 1 capabilities");
        assert!(lines[1].contains("greeting") && lines[1].contains("generic"));
        assert!(lines[2].contains("size_small") && lines[2].contains("dialog_slot"));
        assert!(lines[2].ends_with("-> size=small"));
    }
}
