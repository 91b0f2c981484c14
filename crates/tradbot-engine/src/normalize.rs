//! Input normalization.

/// Collapse every whitespace run to a single space, trim both ends, and
/// lowercase the result.
///
/// Every later stage of the pipeline sees only text in this form, so the
/// function is infallible and idempotent.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn collapses_trims_and_lowercases() {
        assert_eq!(normalize("  Order\t\tPIZZA \n"), "order pizza");
    }

    #[test]
    fn empty_and_blank_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\r\n "), "");
    }

    #[test]
    fn unicode_whitespace_and_case() {
        assert_eq!(normalize("\u{00a0}ÉCLAIR\u{2003}Crème"), "éclair crème");
    }

    #[test]
    fn control_characters_pass_through() {
        assert_eq!(normalize("a\u{0}b"), "a\u{0}b");
    }

    proptest! {
        #[test]
        fn idempotent(s in any::<String>()) {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn no_edge_or_double_spaces(s in "[ \\ta-zA-Z\\n]{0,40}") {
            let out = normalize(&s);
            prop_assert!(!out.starts_with(' '));
            prop_assert!(!out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }
    }
}
