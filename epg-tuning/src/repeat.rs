//! Suppression of repeat programmes by title and description patterns.
//!
//! A pattern's match mode comes from its delimiters, compared
//! case-insensitively:
//!
//! | Pattern | Matches when the text |
//! |---|---|
//! | `<text>` | contains `text` |
//! | `<text` | ends with `text` |
//! | `text>` | starts with `text` |
//! | `text` | equals `text` |
//!
//! An empty pattern matches anything.

use serde::{Deserialize, Serialize};

/// One exclusion rule. Both patterns must match for the rule to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatExclusion {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl RepeatExclusion {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn matches(&self, title: &str, description: &str) -> bool {
        matches_pattern(&self.title, title) && matches_pattern(&self.description, description)
    }
}

/// True if any rule matches the programme.
pub fn is_excluded(rules: &[RepeatExclusion], title: &str, description: &str) -> bool {
    rules.iter().any(|rule| rule.matches(title, description))
}

/// Test `text` against a single delimited pattern.
pub fn matches_pattern(pattern: &str, text: &str) -> bool {
    if pattern.is_empty() {
        return true;
    }

    let pattern = pattern.to_lowercase();
    let text = text.to_lowercase();

    let leading = pattern.starts_with('<');
    let trailing = pattern.ends_with('>');

    match (leading, trailing) {
        (true, true) => text.contains(&pattern[1..pattern.len() - 1]),
        (true, false) => text.ends_with(&pattern[1..]),
        (false, true) => text.starts_with(&pattern[..pattern.len() - 1]),
        (false, false) => text == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_rule(pattern: &str) -> Vec<RepeatExclusion> {
        vec![RepeatExclusion::new(pattern, "")]
    }

    #[test]
    fn test_containment() {
        assert!(is_excluded(&title_rule("<news>"), "Nightly News Update", ""));
        assert!(!is_excluded(&title_rule("<news>"), "Weather", ""));
    }

    #[test]
    fn test_prefix() {
        assert!(is_excluded(&title_rule("news>"), "News at Ten", ""));
        assert!(!is_excluded(&title_rule("news>"), "Evening News", ""));
    }

    #[test]
    fn test_suffix() {
        assert!(is_excluded(&title_rule("<news"), "Evening News", ""));
        assert!(!is_excluded(&title_rule("<news"), "News at Ten", ""));
    }

    #[test]
    fn test_exact() {
        assert!(is_excluded(&title_rule("news"), "News", ""));
        assert!(!is_excluded(&title_rule("news"), "News Update", ""));
    }

    #[test]
    fn test_both_fields_must_match() {
        let rules = vec![RepeatExclusion::new("<film>", "<repeat>")];
        assert!(is_excluded(&rules, "Sunday Film", "A REPEAT of last week"));
        assert!(!is_excluded(&rules, "Sunday Film", "First showing"));
        assert!(!is_excluded(&rules, "Sport", "A repeat"));
    }

    #[test]
    fn test_empty_patterns_match_everything() {
        assert!(is_excluded(&[RepeatExclusion::default()], "Anything", "At all"));
        assert!(is_excluded(&[RepeatExclusion::new("", "<(r)>")], "Film", "Drama (R)"));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = vec![
            RepeatExclusion::new("weather", ""),
            RepeatExclusion::new("<news>", ""),
        ];
        assert!(is_excluded(&rules, "Late News", ""));
        assert!(!is_excluded(&rules, "Sport", ""));
        assert!(!is_excluded(&[], "Late News", ""));
    }

    #[test]
    fn test_bare_delimiters() {
        assert!(matches_pattern("<>", "anything"));
        assert!(matches_pattern("<", "anything"));
        assert!(matches_pattern(">", "anything"));
    }
}
