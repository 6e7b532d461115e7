//! Search tag parsing.

use std::collections::BTreeSet;

/// Parse a comma-separated tag list as typed by a user.
///
/// Tags are trimmed and lowercased; empty entries are dropped.
pub fn parse_tags(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trims_and_lowercases() {
        let tags = parse_tags("  Spaceship , c/4 ,GLIDER");
        let expected: BTreeSet<String> = ["c/4", "glider", "spaceship"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(tags, expected);
    }

    #[test]
    fn blank_input_has_no_tags() {
        assert!(parse_tags("   ").is_empty());
        assert!(parse_tags(",, ,").is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        assert_eq!(parse_tags("oscillator, Oscillator").len(), 1);
    }
}
