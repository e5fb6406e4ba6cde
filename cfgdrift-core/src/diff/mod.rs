//! Line-level diff between two configuration texts
//!
//! A pure function of the (old, new) pair. The underlying sequence
//! alignment comes from the `similar` crate; unchanged lines are filtered
//! out so the report carries only net additions and removals, in the order
//! the alignment produces them (removals before the additions judged to
//! replace them, otherwise document order).

use std::fmt;

use similar::{ChangeTag, TextDiff};

/// Whether a diff line was added to or removed from the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffTag {
    /// Line present in the new text only
    Added,
    /// Line present in the old text only
    Removed,
}

impl DiffTag {
    /// Two-character prefix used in the rendered report
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Added => "+ ",
            Self::Removed => "- ",
        }
    }
}

/// One changed line of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffLine {
    /// Added or removed
    pub tag: DiffTag,
    /// Line content without the trailing newline
    pub text: String,
}

impl DiffLine {
    /// Creates a tagged diff line
    #[must_use]
    pub fn new(tag: DiffTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag.prefix(), self.text)
    }
}

/// Computes the tagged line diff between `old` and `new`
///
/// Unchanged lines are dropped. An identical pair yields an empty vector,
/// which is a valid result, not an error.
#[must_use]
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    let diff = TextDiff::from_lines(old, new);
    diff.iter_all_changes()
        .filter_map(|change| {
            let tag = match change.tag() {
                ChangeTag::Delete => DiffTag::Removed,
                ChangeTag::Insert => DiffTag::Added,
                ChangeTag::Equal => return None,
            };
            Some(DiffLine::new(tag, strip_line_ending(change.value())))
        })
        .collect()
}

/// Drops a trailing `\n` or `\r\n` from one diffed line
fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_identical_texts_yield_empty_diff() {
        assert!(diff_lines("a\nb\nc\n", "a\nb\nc\n").is_empty());
        assert!(diff_lines("", "").is_empty());
    }

    #[test]
    fn test_all_lines_added_from_empty_old() {
        let diff = diff_lines("", "a\nb\nc\n");
        assert_eq!(
            diff,
            vec![
                DiffLine::new(DiffTag::Added, "a"),
                DiffLine::new(DiffTag::Added, "b"),
                DiffLine::new(DiffTag::Added, "c"),
            ]
        );
    }

    #[test]
    fn test_single_removed_line() {
        let diff = diff_lines("a\nb\nc\n", "a\nc\n");
        assert_eq!(diff, vec![DiffLine::new(DiffTag::Removed, "b")]);
    }

    #[test]
    fn test_replacement_orders_removal_first() {
        let diff = diff_lines("a\nold\nc\n", "a\nnew\nc\n");
        assert_eq!(
            diff,
            vec![
                DiffLine::new(DiffTag::Removed, "old"),
                DiffLine::new(DiffTag::Added, "new"),
            ]
        );
    }

    #[test]
    fn test_changes_listed_in_document_order() {
        let diff = diff_lines("a\nb\nc\nd\n", "a\nB\nc\nD\n");
        assert_eq!(
            diff,
            vec![
                DiffLine::new(DiffTag::Removed, "b"),
                DiffLine::new(DiffTag::Added, "B"),
                DiffLine::new(DiffTag::Removed, "d"),
                DiffLine::new(DiffTag::Added, "D"),
            ]
        );
    }

    #[test]
    fn test_crlf_lines_are_stripped() {
        let diff = diff_lines("a\r\n", "a\r\nb\r\n");
        assert_eq!(diff, vec![DiffLine::new(DiffTag::Added, "b")]);
    }

    #[test]
    fn test_display_uses_two_character_tags() {
        assert_eq!(
            DiffLine::new(DiffTag::Added, "ip address 10.0.0.1").to_string(),
            "+ ip address 10.0.0.1"
        );
        assert_eq!(
            DiffLine::new(DiffTag::Removed, "ip address 10.0.0.2").to_string(),
            "- ip address 10.0.0.2"
        );
    }

    /// Counts lines as a multiset
    fn line_counts(text: &str) -> HashMap<&str, i64> {
        let mut counts = HashMap::new();
        for line in text.lines() {
            *counts.entry(line).or_insert(0) += 1;
        }
        counts
    }

    /// Strategy producing small configuration-like texts that share lines,
    /// so diffs exercise the equal/removed/added mix rather than full
    /// rewrites.
    fn config_text() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                Just("interface ether1".to_string()),
                Just("interface ether2".to_string()),
                Just("ip address 10.0.0.1/24".to_string()),
                Just("ip route add dst 0.0.0.0/0".to_string()),
                "[a-z]{1,8}",
            ],
            0..12,
        )
        .prop_map(|lines| {
            if lines.is_empty() {
                String::new()
            } else {
                lines.join("\n") + "\n"
            }
        })
    }

    proptest! {
        #[test]
        fn prop_diff_of_identical_texts_is_empty(text in config_text()) {
            prop_assert!(diff_lines(&text, &text).is_empty());
        }

        /// Round-trip law in multiset form: the new text's lines are exactly
        /// the old text's lines minus the removals plus the additions.
        #[test]
        fn prop_removals_and_additions_reconstruct_new(
            old in config_text(),
            new in config_text(),
        ) {
            let diff = diff_lines(&old, &new);

            let mut counts: HashMap<&str, i64> = line_counts(&old);
            for line in &diff {
                let entry = counts.entry(line.text.as_str()).or_insert(0);
                match line.tag {
                    DiffTag::Added => *entry += 1,
                    DiffTag::Removed => *entry -= 1,
                }
            }
            counts.retain(|_, count| *count != 0);

            let mut expected = line_counts(&new);
            expected.retain(|_, count| *count != 0);

            prop_assert_eq!(counts, expected);
        }

        /// Every removed line occurs in the old text, every added line in
        /// the new one.
        #[test]
        fn prop_tagged_lines_come_from_their_side(
            old in config_text(),
            new in config_text(),
        ) {
            let old_counts = line_counts(&old);
            let new_counts = line_counts(&new);
            for line in diff_lines(&old, &new) {
                match line.tag {
                    DiffTag::Removed => {
                        prop_assert!(old_counts.contains_key(line.text.as_str()));
                    }
                    DiffTag::Added => {
                        prop_assert!(new_counts.contains_key(line.text.as_str()));
                    }
                }
            }
        }
    }
}
