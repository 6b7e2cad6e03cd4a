//! Free-text dependency annotations
//!
//! Model output attaches dependencies as prose such as
//! `Depends on: step_read_config, step_run_tests`. Everything that knows about
//! that prose lives here, behind [`extract_references`] and
//! [`resolve_references`], so the graph code only ever sees identifiers.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use stepdag_core::constants::EMPTY_DEPENDENCY_MARKERS;

/// `Depends on:`, `Depends:`, `Dependency:` and `Dependencies:`
static LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:depends(?:\s+on)?|dependency|dependencies)\s*:")
        .expect("dependency label pattern is valid")
});

/// `2`, `#2`, `step 2`, `step #2`
static ORDINAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:step\s*)?#?\s*(\d+)$").expect("ordinal reference pattern is valid")
});

const WRAPPING_CHARS: &[char] = &['[', ']', '(', ')', '{', '}', '"', '\'', '`'];

/// Collect every reference declared in `text`
///
/// Text without a recognised label, an empty list, `[]` and `none` all yield an
/// empty set. References keep their original spelling; matching against known
/// identifiers happens in [`resolve_references`].
pub fn extract_references(text: &str) -> IndexSet<String> {
    let labels: Vec<_> = LABEL_PATTERN.find_iter(text).collect();
    let mut references = IndexSet::new();

    for (position, label) in labels.iter().enumerate() {
        let end = labels
            .get(position + 1)
            .map_or(text.len(), |next| next.start());
        references.extend(split_list(list_extent(&text[label.end()..end])));
    }

    references
}

/// Cut the text following a label down to the declared list
///
/// The list ends at a line break, at a closing bracket that was not opened
/// inside the list, or where a new sentence starts (`. ` followed by a word).
fn list_extent(rest: &str) -> &str {
    let mut depth = 0usize;

    for (pos, c) in rest.char_indices() {
        match c {
            '\r' | '\n' => return &rest[..pos],
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                if depth == 0 {
                    return &rest[..pos];
                }
                depth -= 1;
            }
            '.' if depth == 0 => {
                let after = &rest[pos + 1..];
                let next_word = after.trim_start_matches([' ', '\t']);
                let starts_sentence = next_word.len() < after.len()
                    && next_word.starts_with(char::is_alphanumeric);
                if starts_sentence {
                    return &rest[..pos];
                }
            }
            _ => {}
        }
    }

    rest
}

fn split_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.trim()
        .trim_end_matches('.')
        .split([',', ';'])
        .map(|entry| {
            entry
                .trim_matches(|c: char| {
                    c.is_whitespace() || c == '.' || WRAPPING_CHARS.contains(&c)
                })
                .to_string()
        })
        .filter(|entry| {
            !entry.is_empty()
                && !EMPTY_DEPENDENCY_MARKERS
                    .iter()
                    .any(|marker| marker.eq_ignore_ascii_case(entry))
        })
}

/// Lookup table from the spellings a reference may use to canonical ids
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    by_normalized: HashMap<String, String>,
    by_sequence: HashMap<u32, String>,
}

impl ReferenceIndex {
    /// Build from `(id, sequence_number)` pairs in declaration order
    ///
    /// When two entries normalise to the same key the first one wins.
    pub fn new<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut index = Self::default();
        for (id, sequence_number) in entries {
            index
                .by_normalized
                .entry(normalize(id))
                .or_insert_with(|| id.to_string());
            index
                .by_sequence
                .entry(sequence_number)
                .or_insert_with(|| id.to_string());
        }
        index
    }

    /// Canonical id for `reference`, if any step matches it
    pub fn resolve(&self, reference: &str) -> Option<&str> {
        if let Some(id) = self.by_normalized.get(&normalize(reference)) {
            return Some(id);
        }

        let ordinal = ORDINAL_PATTERN
            .captures(reference.trim())
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())?;
        self.by_sequence.get(&ordinal).map(String::as_str)
    }
}

/// Case-insensitive key; runs of whitespace and `-` read as `_`
fn normalize(reference: &str) -> String {
    let mut key = String::with_capacity(reference.len());
    let mut pending_separator = false;
    for c in reference.trim().chars() {
        if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        } else {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.extend(c.to_lowercase());
        }
    }
    key
}

/// Map each reference to its canonical id
///
/// Unresolvable references are kept as written so the validator can report
/// them together with the list of valid ids.
pub fn resolve_references(
    references: &IndexSet<String>,
    index: &ReferenceIndex,
) -> IndexSet<String> {
    references
        .iter()
        .map(|reference| match index.resolve(reference) {
            Some(id) => id.to_string(),
            None => {
                tracing::debug!(reference = %reference, "dependency reference did not resolve");
                reference.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(text: &str) -> Vec<String> {
        extract_references(text).into_iter().collect()
    }

    #[test]
    fn test_label_spellings() {
        assert_eq!(refs("Depends on: step_a"), vec!["step_a"]);
        assert_eq!(refs("dependency: step_a"), vec!["step_a"]);
        assert_eq!(refs("DEPENDENCIES: step_a, step_b"), vec!["step_a", "step_b"]);
        assert_eq!(refs("Depends: step_a"), vec!["step_a"]);
        assert_eq!(refs("depends   ON :step_a"), vec!["step_a"]);
    }

    #[test]
    fn test_whitespace_and_wrapping_are_tolerated() {
        assert_eq!(
            refs("Depends on:   [ step_a ,step_b,  `step_c` ]"),
            vec!["step_a", "step_b", "step_c"]
        );
        assert_eq!(
            refs("Dependencies: \"step_a\", 'step_b'."),
            vec!["step_a", "step_b"]
        );
    }

    #[test]
    fn test_inline_label_inside_prose() {
        assert_eq!(
            refs("Write the migration (Depends on: step_read_schema)"),
            vec!["step_read_schema"]
        );
        assert_eq!(
            refs("- path: src/lib.rs\n- Depends on: step_a\n- command: cargo fmt"),
            vec!["step_a"]
        );
    }

    #[test]
    fn test_list_ends_where_the_surrounding_prose_resumes() {
        assert_eq!(
            refs("Write the models (Depends on: step_read_schema) and keep them small."),
            vec!["step_read_schema"]
        );
        assert_eq!(
            refs("- Refresh caches [Dependencies: step_a, step_b] before deploying"),
            vec!["step_a", "step_b"]
        );
        assert_eq!(
            refs("Depends on: step_a, step_b. Then run the linter."),
            vec!["step_a", "step_b"]
        );
        assert_eq!(refs("Depends on: v1.2"), vec!["v1.2"]);
    }

    #[test]
    fn test_two_labels_on_one_line() {
        assert_eq!(
            refs("Depends on: step_a. Dependency: step_b"),
            vec!["step_a", "step_b"]
        );
        assert_eq!(
            refs("Depends on: step_a Dependencies: step_b, step_c"),
            vec!["step_a", "step_b", "step_c"]
        );
    }

    #[test]
    fn test_multiple_labels_are_unioned() {
        assert_eq!(
            refs("Depends on: step_a, step_b\nDependency: step_b; step_c"),
            vec!["step_a", "step_b", "step_c"]
        );
    }

    #[test]
    fn test_empty_declarations() {
        assert!(refs("").is_empty());
        assert!(refs("No dependencies here").is_empty());
        assert!(refs("Depends on:").is_empty());
        assert!(refs("Depends on: []").is_empty());
        assert!(refs("Dependencies: None").is_empty());
        assert!(refs("Dependencies: N/A").is_empty());
        assert!(refs("Depends on: , ,").is_empty());
    }

    #[test]
    fn test_case_insensitive_resolution() {
        let index = ReferenceIndex::new([("step_write_config", 1), ("step_run_tests", 2)]);
        assert_eq!(index.resolve("STEP_WRITE_CONFIG"), Some("step_write_config"));
        assert_eq!(index.resolve("Step Run Tests"), Some("step_run_tests"));
        assert_eq!(index.resolve("step-run-tests"), Some("step_run_tests"));
        assert_eq!(index.resolve("step_deploy"), None);
    }

    #[test]
    fn test_ordinal_resolution() {
        let index = ReferenceIndex::new([("step_read_a", 1), ("step_write_b", 2)]);
        assert_eq!(index.resolve("2"), Some("step_write_b"));
        assert_eq!(index.resolve("#1"), Some("step_read_a"));
        assert_eq!(index.resolve("Step 2"), Some("step_write_b"));
        assert_eq!(index.resolve("step #1"), Some("step_read_a"));
        assert_eq!(index.resolve("7"), None);
    }

    #[test]
    fn test_resolve_keeps_unknown_references_verbatim() {
        let index = ReferenceIndex::new([("step_read_a", 1)]);
        let references =
            extract_references("Depends on: STEP_READ_A, step_nonexistent, step_read_a");
        let resolved: Vec<String> = resolve_references(&references, &index).into_iter().collect();
        assert_eq!(resolved, vec!["step_read_a", "step_nonexistent"]);
    }
}
