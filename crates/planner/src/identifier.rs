//! Deterministic identifiers for plan steps
//!
//! Identifiers have the shape `<prefix>_<action>_<slug>`, where the slug is
//! the lower-cased description with punctuation stripped and whitespace
//! collapsed to single underscores. Collisions inside one step set are
//! resolved by appending `_2`, `_3`, and so on.

use std::collections::HashSet;
use stepdag_config::PlannerConfig;
use stepdag_core::{Action, PlanWarning};

/// An identifier issued by [`IdentifierGenerator::generate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedIdentifier {
    pub id: String,
    /// Set when the natural identifier was taken and a suffix was appended
    pub disambiguated_from: Option<String>,
}

impl IssuedIdentifier {
    /// Warning describing the rename, if one happened
    pub fn warning(&self) -> Option<PlanWarning> {
        self.disambiguated_from
            .as_ref()
            .map(|original| PlanWarning::IdentifierDisambiguated {
                original: original.clone(),
                assigned: self.id.clone(),
            })
    }
}

/// Issues unique identifiers for one step set
///
/// A generator must not be shared across planning calls; every call starts
/// with an empty set of issued identifiers.
#[derive(Debug, Clone)]
pub struct IdentifierGenerator {
    prefix: String,
    max_slug_len: usize,
    issued: HashSet<String>,
}

impl IdentifierGenerator {
    pub fn new(prefix: impl Into<String>, max_slug_len: usize) -> Self {
        Self {
            prefix: prefix.into(),
            max_slug_len,
            issued: HashSet::new(),
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.id_prefix.clone(), config.max_slug_len)
    }

    /// Identifier a step would get if nothing else had been issued
    pub fn base_identifier(
        &self,
        action: Action,
        description: &str,
        sequence_number: u32,
    ) -> String {
        let slug = slugify(strip_leading_verb(description, action), self.max_slug_len);
        if slug.is_empty() {
            format!("{}_{}_{}", self.prefix, action, sequence_number)
        } else {
            format!("{}_{}_{}", self.prefix, action, slug)
        }
    }

    /// Issue a unique identifier for a step
    pub fn generate(
        &mut self,
        action: Action,
        description: &str,
        sequence_number: u32,
    ) -> IssuedIdentifier {
        let base = self.base_identifier(action, description, sequence_number);
        if self.issued.insert(base.clone()) {
            return IssuedIdentifier {
                id: base,
                disambiguated_from: None,
            };
        }

        let mut suffix = 2usize;
        let id = loop {
            let candidate = format!("{base}_{suffix}");
            if self.issued.insert(candidate.clone()) {
                break candidate;
            }
            suffix += 1;
        };

        tracing::debug!(original = %base, assigned = %id, "identifier disambiguated");
        IssuedIdentifier {
            id,
            disambiguated_from: Some(base),
        }
    }
}

/// Lower-case `text`, drop punctuation and join words with `_`, keeping at
/// most `max_len` characters and never ending on a separator.
pub fn slugify(text: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(text.len().min(max_len));
    let mut pending_separator = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_separator = true;
        }
    }

    if slug.len() > max_len {
        // slug is pure ASCII here, so byte truncation is char-safe
        slug.truncate(max_len);
    }
    slug.trim_end_matches('_').to_string()
}

/// "Write the config" under `Action::Write` slugs as `the_config`, not
/// `write_the_config`, since the action already leads the identifier.
fn strip_leading_verb(description: &str, action: Action) -> &str {
    let trimmed = description.trim_start();
    let verb = action.as_str();
    match trimmed.get(..verb.len()) {
        Some(head) if head.eq_ignore_ascii_case(verb) => {
            let rest = &trimmed[verb.len()..];
            match rest.chars().next() {
                None => rest,
                Some(next) if !next.is_ascii_alphanumeric() => rest,
                Some(_) => trimmed,
            }
        }
        _ => trimmed,
    }
}
