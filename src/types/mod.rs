// src/types/mod.rs - Core types shared across the filtering engine

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Minimum character length accepted for a banned term. Shorter strings are
/// almost guaranteed to appear inside legitimate words.
pub const MIN_TERM_CHARS: usize = 2;

/// A banned word in its canonical spelling: trimmed, NFC-normalized, lowercase.
///
/// Construction goes through [`BannedTerm::new`] so every instance upholds the
/// invariant; serde round-trips through the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BannedTerm(String);

impl BannedTerm {
    /// Normalize `raw` into canonical form, rejecting terms shorter than
    /// [`MIN_TERM_CHARS`] characters.
    pub fn new(raw: &str) -> Result<Self, TermError> {
        let canonical: String = raw.trim().nfc().collect::<String>().to_lowercase();
        if canonical.chars().count() < MIN_TERM_CHARS {
            return Err(TermError::TooShort(raw.trim().to_string()));
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes. Cyrillic terms are multi-byte in
    /// UTF-8, so `len()` on the inner string would over-count.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for BannedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BannedTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BannedTerm {
    type Error = TermError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<BannedTerm> for String {
    fn from(term: BannedTerm) -> Self {
        term.0
    }
}

/// Which detection strategy produced a hit. Variant order mirrors the order
/// the engine runs them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Substitution- and separator-tolerant compiled pattern.
    PatternMatch,
    /// Literal containment after all separators are stripped.
    NoSpaces,
    /// Containment after folding Latin lookalikes back to Cyrillic.
    Translit,
    /// Containment of the letter-spaced term in the letter-spaced message.
    Spaced,
}

impl MatchStrategy {
    pub fn as_tag(&self) -> &'static str {
        match self {
            MatchStrategy::PatternMatch => "pattern_match",
            MatchStrategy::NoSpaces => "no_spaces",
            MatchStrategy::Translit => "translit",
            MatchStrategy::Spaced => "spaced",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Outcome of checking one message. Produced fresh per call, never stored by
/// the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum MatchVerdict {
    Clean,
    Flagged {
        term: BannedTerm,
        strategy: MatchStrategy,
    },
}

impl MatchVerdict {
    pub fn is_flagged(&self) -> bool {
        matches!(self, MatchVerdict::Flagged { .. })
    }

    pub fn term(&self) -> Option<&BannedTerm> {
        match self {
            MatchVerdict::Flagged { term, .. } => Some(term),
            MatchVerdict::Clean => None,
        }
    }

    pub fn strategy(&self) -> Option<MatchStrategy> {
        match self {
            MatchVerdict::Flagged { strategy, .. } => Some(*strategy),
            MatchVerdict::Clean => None,
        }
    }
}

/// Term store mutation failures. These are normal outcomes reported back to
/// the admin-command collaborator, not system faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    #[error("term '{0}' is shorter than 2 characters")]
    TooShort(String),
    #[error("term '{0}' is already in the filter")]
    AlreadyExists(String),
    #[error("term '{0}' is not in the filter")]
    NotFound(String),
}

/// Failure to read or parse an external term source. The store self-heals by
/// installing built-in defaults, but the caller still sees the error.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read banned words file: {0}")]
    Io(#[from] std::io::Error),
    #[error("banned words file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A single term failed to compile into a matcher. Fatal to that term only;
/// the rest of the rebuild proceeds.
#[derive(Debug, thiserror::Error)]
#[error("failed to compile matcher for '{term}': {source}")]
pub struct CompileError {
    pub term: String,
    pub source: regex::Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_is_lowercased_and_trimmed() {
        let term = BannedTerm::new("  ПрИвЕт ").unwrap();
        assert_eq!(term.as_str(), "привет");
        assert_eq!(term.char_len(), 6);
    }

    #[test]
    fn term_rejects_short_input() {
        assert_eq!(
            BannedTerm::new("x"),
            Err(TermError::TooShort("x".to_string()))
        );
        assert_eq!(BannedTerm::new("  "), Err(TermError::TooShort(String::new())));
    }

    #[test]
    fn term_serde_round_trip_validates() {
        let term: BannedTerm = serde_json::from_str("\"СлОвО\"").unwrap();
        assert_eq!(term.as_str(), "слово");
        assert!(serde_json::from_str::<BannedTerm>("\"a\"").is_err());
    }

    #[test]
    fn strategy_tags_are_snake_case() {
        assert_eq!(MatchStrategy::PatternMatch.to_string(), "pattern_match");
        assert_eq!(MatchStrategy::NoSpaces.to_string(), "no_spaces");
    }

    #[test]
    fn verdict_accessors() {
        let clean = MatchVerdict::Clean;
        assert!(!clean.is_flagged());
        assert_eq!(clean.term(), None);

        let hit = MatchVerdict::Flagged {
            term: BannedTerm::new("слово").unwrap(),
            strategy: MatchStrategy::Translit,
        };
        assert!(hit.is_flagged());
        assert_eq!(hit.strategy(), Some(MatchStrategy::Translit));
    }
}
