// src/filter/store.rs - Canonical set of banned base terms

use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::types::{BannedTerm, LoadError, TermError};

/// Built-in fallback term set, installed whenever an external source is
/// unreadable, malformed, or empty. The engine must never run with zero terms.
pub const DEFAULT_TERMS: &[&str] = &[
    "блять", "блядь", "пизда", "пиздец", "ебать", "ёб", "ебал",
    "хуй", "хуё", "мудак", "гондон", "сука", "дрочить", "трахать",
    "вагина", "член", "хер", "анус", "жопа", "сперма", "секс",
    "шлюха", "проститутка", "пидор", "гомик",
    "нацист", "фашист", "расист", "жид",
    "дебил", "идиот", "дурак", "тупица", "кретин", "даун",
    "лох", "лошара", "чмо", "отстой", "говно", "дерьмо",
    "срать", "срань", "залупа",
];

/// On-disk format for the banned words file.
#[derive(Debug, Serialize, Deserialize)]
struct TermFile {
    banned_words: Vec<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Insertion-ordered set of banned base terms. The store is plain data; the
/// engine wraps it with the single-writer lock and triggers matcher rebuilds
/// after every successful mutation.
#[derive(Debug, Clone, Default)]
pub struct TermStore {
    terms: Vec<BannedTerm>,
}

impl TermStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        store.install_defaults();
        store
    }

    fn install_defaults(&mut self) {
        self.terms = DEFAULT_TERMS
            .iter()
            .filter_map(|word| BannedTerm::new(word).ok())
            .collect();
        info!("Installed {} built-in banned terms", self.terms.len());
    }

    /// Replace the whole term set. Entries that fail validation are skipped
    /// with a warning; if nothing usable remains, the built-in defaults are
    /// installed so the store is never left empty.
    pub fn replace_all<I>(&mut self, raw_terms: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut terms: Vec<BannedTerm> = Vec::new();
        for raw in raw_terms {
            match BannedTerm::new(&raw) {
                Ok(term) => {
                    if terms.contains(&term) {
                        debug!("Duplicate banned term '{}' in source; keeping first", term);
                    } else {
                        terms.push(term);
                    }
                }
                Err(err) => warn!("Skipping invalid banned term: {}", err),
            }
        }

        if terms.is_empty() {
            warn!("Term source produced no usable terms; falling back to built-in defaults");
            self.install_defaults();
        } else {
            self.terms = terms;
            info!("Loaded {} banned terms", self.terms.len());
        }
        self.terms.len()
    }

    /// Load terms from a JSON file (`{"banned_words": [...]}`). On any read
    /// or parse failure the built-in defaults are installed and the error is
    /// still returned, so the caller learns the source is corrupt while the
    /// engine keeps functioning.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        match Self::read_file(path) {
            Ok(words) => Ok(self.replace_all(words)),
            Err(err) => {
                warn!(
                    "Failed to load banned words from {}: {}; installing built-in defaults",
                    path.display(),
                    err
                );
                self.install_defaults();
                Err(err)
            }
        }
    }

    fn read_file(path: &Path) -> Result<Vec<String>, LoadError> {
        let raw = std::fs::read_to_string(path)?;
        let file: TermFile = serde_json::from_str(&raw)?;
        Ok(file.banned_words)
    }

    /// Write the built-in default set to `path` in the loadable file format.
    /// Used by collaborators to bootstrap a missing banned words file.
    pub fn write_default_file(path: impl AsRef<Path>) -> Result<(), LoadError> {
        let file = TermFile {
            banned_words: DEFAULT_TERMS.iter().map(|w| w.to_string()).collect(),
            version: Some("1.0".to_string()),
            description: Some("Banned word base list for the moderation filter".to_string()),
        };
        let raw = serde_json::to_string_pretty(&file)?;
        std::fs::write(path.as_ref(), raw)?;
        Ok(())
    }

    /// Add one term, normalizing it first. Case-insensitive duplicates are
    /// rejected as a normal outcome.
    pub fn add(&mut self, raw: &str) -> Result<BannedTerm, TermError> {
        let term = BannedTerm::new(raw)?;
        if self.terms.contains(&term) {
            return Err(TermError::AlreadyExists(term.to_string()));
        }
        self.terms.push(term.clone());
        info!("Added banned term '{}'", term);
        Ok(term)
    }

    /// Remove one term by its canonical spelling.
    pub fn remove(&mut self, raw: &str) -> Result<BannedTerm, TermError> {
        let needle = raw.trim().to_lowercase();
        match self.terms.iter().position(|t| t.as_str() == needle) {
            Some(index) => {
                let term = self.terms.remove(index);
                info!("Removed banned term '{}'", term);
                Ok(term)
            }
            None => Err(TermError::NotFound(needle)),
        }
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[BannedTerm] {
        &self.terms
    }

    pub fn contains(&self, raw: &str) -> bool {
        let needle = raw.trim().to_lowercase();
        self.terms.iter().any(|t| t.as_str() == needle)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
