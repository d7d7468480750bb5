// src/filter/engine.rs - Strategy orchestration and generation management

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info};

use crate::config::{FilterSettings, ObfuscationModel};
use crate::filter::compiler::{self, CompiledMatcher};
use crate::filter::normalize::{spaced, NormalizedMessage};
use crate::filter::store::TermStore;
use crate::types::{BannedTerm, LoadError, MatchStrategy, MatchVerdict, TermError};

/// An immutable snapshot of compiled matchers for one state of the term
/// store. Installed wholesale after every mutation; concurrent `check` calls
/// share the currently-installed generation and never observe a partial one.
#[derive(Debug)]
pub struct MatcherGeneration {
    sequence: u64,
    terms: Vec<BannedTerm>,
    matchers: Vec<CompiledMatcher>,
}

impl MatcherGeneration {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// All terms of this generation, in store order. Terms whose matcher
    /// failed to compile are still present here and still caught by the
    /// substring strategies.
    pub fn terms(&self) -> &[BannedTerm] {
        &self.terms
    }

    pub fn matchers(&self) -> &[CompiledMatcher] {
        &self.matchers
    }
}

struct EngineState {
    store: TermStore,
    generation: Arc<MatcherGeneration>,
}

/// The detection engine: a term store, an obfuscation model, and four
/// detection strategies run in fixed priority order.
///
/// `check` is a pure function of the message and the installed generation and
/// is safe to call from any number of threads; mutations take the write lock,
/// rebuild the matcher set, and swap it in before returning.
pub struct MatchEngine {
    model: ObfuscationModel,
    settings: FilterSettings,
    state: RwLock<EngineState>,
}

impl MatchEngine {
    /// Engine with an empty term store. `check` returns `Clean` until terms
    /// are loaded.
    pub fn new(model: ObfuscationModel, settings: FilterSettings) -> Self {
        Self::from_store(model, settings, TermStore::new())
    }

    /// Engine preloaded with the built-in default term set.
    pub fn with_default_terms(model: ObfuscationModel, settings: FilterSettings) -> Self {
        Self::from_store(model, settings, TermStore::with_defaults())
    }

    fn from_store(model: ObfuscationModel, settings: FilterSettings, store: TermStore) -> Self {
        let generation = Arc::new(Self::build_generation(0, &store, &model));
        Self {
            model,
            settings,
            state: RwLock::new(EngineState { store, generation }),
        }
    }

    /// Check one message against the installed generation. First strategy to
    /// hit wins; absence of a match is a normal outcome, never an error.
    pub fn check(&self, text: &str) -> MatchVerdict {
        let generation = self.generation();
        if generation.terms.is_empty() {
            return MatchVerdict::Clean;
        }

        let message = NormalizedMessage::new(text);

        if let Some(verdict) = Self::pattern_strategy(&generation, &message.lowered) {
            return verdict;
        }
        if let Some(verdict) = self.despaced_strategy(&generation, &message.despaced) {
            return verdict;
        }
        if let Some(verdict) = self.translit_strategy(&generation, &message) {
            return verdict;
        }
        if let Some(verdict) = Self::spaced_strategy(&generation, &message) {
            return verdict;
        }

        MatchVerdict::Clean
    }

    /// Strategy 1: compiled substitution/separator/repetition-tolerant
    /// patterns against the lowered text, in term order.
    fn pattern_strategy(generation: &MatcherGeneration, lowered: &str) -> Option<MatchVerdict> {
        for matcher in &generation.matchers {
            if matcher.is_match(lowered) {
                debug!("pattern_match hit for '{}'", matcher.term());
                return Some(MatchVerdict::Flagged {
                    term: matcher.term().clone(),
                    strategy: MatchStrategy::PatternMatch,
                });
            }
        }
        None
    }

    /// Strategy 2: literal containment in the separator-stripped text. Terms
    /// below the configured length cutoff are skipped; short fragments appear
    /// incidentally inside longer legitimate words once separators are gone.
    fn despaced_strategy(
        &self,
        generation: &MatcherGeneration,
        despaced: &str,
    ) -> Option<MatchVerdict> {
        for term in &generation.terms {
            if term.char_len() < self.settings.min_despaced_len {
                continue;
            }
            if despaced.contains(term.as_str()) {
                debug!("no_spaces hit for '{}'", term);
                return Some(MatchVerdict::Flagged {
                    term: term.clone(),
                    strategy: MatchStrategy::NoSpaces,
                });
            }
        }
        None
    }

    /// Strategy 3: containment after folding Latin lookalikes back to
    /// Cyrillic, one folding pair per variant, variant order then term order.
    fn translit_strategy(
        &self,
        generation: &MatcherGeneration,
        message: &NormalizedMessage,
    ) -> Option<MatchVerdict> {
        for variant in message.translit_variants(&self.model) {
            for term in &generation.terms {
                if variant.contains(term.as_str()) {
                    debug!("translit hit for '{}' in variant '{}'", term, variant);
                    return Some(MatchVerdict::Flagged {
                        term: term.clone(),
                        strategy: MatchStrategy::Translit,
                    });
                }
            }
        }
        None
    }

    /// Strategy 4: the letter-spaced term inside the letter-spaced text.
    fn spaced_strategy(
        generation: &MatcherGeneration,
        message: &NormalizedMessage,
    ) -> Option<MatchVerdict> {
        let spaced_text = message.spaced_lowered();
        for term in &generation.terms {
            if spaced_text.contains(&spaced(term.as_str())) {
                debug!("spaced hit for '{}'", term);
                return Some(MatchVerdict::Flagged {
                    term: term.clone(),
                    strategy: MatchStrategy::Spaced,
                });
            }
        }
        None
    }

    /// Add a banned term. On success the rebuilt generation is installed
    /// before this returns, so the very next `check` reflects it.
    pub fn add_term(&self, raw: &str) -> Result<BannedTerm, TermError> {
        let mut state = self.write_state();
        let term = state.store.add(raw)?;
        self.install_generation(&mut state);
        Ok(term)
    }

    /// Remove a banned term; it stops matching as soon as this returns.
    pub fn remove_term(&self, raw: &str) -> Result<BannedTerm, TermError> {
        let mut state = self.write_state();
        let term = state.store.remove(raw)?;
        self.install_generation(&mut state);
        Ok(term)
    }

    /// Replace the whole term set (invalid entries skipped, empty result
    /// falls back to built-in defaults) and rebuild.
    pub fn replace_terms<I>(&self, raw_terms: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut state = self.write_state();
        let count = state.store.replace_all(raw_terms);
        self.install_generation(&mut state);
        count
    }

    /// Reload terms from the JSON file format. Self-healing: on failure the
    /// built-in defaults are installed and rebuilt, and the error is returned
    /// so the collaborator can surface it.
    pub fn load_terms_file(&self, path: impl AsRef<std::path::Path>) -> Result<usize, LoadError> {
        let mut state = self.write_state();
        let result = state.store.load_file(path);
        self.install_generation(&mut state);
        result
    }

    /// Snapshot of the current terms, in insertion order.
    pub fn terms(&self) -> Vec<BannedTerm> {
        self.generation().terms.clone()
    }

    /// Sequence number of the installed generation; bumps on every mutation.
    pub fn generation_sequence(&self) -> u64 {
        self.generation().sequence
    }

    fn generation(&self) -> Arc<MatcherGeneration> {
        let state = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state.generation)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn install_generation(&self, state: &mut EngineState) {
        let sequence = state.generation.sequence + 1;
        state.generation = Arc::new(Self::build_generation(sequence, &state.store, &self.model));
    }

    fn build_generation(
        sequence: u64,
        store: &TermStore,
        model: &ObfuscationModel,
    ) -> MatcherGeneration {
        let terms = store.terms().to_vec();
        let matchers = compiler::compile_all(&terms, model);
        info!(
            "Installed matcher generation {}: {} matchers for {} terms",
            sequence,
            matchers.len(),
            terms.len()
        );
        MatcherGeneration {
            sequence,
            terms,
            matchers,
        }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::with_default_terms(ObfuscationModel::default(), FilterSettings::default())
    }
}
