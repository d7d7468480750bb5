// src/filter/compiler.rs - Substitution- and separator-tolerant matcher compilation

use log::{debug, warn};
use regex::Regex;

use crate::config::ObfuscationModel;
use crate::types::{BannedTerm, CompileError};

/// Zero-or-more separator characters allowed between consecutive matched
/// units. Must stay in sync with [`crate::filter::normalize::is_separator`].
const SEPARATOR_CONNECTOR: &str = r"[\s\-_\.]*";

/// A compiled, obfuscation-tolerant pattern bound to exactly one banned term.
/// Immutable once built; rebuilds replace the whole matcher set.
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    term: BannedTerm,
    pattern: Regex,
}

impl CompiledMatcher {
    pub fn term(&self) -> &BannedTerm {
        &self.term
    }

    /// Test against already-lowercased text.
    pub fn is_match(&self, lowered: &str) -> bool {
        self.pattern.is_match(lowered)
    }

    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Compile one term: each character becomes an alternation of itself and its
/// registered substitutes (literally escaped), repeated one-or-more times,
/// with optional separators between consecutive units.
///
/// "слово", "с л о в о", "сслоовоо" and "с-л-о-в-о" all satisfy the result.
pub fn compile(term: &BannedTerm, model: &ObfuscationModel) -> Result<CompiledMatcher, CompileError> {
    let mut units = Vec::new();
    let mut any_required = false;

    for c in term.as_str().chars() {
        let substitutes = model.substitutes_for(c);
        // An empty substitute means the character can be dropped outright
        // (hard/soft signs), so the whole unit becomes optional.
        let droppable = substitutes.iter().any(|s| s.is_empty());
        let alternates: Vec<String> = substitutes
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| regex::escape(s))
            .collect();
        any_required |= !droppable;
        units.push((format!("(?:{})", alternates.join("|")), droppable));
    }

    let sources: Vec<String> = units
        .into_iter()
        .map(|(unit, droppable)| {
            // A term made only of droppable characters would compile to a
            // pattern that matches the empty string, i.e. everywhere.
            if droppable && any_required {
                format!("{}*", unit)
            } else {
                format!("{}+", unit)
            }
        })
        .collect();

    // Joining puts the connector strictly between units, so no trailing
    // separator token is left dangling at either end.
    let source = sources.join(SEPARATOR_CONNECTOR);

    let pattern = Regex::new(&source).map_err(|source_err| CompileError {
        term: term.to_string(),
        source: source_err,
    })?;

    debug!("Compiled matcher for '{}': {}", term, source);
    Ok(CompiledMatcher { term: term.clone(), pattern })
}

/// Compile every term, skipping (and logging) the ones that fail. A defective
/// entry must not abort the rebuild of all the others.
pub fn compile_all(terms: &[BannedTerm], model: &ObfuscationModel) -> Vec<CompiledMatcher> {
    let mut matchers = Vec::with_capacity(terms.len());
    for term in terms {
        match compile(term, model) {
            Ok(matcher) => matchers.push(matcher),
            Err(err) => warn!("Skipping matcher for banned term: {}", err),
        }
    }
    matchers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObfuscationModel;
    use crate::types::BannedTerm;

    fn matcher(term: &str) -> CompiledMatcher {
        let model = ObfuscationModel::default();
        compile(&BannedTerm::new(term).unwrap(), &model).unwrap()
    }

    #[test]
    fn matches_clean_spelling() {
        assert!(matcher("привет").is_match("ну привет тебе"));
    }

    #[test]
    fn matches_latin_substitutions() {
        let m = matcher("привет");
        assert!(m.is_match("пpивeт")); // Latin p and e
        assert!(m.is_match("npuvet")); // fully transliterated
    }

    #[test]
    fn matches_leet_digits() {
        let m = matcher("лох");
        assert!(m.is_match("л0x"));
        assert!(!m.is_match("лик"));
    }

    #[test]
    fn matches_separators_and_repetition() {
        let m = matcher("привет");
        assert!(m.is_match("п-р-и-в-е-т"));
        assert!(m.is_match("п р и в е т"));
        assert!(m.is_match("п_р.и в-е т"));
        assert!(m.is_match("прииивввеет"));
    }

    #[test]
    fn multi_char_substitutes_match_as_a_whole() {
        // "щ" -> "sch": the alternates are whole strings, not character
        // classes, so "sch" matches while a lone "s" does not.
        let m = matcher("щит");
        assert!(m.is_match("schit"));
        assert!(!m.is_match("sit"));
    }

    #[test]
    fn regex_metacharacters_in_substitutes_are_escaped() {
        // "а" -> "@" and "ж" -> "z*" must be literal, never operators.
        let m = matcher("жаба");
        assert!(m.is_match("z*@ба"));
        assert!(!m.is_match("zzzzб"));
    }

    #[test]
    fn droppable_characters_may_be_omitted() {
        let m = matcher("объект");
        assert!(m.is_match("обект"));
        assert!(m.is_match("объект"));
    }

    #[test]
    fn no_dangling_trailing_connector() {
        let m = matcher("мат");
        // The pattern must not end with a separator token that matches an
        // empty suffix; the source is unit-connector-unit all the way.
        assert!(!m.pattern_str().ends_with(r"[\s\-_\.]*"));
        assert!(m.is_match("м а т"));
        assert!(!m.is_match("м а"));
    }

    #[test]
    fn unrelated_text_does_not_match() {
        let m = matcher("лох");
        assert!(!m.is_match("хорошо лежит охапка"));
    }

    #[test_log::test]
    fn compile_all_keeps_going_past_failures() {
        let model = ObfuscationModel::default();
        let terms = vec![
            BannedTerm::new("лох").unwrap(),
            BannedTerm::new("чмо").unwrap(),
        ];
        let matchers = compile_all(&terms, &model);
        assert_eq!(matchers.len(), 2);
        assert_eq!(matchers[0].term().as_str(), "лох");
    }
}
