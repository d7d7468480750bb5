// src/config/mod.rs - Obfuscation model and filter tuning configuration

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// How a malicious author may rewrite each base character: visually or
/// phonetically similar characters across alphabets, leetspeak digits, and
/// multi-character transliterations.
///
/// Invariant: every mapped character's substitute list starts with the
/// character itself. The constructor and every deserialization path repair
/// lists that omit it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObfuscationModel {
    substitutions: HashMap<char, Vec<String>>,
    /// Cross-alphabet folding pairs (Latin char, Cyrillic char) used by the
    /// translit strategy. Much smaller than the substitution table; order is
    /// significant and preserved.
    translit_pairs: Vec<(char, char)>,
}

impl ObfuscationModel {
    pub fn new(substitutions: HashMap<char, Vec<String>>, translit_pairs: Vec<(char, char)>) -> Self {
        let mut model = Self {
            substitutions,
            translit_pairs,
        };
        model.repair();
        model
    }

    /// Load the model from a JSON file. The file replaces the built-in tables
    /// wholesale; install the result into a fresh engine to apply it.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read obfuscation model from {}", path.display()))?;
        let model = Self::from_json_str(&raw)
            .with_context(|| format!("invalid obfuscation model in {}", path.display()))?;
        info!(
            "Loaded obfuscation model: {} substitution entries, {} translit pairs",
            model.substitutions.len(),
            model.translit_pairs.len()
        );
        Ok(model)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut model: ObfuscationModel =
            serde_json::from_str(raw).context("failed to parse obfuscation model JSON")?;
        model.repair();
        Ok(model)
    }

    /// Ordered substitutes for `base`, the character itself first. Unmapped
    /// characters yield just themselves, so the compiler never has to special
    /// case them.
    pub fn substitutes_for(&self, base: char) -> Vec<String> {
        match self.substitutions.get(&base) {
            Some(subs) => subs.clone(),
            None => vec![base.to_string()],
        }
    }

    pub fn translit_pairs(&self) -> &[(char, char)] {
        &self.translit_pairs
    }

    fn repair(&mut self) {
        for (base, subs) in self.substitutions.iter_mut() {
            let own = base.to_string();
            if subs.first() != Some(&own) {
                subs.retain(|s| *s != own);
                subs.insert(0, own);
                debug!("Obfuscation entry for '{}' did not lead with itself; repaired", base);
            }
        }
    }
}

impl Default for ObfuscationModel {
    fn default() -> Self {
        Self::new(default_substitutions(), default_translit_pairs())
    }
}

/// Substitution table covering the Russian alphabet: Latin lookalikes,
/// leetspeak digits, and standard transliterations. Empty substitutes mark
/// characters an evader can drop entirely (hard/soft signs).
fn default_substitutions() -> HashMap<char, Vec<String>> {
    let entries: &[(char, &[&str])] = &[
        ('а', &["a", "@"]),
        ('б', &["b", "6"]),
        ('в', &["v", "b"]),
        ('г', &["g", "r"]),
        ('д', &["d"]),
        ('е', &["e"]),
        ('ё', &["е", "e"]),
        ('ж', &["zh", "z*"]),
        ('з', &["z", "3"]),
        ('и', &["i", "u", "1"]),
        ('й', &["j", "y", "i"]),
        ('к', &["k"]),
        ('л', &["l"]),
        ('м', &["m"]),
        ('н', &["n"]),
        ('о', &["o", "0"]),
        ('п', &["p", "n"]),
        ('р', &["r", "p"]),
        ('с', &["c", "s"]),
        ('т', &["t", "m"]),
        ('у', &["y", "u"]),
        ('ф', &["f"]),
        ('х', &["x", "h"]),
        ('ц', &["c", "ts"]),
        ('ч', &["ch", "4"]),
        ('ш', &["sh"]),
        ('щ', &["sch", "shch"]),
        ('ъ', &[""]),
        ('ы', &["i", "y"]),
        ('ь', &[""]),
        ('э', &["e"]),
        ('ю', &["yu", "iu"]),
        ('я', &["ya", "ia"]),
    ];

    entries
        .iter()
        .map(|(base, subs)| {
            let mut list = vec![base.to_string()];
            list.extend(subs.iter().map(|s| s.to_string()));
            (*base, list)
        })
        .collect()
}

/// Latin characters frequently typed in place of the Cyrillic letter they
/// resemble. Applied one pair at a time by the translit strategy.
fn default_translit_pairs() -> Vec<(char, char)> {
    vec![
        ('a', 'а'),
        ('b', 'в'),
        ('c', 'с'),
        ('e', 'е'),
        ('k', 'к'),
        ('m', 'м'),
        ('o', 'о'),
        ('p', 'р'),
        ('t', 'т'),
        ('x', 'х'),
        ('y', 'у'),
    ]
}

/// Heuristic tuning knobs. The defaults reproduce behavior the engine was
/// tuned with in production; none of them are known to be optimal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    /// Minimum term length (in characters) for the separator-stripping
    /// strategy. Shorter terms show up incidentally inside longer legitimate
    /// words once separators are gone.
    #[serde(default = "default_min_despaced_len")]
    pub min_despaced_len: usize,
}

fn default_min_despaced_len() -> usize {
    4
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            min_despaced_len: default_min_despaced_len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_default_entry_leads_with_itself() {
        let model = ObfuscationModel::default();
        for base in "абвгдеёжзийклмнопрстуфхцчшщъыьэюя".chars() {
            let subs = model.substitutes_for(base);
            assert_eq!(subs[0], base.to_string(), "entry for '{}'", base);
        }
    }

    #[test]
    fn digit_one_substitutes_for_i() {
        let model = ObfuscationModel::default();
        assert!(model.substitutes_for('и').contains(&"1".to_string()));
    }

    #[test]
    fn unmapped_character_maps_to_itself() {
        let model = ObfuscationModel::default();
        assert_eq!(model.substitutes_for('q'), vec!["q".to_string()]);
    }

    #[test]
    fn repair_prepends_missing_base_character() {
        let mut subs = HashMap::new();
        subs.insert('а', vec!["a".to_string(), "@".to_string()]);
        let model = ObfuscationModel::new(subs, Vec::new());
        assert_eq!(
            model.substitutes_for('а'),
            vec!["а".to_string(), "a".to_string(), "@".to_string()]
        );
    }

    #[test]
    fn model_loads_from_json() {
        let raw = r#"{
            "substitutions": { "о": ["о", "o", "0"] },
            "translit_pairs": [["o", "о"]]
        }"#;
        let model = ObfuscationModel::from_json_str(raw).unwrap();
        assert_eq!(model.substitutes_for('о').len(), 3);
        assert_eq!(model.translit_pairs(), &[('o', 'о')]);
    }

    #[test]
    fn malformed_model_is_an_error() {
        assert!(ObfuscationModel::from_json_str("{ not json").is_err());
    }

    #[test]
    fn settings_default_cutoff() {
        assert_eq!(FilterSettings::default().min_despaced_len, 4);
        let parsed: FilterSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.min_despaced_len, 4);
    }
}
