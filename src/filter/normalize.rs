// src/filter/normalize.rs - Alternate canonical views of an incoming message

use unicode_normalization::UnicodeNormalization;

use crate::config::ObfuscationModel;

/// Characters an evader can sprinkle between letters without changing what a
/// human reads: any Unicode whitespace, hyphen, underscore, period.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '_' | '.')
}

/// Views of one message, computed once and shared by all strategies.
#[derive(Debug, Clone)]
pub struct NormalizedMessage {
    /// NFC-folded, lowercased text. Composed and decomposed spellings of the
    /// same Cyrillic letter collapse to one form here.
    pub lowered: String,
    /// `lowered` with every separator deleted.
    pub despaced: String,
}

impl NormalizedMessage {
    pub fn new(text: &str) -> Self {
        let lowered: String = text.nfc().collect::<String>().to_lowercase();
        let despaced = lowered.chars().filter(|c| !is_separator(*c)).collect();
        Self { lowered, despaced }
    }

    /// One variant per folding-table pair that actually changes the text,
    /// with the unmodified lowered text first. Table order is preserved and
    /// variants are not deduplicated beyond the "changed" check.
    pub fn translit_variants(&self, model: &ObfuscationModel) -> Vec<String> {
        let mut variants = vec![self.lowered.clone()];
        for (latin, cyrillic) in model.translit_pairs() {
            let variant = self.lowered.replace(*latin, &cyrillic.to_string());
            if variant != self.lowered {
                variants.push(variant);
            }
        }
        variants
    }

    pub fn spaced_lowered(&self) -> String {
        spaced(&self.lowered)
    }
}

/// Insert a single space between every character. Used to detect terms
/// deliberately broken apart letter by letter.
pub fn spaced(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for (i, c) in text.chars().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowered_folds_case_and_composition() {
        // "й" written as "и" + combining breve must collapse to composed "й".
        let msg = NormalizedMessage::new("ПрИВЕТ и\u{0306}од");
        assert_eq!(msg.lowered, "привет йод");
    }

    #[test]
    fn despaced_strips_all_separator_kinds() {
        let msg = NormalizedMessage::new("п р-и_в.е\tт");
        assert_eq!(msg.despaced, "привет");
    }

    #[test]
    fn spaced_inserts_single_spaces() {
        assert_eq!(spaced("мат"), "м а т");
        assert_eq!(spaced(""), "");
        assert_eq!(spaced("x"), "x");
    }

    #[test]
    fn translit_variants_start_with_lowered_text() {
        let model = crate::config::ObfuscationModel::default();
        let msg = NormalizedMessage::new("cyka");
        let variants = msg.translit_variants(&model);
        assert_eq!(variants[0], "cyka");
        // 'a', 'c', 'k' and 'y' each produce a changed variant; the others
        // leave the text untouched and are dropped.
        assert!(variants.contains(&"cykа".to_string()));
        assert!(variants.contains(&"сyka".to_string()));
        assert!(variants.contains(&"cyкa".to_string()));
        assert!(variants.contains(&"cуka".to_string()));
        assert_eq!(variants.len(), 5);
    }

    #[test]
    fn unchanged_variants_are_not_emitted() {
        let model = crate::config::ObfuscationModel::default();
        let msg = NormalizedMessage::new("привет");
        assert_eq!(msg.translit_variants(&model), vec!["привет".to_string()]);
    }
}
