use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::section::OrderedMap;
use crate::translit::Transliterator;

lazy_static! {
    static ref TRANS_TOP: Regex = Regex::new(r"\{\{trans-top\|([^}]+)\}\}").unwrap();
    // {{t|es|palabra}} and {{t+|fr|mot|m}}
    static ref TRANSLATION_TEMPLATE: Regex = Regex::new(r"\{\{t\+?\|([a-z-]+)\|([^}|]+)[|}]").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranslationEntry {
    Plain(String),
    Transliterated { word: String, ipa: String },
}

impl TranslationEntry {
    pub fn word(&self) -> &str {
        match self {
            TranslationEntry::Plain(word) => word,
            TranslationEntry::Transliterated { word, .. } => word,
        }
    }
}

/// Sense label → language code → translations.
pub type TranslationTable = OrderedMap<OrderedMap<Vec<TranslationEntry>>>;

fn cleanup_wikitext(word: &str) -> String {
    let stripped: String = word.chars().filter(|c| !matches!(c, '[' | ']')).collect();
    stripped.trim().to_string()
}

fn entry(language: &str, word: String, transliterator: &dyn Transliterator) -> TranslationEntry {
    if !transliterator.supports(language) {
        return TranslationEntry::Plain(word);
    }
    match transliterator.transliterate(language, &word) {
        Some(ipa) => TranslationEntry::Transliterated { word, ipa },
        None => TranslationEntry::Plain(word),
    }
}

/// Translations grouped under the `{{trans-top|...}}` block they appear in.
/// Lines before the first block land under the empty sense.
pub fn extract_translations(
    lines: &[String],
    transliterator: &dyn Transliterator,
) -> TranslationTable {
    let mut table = TranslationTable::new();
    let mut sense = String::new();

    for line in lines {
        if let Some(cap) = TRANS_TOP.captures(line) {
            sense = cap[1].trim().to_string();
            table.insert(sense.as_str(), OrderedMap::new());
            continue;
        }

        for cap in TRANSLATION_TEMPLATE.captures_iter(line) {
            let language = cap[1].trim();
            let word = cleanup_wikitext(&cap[2]);
            table
                .get_or_insert_with(&sense, OrderedMap::new)
                .get_or_insert_with(language, Vec::new)
                .push(entry(language, word, transliterator));
        }
    }

    table
}
