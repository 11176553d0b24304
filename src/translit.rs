//! Phonetic transliteration of translation words.
//!
//! The pipeline only needs to know which languages can be transliterated and
//! to look words up; where the transcriptions come from is up to the
//! implementation.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

pub trait Transliterator {
    fn supports(&self, language: &str) -> bool;

    /// IPA for `word`, or `None` when no transcription is known.
    fn transliterate(&self, language: &str, word: &str) -> Option<String>;
}

/// Supports no language, so every translation is stored as a plain word.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransliteration;

impl Transliterator for NoTransliteration {
    fn supports(&self, _language: &str) -> bool {
        false
    }

    fn transliterate(&self, _language: &str, _word: &str) -> Option<String> {
        None
    }
}

/// Precomputed transcriptions, language code → word → IPA, loaded up front.
#[derive(Debug, Clone, Default)]
pub struct TableTransliterator {
    tables: HashMap<String, HashMap<String, String>>,
}

fn normalize(word: &str) -> String {
    word.trim().nfc().collect()
}

impl TableTransliterator {
    pub fn new(tables: HashMap<String, HashMap<String, String>>) -> Self {
        let tables = tables
            .into_iter()
            .map(|(language, words)| {
                let words: HashMap<String, String> = words
                    .into_iter()
                    .map(|(word, ipa)| (normalize(&word), ipa))
                    .collect();
                (language, words)
            })
            .collect();
        Self { tables }
    }

    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        Ok(Self::new(serde_yaml::from_str(yaml)?))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml_str(&contents).map_err(|e| Error::yaml(path, e))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl Transliterator for TableTransliterator {
    fn supports(&self, language: &str) -> bool {
        self.tables.contains_key(language)
    }

    fn transliterate(&self, language: &str, word: &str) -> Option<String> {
        self.tables.get(language)?.get(&normalize(word)).cloned()
    }
}
