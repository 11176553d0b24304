//! The fixed vocabulary of section titles the classifier reshapes on.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::error::{Error, Result};

static BUILTIN: Lazy<Taxonomy> = Lazy::new(Taxonomy::default);

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Named title sets driving classification. Matching is "title contains a
/// configured name", so `Etymology 2` is still an etymology.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    /// Also the order in which parts of speech are gathered into `Forms`.
    pub parts_of_speech: Vec<String>,
    pub collapsible: Vec<String>,
    pub semi_collapsible: Vec<String>,
    pub ignored: Vec<String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            parts_of_speech: names(&["Adjective", "Adverb", "Noun", "Verb"]),
            collapsible: names(&[
                "Alternative forms",
                "Anagrams",
                "Antonyms",
                "Conjugation",
                "Declension",
                "Derived terms",
                "Descendants",
                "Pronunciation",
                "Related terms",
                "Romanization",
                "See also",
                "Synonyms",
                "Translations",
            ]),
            semi_collapsible: names(&["Etymology"]),
            ignored: names(&["Further reading", "References", "Usage notes"]),
        }
    }
}

fn contains_one_of(title: &str, list: &[String]) -> bool {
    list.iter().any(|name| title.contains(name.as_str()))
}

impl Taxonomy {
    /// Shared instance of the default lists.
    pub fn builtin() -> &'static Taxonomy {
        &BUILTIN
    }

    pub fn from_yaml_str(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_yaml_str(&contents).map_err(|e| Error::yaml(path, e))
    }

    pub fn is_part_of_speech(&self, title: &str) -> bool {
        contains_one_of(title, &self.parts_of_speech)
    }

    pub fn is_collapsible(&self, title: &str) -> bool {
        contains_one_of(title, &self.collapsible)
    }

    pub fn is_semi_collapsible(&self, title: &str) -> bool {
        contains_one_of(title, &self.semi_collapsible)
    }

    pub fn is_ignored(&self, title: &str) -> bool {
        contains_one_of(title, &self.ignored)
    }
}
