//! The document model shared by every stage of the pipeline.
//!
//! A [`Section`] starts life as a header with raw lines and child headers. Classification
//! and the extraction passes then replace child values in place with the other [`Node`]
//! variants, so the final tree mixes structure and extracted data the same way the JSON
//! output does.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::extract::onyms::OnymMap;
use crate::extract::pronunciation::PronunciationEntry;
use crate::extract::translations::TranslationTable;

/// Key used when a section's raw lines are written out.
pub const CONTENT_KEY: &str = "_";
pub const FORMS_KEY: &str = "Forms";
pub const DEFINITIONS_KEY: &str = "Definitions";
pub const ETYMOLOGY_KEY: &str = "Etymology";

/// Insertion-ordered string map. Section titles and sense labels come out in
/// document order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert or replace. A replaced value keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.position(key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        let idx = match self.position(key) {
            Some(idx) => idx,
            None => {
                self.entries.push((key.to_string(), default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One header and everything below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    /// Raw lines directly under the header. `None` once they have been consumed
    /// (or for intermediate sections that never had a header line of their own).
    pub content: Option<Vec<String>>,
    pub children: OrderedMap<Node>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: Some(lines.into_iter().map(Into::into).collect()),
            children: OrderedMap::new(),
        }
    }

    /// A section holding exactly one child, as used for Forms wrappers.
    pub fn single(key: impl Into<String>, node: Node) -> Self {
        let mut section = Self::new();
        section.children.insert(key, node);
        section
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children.get(key)
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.children.get(key).and_then(Node::as_section)
    }

    pub fn section_mut(&mut self, key: &str) -> Option<&mut Section> {
        self.children.get_mut(key).and_then(Node::as_section_mut)
    }

    pub fn forms(&self) -> Option<&[Section]> {
        match self.children.get(FORMS_KEY)? {
            Node::Forms(forms) => Some(forms),
            _ => None,
        }
    }

    /// Follow `path` from this section, creating empty sections where missing.
    /// A non-section value in the way is replaced.
    pub fn descend_or_create(&mut self, path: &[String]) -> &mut Section {
        let mut current = self;
        for title in path {
            let node = current
                .children
                .get_or_insert_with(title, || Node::Section(Section::new()));
            if !matches!(node, Node::Section(_)) {
                *node = Node::Section(Section::new());
            }
            current = match node {
                Node::Section(section) => section,
                _ => unreachable!("replaced above"),
            };
        }
        current
    }

    pub fn descend_mut(&mut self, path: &[String]) -> Option<&mut Section> {
        let mut current = self;
        for title in path {
            current = current.section_mut(title)?;
        }
        Some(current)
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.children.len() + usize::from(self.content.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(content) = &self.content {
            map.serialize_entry(CONTENT_KEY, content)?;
        }
        for (k, v) in self.children.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Every value a section child can take over the life of the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Section(Section),
    /// Cleaned line list: collapsed sections, `Definitions`, `Etymology`.
    Lines(Vec<String>),
    Forms(Vec<Section>),
    Pronunciation(Vec<PronunciationEntry>),
    Onyms(OnymMap),
    Terms(Vec<String>),
    Translations(TranslationTable),
}

impl Node {
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Node::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Node::Section(section) => Some(section),
            _ => None,
        }
    }

    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            Node::Lines(lines) => Some(lines),
            _ => None,
        }
    }

    pub fn as_translations(&self) -> Option<&TranslationTable> {
        match self {
            Node::Translations(table) => Some(table),
            _ => None,
        }
    }

    /// Lines an extractor can still consume: a collapsed list, or the raw
    /// content of a section that was never collapsed.
    pub fn raw_lines(&self) -> Option<&[String]> {
        match self {
            Node::Lines(lines) => Some(lines),
            Node::Section(section) => section.content.as_deref(),
            _ => None,
        }
    }
}

impl From<Section> for Node {
    fn from(section: Section) -> Self {
        Node::Section(section)
    }
}
