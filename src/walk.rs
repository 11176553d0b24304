//! Generic traversal used by every extraction pass.
//!
//! A [`Pass`] pairs the section titles to look for with the [`Extractor`] that
//! turns them into typed values. The walker finds every child whose title is in
//! the label set and either replaces it with the extractor's output or hands
//! it to a [`Preaction`] that needs more context than the lines alone (the
//! article title, the enclosing language).

use crate::error::Result;
use crate::extract::{extract_onyms, extract_pronunciation, extract_terms, extract_translations};
use crate::section::{Node, Section};
use crate::translit::Transliterator;

pub const TRANSLATIONS_KEY: &str = "Translations";

/// Position of a labeled child within the tree.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// Title of the top-level section enclosing the child.
    pub language: Option<&'a str>,
    pub level: usize,
    pub key: &'a str,
}

#[derive(Clone, Copy)]
pub enum Extractor<'a> {
    Pronunciation,
    Onyms,
    Terms,
    Translations(&'a dyn Transliterator),
}

impl std::fmt::Debug for Extractor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Extractor::Pronunciation => "Pronunciation",
            Extractor::Onyms => "Onyms",
            Extractor::Terms => "Terms",
            Extractor::Translations(_) => "Translations",
        };
        f.write_str(name)
    }
}

impl<'a> Extractor<'a> {
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Extractor::Pronunciation => &["Pronunciation"],
            Extractor::Onyms => &["Synonyms", "Antonyms"],
            Extractor::Terms => &["Derived terms", "Related terms"],
            Extractor::Translations(_) => &[TRANSLATIONS_KEY],
        }
    }

    pub fn extract(&self, lines: &[String]) -> Node {
        match self {
            Extractor::Pronunciation => Node::Pronunciation(extract_pronunciation(lines)),
            Extractor::Onyms => Node::Onyms(extract_onyms(lines)),
            Extractor::Terms => Node::Terms(extract_terms(lines)),
            Extractor::Translations(transliterator) => {
                Node::Translations(extract_translations(lines, *transliterator))
            }
        }
    }

    /// Replace `node` with the extracted value. Values that are no longer raw
    /// lines have already been extracted and are left alone.
    pub fn apply(&self, node: &mut Node) {
        let extracted = match node.raw_lines() {
            Some(lines) => self.extract(lines),
            None => return,
        };
        *node = extracted;
    }
}

/// Hook run instead of the plain extractor; it owns the replacement of `slot`.
pub trait Preaction {
    fn run(&mut self, visit: &Visit<'_>, slot: &mut Node, pass: &Pass<'_>) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
pub struct Pass<'a> {
    pub labels: &'a [&'a str],
    pub extractor: Extractor<'a>,
}

impl<'a> Pass<'a> {
    pub fn new(extractor: Extractor<'a>) -> Self {
        Self {
            labels: extractor.labels(),
            extractor,
        }
    }
}

/// Run `pass` over the whole tree. Children of the root set the language.
pub fn run_pass<'p>(
    tree: &mut Section,
    pass: &Pass<'_>,
    preaction: Option<&mut (dyn Preaction + 'p)>,
) -> Result<()> {
    walk(tree, pass, preaction, None, 0)
}

pub fn walk<'p>(
    tree: &mut Section,
    pass: &Pass<'_>,
    mut preaction: Option<&mut (dyn Preaction + 'p)>,
    language: Option<&str>,
    level: usize,
) -> Result<()> {
    for (key, node) in tree.children.iter_mut() {
        let language = if level == 0 { Some(key) } else { language };

        if pass.labels.contains(&key) {
            match preaction.as_deref_mut() {
                Some(preaction) => {
                    let visit = Visit { language, level, key };
                    preaction.run(&visit, node, pass)?;
                }
                None => pass.extractor.apply(node),
            }
            continue;
        }

        match node {
            Node::Forms(forms) => {
                for form in forms.iter_mut() {
                    walk(form, pass, preaction.as_deref_mut(), language, level + 1)?;
                }
            }
            Node::Section(section) => {
                walk(section, pass, preaction.as_deref_mut(), language, level + 1)?;
            }
            _ => {}
        }
    }
    Ok(())
}
