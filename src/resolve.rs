//! Translations that live on a separate `<title>/translations` article.
//!
//! Long translation tables are moved off the main article and replaced with
//! `{{see translation subpage|Noun}}`. The resolver runs the whole pipeline on
//! the subpage, picks the table for the same language and part of speech, and
//! grafts it into the host tree.

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::config::SplicePolicy;
use crate::error::{Error, Result};
use crate::extract::TranslationTable;
use crate::fetch::normalize_title;
use crate::pipeline::Pipeline;
use crate::section::{Node, Section, FORMS_KEY};
use crate::walk::{walk, Pass, Preaction, Visit, TRANSLATIONS_KEY};

pub const SUBPAGE_SUFFIX: &str = "/translations";

lazy_static! {
    static ref SUBPAGE_MARKER: Regex = Regex::new(r"see translation subpage\|([^}|]+)").unwrap();
}

/// Part of speech named by a subpage marker on the first raw line of `node`.
pub fn subpage_marker(node: &Node) -> Option<String> {
    let first = node.raw_lines()?.first()?;
    let cap = SUBPAGE_MARKER.captures(first)?;
    Some(cap[1].trim().to_string())
}

/// Preaction for `Translations` children of the article `title`.
///
/// `chain` holds the normalized titles currently being processed, outermost
/// first; it guards against cycles and runaway nesting.
pub struct TranslationResolver<'a> {
    pipeline: &'a Pipeline,
    title: &'a str,
    chain: &'a mut Vec<String>,
}

impl<'a> TranslationResolver<'a> {
    pub fn new(pipeline: &'a Pipeline, title: &'a str, chain: &'a mut Vec<String>) -> Self {
        Self {
            pipeline,
            title,
            chain,
        }
    }

    fn splice(&mut self, visit: &Visit<'_>, pos: &str, pass: &Pass<'_>) -> Result<Node> {
        let sub_title = format!("{}{}", self.title, SUBPAGE_SUFFIX);
        let failed = |reason: String| Error::Splice {
            title: sub_title.clone(),
            reason,
        };

        let language = visit
            .language
            .ok_or_else(|| failed("no enclosing language section".to_string()))?;

        if self.chain.contains(&normalize_title(&sub_title)) {
            return Err(Error::SubpageCycle {
                title: sub_title.clone(),
            });
        }
        let depth = self.chain.len();
        if depth > self.pipeline.config().max_subpage_depth {
            return Err(Error::SubpageDepth {
                title: sub_title.clone(),
                depth,
            });
        }

        debug!("Resolving {} {} translations from {}", language, pos, sub_title);
        let mut subresult = self
            .pipeline
            .process_chained(&sub_title, self.chain)?
            .ok_or_else(|| failed("page not found".to_string()))?;

        let mut language_section = match subresult.children.remove(language) {
            Some(Node::Section(section)) => section,
            _ => return Err(failed(format!("no {} section", language))),
        };
        let mut pos_section = take_part_of_speech(&mut language_section, pos)
            .ok_or_else(|| failed(format!("no {} section under {}", pos, language)))?;
        let mut spliced = pos_section
            .children
            .remove(TRANSLATIONS_KEY)
            .ok_or_else(|| failed(format!("no translations under {} {}", language, pos)))?;

        match &mut spliced {
            Node::Section(section) => {
                let resolver: &mut dyn Preaction = self;
                walk(section, pass, Some(resolver), Some(language), visit.level + 1)?;
            }
            node if subpage_marker(node).is_none() => pass.extractor.apply(node),
            _ => {}
        }
        Ok(spliced)
    }

    fn on_failure(&self, error: Error, slot: &mut Node) -> Result<()> {
        match self.pipeline.config().splice_policy {
            SplicePolicy::Abort => Err(error),
            SplicePolicy::Unresolved => {
                warn!("{}; leaving the reference in {}", error, self.title);
                Ok(())
            }
            SplicePolicy::Empty => {
                warn!("{}; no translations for {}", error, self.title);
                *slot = Node::Translations(TranslationTable::new());
                Ok(())
            }
        }
    }
}

/// The `pos` section of a language, looked up in its Forms when it has any.
fn take_part_of_speech(language: &mut Section, pos: &str) -> Option<Section> {
    match language.children.remove(FORMS_KEY) {
        Some(Node::Forms(forms)) => forms
            .into_iter()
            .find_map(|mut form| match form.children.remove(pos) {
                Some(Node::Section(section)) => Some(section),
                _ => None,
            }),
        _ => match language.children.remove(pos) {
            Some(Node::Section(section)) => Some(section),
            _ => None,
        },
    }
}

impl Preaction for TranslationResolver<'_> {
    fn run(&mut self, visit: &Visit<'_>, slot: &mut Node, pass: &Pass<'_>) -> Result<()> {
        let pos = match subpage_marker(slot) {
            Some(pos) => pos,
            None => {
                pass.extractor.apply(slot);
                return Ok(());
            }
        };

        match self.splice(visit, &pos, pass) {
            Ok(node) => {
                *slot = node;
                Ok(())
            }
            Err(error) if error.is_splice_failure() => self.on_failure(error, slot),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::extract::extract_translations;
    use crate::fetch::{split_lines, MemoryFetcher};
    use crate::translit::NoTransliteration;
    use pretty_assertions::assert_eq;

    const HOST: &str = "\
==English==
===Noun===
{{en-noun}}
# A unit of language.

====Translations====
{{see translation subpage|Noun}}
";

    const SUBPAGE_TRANSLATIONS: &str = "\
{{trans-top|unit of language}}
* French: {{t+|fr|mot|m}}
* Spanish: {{t+|es|palabra|f}}
{{trans-bottom}}";

    fn subpage() -> String {
        format!(
            "==English==\n===Noun===\n====Translations====\n{}\n",
            SUBPAGE_TRANSLATIONS
        )
    }

    fn pipeline(fetcher: MemoryFetcher, policy: SplicePolicy) -> Pipeline {
        Pipeline::new(fetcher).with_config(Config {
            splice_policy: policy,
            ..Config::default()
        })
    }

    fn noun(tree: &Section) -> &Section {
        let english = tree.section("English").unwrap();
        english.forms().unwrap()[0].section("Noun").unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Markers
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn marker_on_first_line_only() {
        let marked = Node::Lines(vec!["{{see translation subpage|Verb}}".to_string()]);
        assert_eq!(subpage_marker(&marked).as_deref(), Some("Verb"));

        let later = Node::Lines(vec![
            "{{trans-top|x}}".to_string(),
            "{{see translation subpage|Verb}}".to_string(),
        ]);
        assert_eq!(subpage_marker(&later), None);
        assert_eq!(subpage_marker(&Node::Lines(Vec::new())), None);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Splicing
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn splices_subpage_table() {
        let fetcher = MemoryFetcher::new()
            .with_page("word", HOST)
            .with_page("word/translations", subpage());
        let tree = pipeline(fetcher, SplicePolicy::Abort)
            .process("word")
            .unwrap()
            .unwrap();

        let expected = extract_translations(&split_lines(SUBPAGE_TRANSLATIONS), &NoTransliteration);
        assert_eq!(
            noun(&tree).get(TRANSLATIONS_KEY),
            Some(&Node::Translations(expected))
        );
    }

    #[test]
    fn subpage_without_forms_is_read_directly() {
        let mut language = Section::new();
        language.children.insert(
            "Verb",
            Section::single(TRANSLATIONS_KEY, Node::Lines(vec!["x".to_string()])).into(),
        );
        let verb = take_part_of_speech(&mut language, "Verb").unwrap();
        assert!(verb.get(TRANSLATIONS_KEY).is_some());
        assert!(take_part_of_speech(&mut language, "Verb").is_none());
    }

    #[test]
    fn table_without_marker_is_extracted_in_place() {
        let host = format!("==English==\n===Noun===\n====Translations====\n{}\n", SUBPAGE_TRANSLATIONS);
        let fetcher = MemoryFetcher::new().with_page("word", host);
        let tree = pipeline(fetcher, SplicePolicy::Abort)
            .process("word")
            .unwrap()
            .unwrap();

        let table = noun(&tree).get(TRANSLATIONS_KEY).and_then(Node::as_translations).unwrap();
        assert_eq!(table.get("unit of language").unwrap().get("fr").unwrap()[0].word(), "mot");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Failures
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn missing_subpage_is_left_unresolved_by_default() {
        let fetcher = MemoryFetcher::new().with_page("word", HOST);
        let tree = Pipeline::new(fetcher).process("word").unwrap().unwrap();
        assert_eq!(
            noun(&tree).get(TRANSLATIONS_KEY),
            Some(&Node::Lines(vec!["{{see translation subpage|Noun}}".to_string()]))
        );
    }

    #[test]
    fn missing_subpage_aborts_under_abort_policy() {
        let fetcher = MemoryFetcher::new().with_page("word", HOST);
        let err = pipeline(fetcher, SplicePolicy::Abort).process("word").unwrap_err();
        assert!(matches!(err, Error::Splice { ref title, .. } if title == "word/translations"));
    }

    #[test]
    fn missing_part_of_speech_becomes_empty_under_empty_policy() {
        let verb_only = "==English==\n===Verb===\n====Translations====\n{{t|fr|dire}}\n";
        let fetcher = MemoryFetcher::new()
            .with_page("word", HOST)
            .with_page("word/translations", verb_only);
        let tree = pipeline(fetcher, SplicePolicy::Empty)
            .process("word")
            .unwrap()
            .unwrap();
        assert_eq!(
            noun(&tree).get(TRANSLATIONS_KEY),
            Some(&Node::Translations(TranslationTable::new()))
        );
    }

    #[test]
    fn missing_language_on_subpage_is_a_splice_failure() {
        let french_only = "==French==\n===Noun===\n====Translations====\n{{t|en|word}}\n";
        let fetcher = MemoryFetcher::new()
            .with_page("word", HOST)
            .with_page("word/translations", french_only);
        let err = pipeline(fetcher, SplicePolicy::Abort).process("word").unwrap_err();
        assert!(err.is_splice_failure());
    }

    #[test]
    fn nested_subpages_stop_at_max_depth() {
        let fetcher = MemoryFetcher::new()
            .with_page("word", HOST)
            .with_page("word/translations", HOST)
            .with_page("word/translations/translations", subpage());
        let config = Config {
            max_subpage_depth: 1,
            splice_policy: SplicePolicy::Abort,
            ..Config::default()
        };
        let err = Pipeline::new(fetcher)
            .with_config(config)
            .process("word")
            .unwrap_err();
        assert!(matches!(err, Error::SubpageDepth { depth: 2, .. }));
    }

    #[test]
    fn nested_subpages_within_depth_are_followed() {
        let fetcher = MemoryFetcher::new()
            .with_page("word", HOST)
            .with_page("word/translations", HOST)
            .with_page("word/translations/translations", subpage());
        let tree = pipeline(fetcher, SplicePolicy::Abort)
            .process("word")
            .unwrap()
            .unwrap();
        let table = noun(&tree).get(TRANSLATIONS_KEY).and_then(Node::as_translations).unwrap();
        assert_eq!(table.get("unit of language").unwrap().get("es").unwrap()[0].word(), "palabra");
    }

    #[test]
    fn subpage_already_in_chain_is_a_cycle() {
        let fetcher = MemoryFetcher::new()
            .with_page("word", HOST)
            .with_page("word/translations", subpage());
        let pipeline = pipeline(fetcher, SplicePolicy::Abort);
        let mut chain = vec!["word/translations".to_string()];
        let err = pipeline.process_chained("word", &mut chain).unwrap_err();
        assert!(matches!(err, Error::SubpageCycle { .. }));
        // The chain is restored whatever the outcome.
        assert_eq!(chain, vec!["word/translations".to_string()]);
    }
}
