//! Turns a flat list of wikitext lines into a [`Section`] tree keyed by header title.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::section::Section;

lazy_static! {
    // Opening and closing runs are checked for equal length after matching,
    // the regex crate has no back-references. Comments may trail the header.
    static ref HEADER: Regex =
        Regex::new(r"^\s*(={2,})\s*([^=]+?)\s*(={2,})\s*(?:<!--.*?-->\s*)*$").unwrap();
}

/// A parsed `==Title==` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMatch {
    pub level: usize,
    pub title: String,
}

pub fn parse_header(line: &str) -> Option<HeaderMatch> {
    let cap = HEADER.captures(line)?;
    let open = cap[1].len();
    if open != cap[3].len() {
        return None;
    }
    Some(HeaderMatch {
        level: open,
        title: cap[2].to_string(),
    })
}

/// Level of the first header in the document. Every later header is placed
/// relative to it.
pub fn find_top_level<S: AsRef<str>>(lines: &[S]) -> Option<usize> {
    lines
        .iter()
        .find_map(|line| parse_header(line.as_ref()))
        .map(|header| header.level)
}

/// Build the raw section tree.
///
/// A header at or above the current level closes sections until the path is
/// `level - top_level` deep, then opens its own; deeper headers nest under the
/// current one. Lines before the first header are dropped, except in a document
/// with no headers at all, where the root keeps every line.
pub fn build_tree<S: AsRef<str>>(lines: &[S]) -> Section {
    let mut root = Section::new();

    let Some(top_level) = find_top_level(lines) else {
        root.content = Some(lines.iter().map(|l| l.as_ref().to_string()).collect());
        return root;
    };

    let mut path: Vec<String> = Vec::new();
    let mut current_level = 0;
    let mut active = false;

    for line in lines {
        let line = line.as_ref();
        match parse_header(line) {
            Some(HeaderMatch { level, title }) => {
                if level <= current_level {
                    let depth = level.saturating_sub(top_level);
                    path.truncate(depth);
                }
                debug!("found level {} -> {}", level, title);
                path.push(title);

                root.descend_or_create(&path).content = Some(Vec::new());
                current_level = level;
                active = true;
            }
            None if active => {
                if let Some(content) = root
                    .descend_mut(&path)
                    .and_then(|section| section.content.as_mut())
                {
                    content.push(line.to_string());
                }
            }
            None => {}
        }
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Node;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    // ─────────────────────────────────────────────────────────────
    // Header parsing
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn parses_level_and_trimmed_title() {
        assert_eq!(
            parse_header("=== Noun ==="),
            Some(HeaderMatch { level: 3, title: "Noun".to_string() })
        );
    }

    #[test]
    fn trailing_comment_after_header() {
        assert_eq!(
            parse_header("===Noun=== <!-- x -->"),
            Some(HeaderMatch { level: 3, title: "Noun".to_string() })
        );
        assert_eq!(parse_header("===Noun=== trailing text"), None);
    }

    #[test]
    fn commented_header_opens_its_section() {
        let tree = build_tree(&lines("==English==\n===Noun=== <!-- x -->\n# a"));
        let english = tree.section("English").unwrap();
        assert_eq!(english.content, Some(Vec::new()));
        assert_eq!(
            english.section("Noun").unwrap().content,
            Some(vec!["# a".to_string()])
        );
    }

    #[test]
    fn single_equals_is_not_a_header() {
        assert_eq!(parse_header("=Title="), None);
    }

    #[test]
    fn mismatched_runs_are_not_headers() {
        assert_eq!(parse_header("==Noun==="), None);
    }

    #[test]
    fn content_lines_are_not_headers() {
        assert_eq!(parse_header("# a == b"), None);
        assert_eq!(parse_header("{{trans-top|word}}"), None);
    }

    #[test]
    fn top_level_is_first_header_level() {
        let input = lines("intro\n===Etymology===\n==English==");
        assert_eq!(find_top_level(&input), Some(3));
        assert_eq!(find_top_level(&lines("no headers here")), None);
    }

    // ─────────────────────────────────────────────────────────────
    // Tree building
    // ─────────────────────────────────────────────────────────────

    #[test]
    fn dedent_closes_sections_before_sibling() {
        let input = lines(
            "==English==\nen\n===Etymology===\nety\n===Noun===\nnoun\n==Spanish==\nes",
        );
        let root = build_tree(&input);

        assert_eq!(root.children.keys().collect::<Vec<_>>(), vec!["English", "Spanish"]);
        let english = root.section("English").unwrap();
        assert_eq!(english.content, Some(vec!["en".to_string()]));
        assert_eq!(english.children.keys().collect::<Vec<_>>(), vec!["Etymology", "Noun"]);
        assert_eq!(
            english.section("Noun").unwrap().content,
            Some(vec!["noun".to_string()])
        );
        let spanish = root.section("Spanish").unwrap();
        assert_eq!(spanish.content, Some(vec!["es".to_string()]));
        assert!(spanish.children.is_empty());
    }

    #[test]
    fn same_level_header_is_a_sibling_not_a_child() {
        let input = lines("==English==\n===Noun===\n===Verb===\n====Synonyms====\nsyn");
        let root = build_tree(&input);
        let english = root.section("English").unwrap();
        assert_eq!(english.children.keys().collect::<Vec<_>>(), vec!["Noun", "Verb"]);
        let verb = english.section("Verb").unwrap();
        assert_eq!(
            verb.section("Synonyms").unwrap().content,
            Some(vec!["syn".to_string()])
        );
    }

    #[test]
    fn multi_level_dedent() {
        let input = lines("==A==\n===B===\n====C====\n=====D=====\n===E===\ne");
        let root = build_tree(&input);
        let a = root.section("A").unwrap();
        assert_eq!(a.children.keys().collect::<Vec<_>>(), vec!["B", "E"]);
        assert!(a.section("B").unwrap().section("C").unwrap().section("D").is_some());
        assert_eq!(a.section("E").unwrap().content, Some(vec!["e".to_string()]));
    }

    #[test]
    fn header_above_top_level_clamps_to_root() {
        let input = lines("===Etymology===\nety\n==English==\nen");
        let root = build_tree(&input);
        assert_eq!(root.children.keys().collect::<Vec<_>>(), vec!["Etymology", "English"]);
        assert_eq!(
            root.section("English").unwrap().content,
            Some(vec!["en".to_string()])
        );
    }

    #[test]
    fn skipped_level_nests_directly() {
        let input = lines("==English==\n====Noun====\nn");
        let root = build_tree(&input);
        let noun = root.section("English").unwrap().section("Noun").unwrap();
        assert_eq!(noun.content, Some(vec!["n".to_string()]));
    }

    #[test]
    fn preamble_before_first_header_is_dropped() {
        let input = lines("{{also|Word}}\n==English==\nen");
        let root = build_tree(&input);
        assert!(root.content.is_none());
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn headerless_document_keeps_all_lines_on_root() {
        let input = lines("just\ntext");
        let root = build_tree(&input);
        assert_eq!(root.content, Some(vec!["just".to_string(), "text".to_string()]));
        assert!(root.children.is_empty());
    }

    #[test]
    fn repeated_header_resets_content_and_keeps_children() {
        let input = lines("==English==\n===Noun===\nfirst\n====Synonyms====\ns\n===Noun===\nsecond");
        let root = build_tree(&input);
        let noun = root.section("English").unwrap().section("Noun").unwrap();
        assert_eq!(noun.content, Some(vec!["second".to_string()]));
        assert!(matches!(noun.get("Synonyms"), Some(Node::Section(_))));
    }
}
