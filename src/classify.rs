//! Reshapes the raw header tree into the document model.
//!
//! Applied depth first. For every child title, in this order:
//! parts of speech get a `Definitions` list, ignored sections are dropped,
//! semi-collapsible sections have their raw lines cleaned, collapsible sections
//! become their cleaned line list (anything else is recursed into), and
//! numbered etymologies are moved into the parent's `Forms`. Afterwards, parts
//! of speech sitting directly under a child without `Forms` are gathered into
//! one.

use lazy_static::lazy_static;
use regex::Regex;

use crate::section::{Node, Section, DEFINITIONS_KEY, ETYMOLOGY_KEY, FORMS_KEY};
use crate::taxonomy::Taxonomy;

lazy_static! {
    static ref NUMBERED_ETYMOLOGY: Regex = Regex::new(r"Etymology \d").unwrap();
}

/// Trim every line and drop blanks and `----` separators.
pub fn clean_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.chars().all(|c| c == '-'))
        .map(str::to_string)
        .collect()
}

pub fn classify(tree: &mut Section, taxonomy: &Taxonomy) {
    classify_at(tree, taxonomy, 0);
}

fn classify_at(tree: &mut Section, taxonomy: &Taxonomy, level: usize) {
    // Text between a language header and its first subsection.
    if level == 1 {
        tree.content = None;
    }

    let keys: Vec<String> = tree.children.keys().map(str::to_string).collect();
    for key in &keys {
        if taxonomy.is_part_of_speech(key) {
            if let Some(child) = tree.section_mut(key) {
                if let Some(raw) = child.content.take() {
                    child
                        .children
                        .insert(DEFINITIONS_KEY, Node::Lines(clean_lines(&raw)));
                }
            }
        }

        if taxonomy.is_ignored(key) {
            tree.children.remove(key);
            continue;
        }

        if taxonomy.is_semi_collapsible(key) {
            if let Some(node) = tree.children.get_mut(key) {
                collapse_partially(node);
            }
        }

        if taxonomy.is_collapsible(key) {
            if let Some(node) = tree.children.get_mut(key) {
                if let Node::Section(section) = node {
                    *node = Node::Lines(clean_lines(section.content.as_deref().unwrap_or_default()));
                }
            }
        } else if let Some(child) = tree.section_mut(key) {
            classify_at(child, taxonomy, level + 1);
        }

        if NUMBERED_ETYMOLOGY.is_match(key) {
            if let Some(node) = tree.children.remove(key) {
                forms_mut(tree).push(etymology_form(node));
            }
        }
    }

    gather_parts_of_speech(tree, taxonomy);
}

fn collapse_partially(node: &mut Node) {
    let Node::Section(section) = node else {
        return;
    };
    if section.children.is_empty() {
        *node = Node::Lines(clean_lines(section.content.as_deref().unwrap_or_default()));
    } else if let Some(raw) = section.content.as_mut() {
        *raw = clean_lines(raw);
    }
}

fn etymology_form(node: Node) -> Section {
    match node {
        Node::Section(mut section) => {
            if let Some(raw) = section.content.take() {
                section.children.insert(ETYMOLOGY_KEY, Node::Lines(raw));
            }
            section
        }
        other => Section::single(ETYMOLOGY_KEY, other),
    }
}

fn forms_mut(tree: &mut Section) -> &mut Vec<Section> {
    let node = tree
        .children
        .get_or_insert_with(FORMS_KEY, || Node::Forms(Vec::new()));
    if !matches!(node, Node::Forms(_)) {
        *node = Node::Forms(Vec::new());
    }
    match node {
        Node::Forms(forms) => forms,
        _ => unreachable!("replaced above"),
    }
}

fn gather_parts_of_speech(tree: &mut Section, taxonomy: &Taxonomy) {
    for (_, node) in tree.children.iter_mut() {
        let Node::Section(child) = node else {
            continue;
        };
        if child.children.contains_key(FORMS_KEY) {
            continue;
        }

        let forms: Vec<Section> = taxonomy
            .parts_of_speech
            .iter()
            .filter_map(|pos| {
                child
                    .children
                    .remove(pos)
                    .map(|found| Section::single(pos.as_str(), found))
            })
            .collect();

        if !forms.is_empty() {
            child.children.insert(FORMS_KEY, Node::Forms(forms));
        }
    }
}
