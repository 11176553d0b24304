use lazy_static::lazy_static;
use regex::Regex;

use crate::section::OrderedMap;

lazy_static! {
    static ref SENSE_TEMPLATE: Regex = Regex::new(r"\{\{sense\|([^}]+)\}\}").unwrap();
    static ref LINK_TEMPLATE: Regex = Regex::new(r"\{\{l\|[a-z-]+\|([^}|]+)[|}]").unwrap();
}

/// Sense label to linked terms, for Synonyms and Antonyms sections.
pub type OnymMap = OrderedMap<Vec<String>>;

/// Only lines opening with a `{{sense|...}}` template count. A repeated sense
/// starts its bucket over.
pub fn extract_onyms(lines: &[String]) -> OnymMap {
    let mut result = OnymMap::new();
    for line in lines {
        let Some(sense) = SENSE_TEMPLATE.captures(line) else {
            continue;
        };
        let terms = LINK_TEMPLATE
            .captures_iter(line)
            .map(|cap| cap[1].trim().to_string())
            .collect();
        result.insert(sense[1].trim(), terms);
    }
    result
}
