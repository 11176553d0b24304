use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Last `|`-delimited argument running to end of line, as in the
    // one-term-per-line layout of {{der3|en ... }} and {{rel4|en ... }}.
    static ref TRAILING_ARGUMENT: Regex = Regex::new(r"\|([^}|]+)$").unwrap();
}

const LANGUAGE_ARGUMENT: &str = "en";

/// Derived and related terms in encounter order.
pub fn extract_terms(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| TRAILING_ARGUMENT.captures(line))
        .map(|cap| cap[1].trim().to_string())
        .filter(|term| !term.is_empty() && term != LANGUAGE_ARGUMENT)
        .collect()
}
