use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    // {{IPA|en|/wɜːd/}}, {{IPA|/wɜːd/}}, {{es-IPA|...}}
    static ref IPA_TEMPLATE: Regex = Regex::new(r"\{\{[^{}|]*IPA\|(?:[a-z-]+\|)?([^}]+)\}\}").unwrap();
    // {{a|US}}
    static ref ACCENT_TEMPLATE: Regex = Regex::new(r"\{\{a\|([^}]+)\}\}").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PronunciationEntry {
    pub ipa: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

fn clean_ipa(raw: &str) -> String {
    raw.trim_matches('/').to_string()
}

/// One entry per line carrying an IPA template, tagged with the line's accent
/// template when present.
pub fn extract_pronunciation(lines: &[String]) -> Vec<PronunciationEntry> {
    lines
        .iter()
        .filter_map(|line| {
            let ipa = IPA_TEMPLATE.captures(line)?;
            let tag = ACCENT_TEMPLATE.captures(line).map(|cap| cap[1].to_string());
            Some(PronunciationEntry {
                ipa: clean_ipa(&ipa[1]),
                tag,
            })
        })
        .collect()
}
