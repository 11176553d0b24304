//! Section-specific extractors. Each one turns the cleaned line list of a
//! collapsed section into a typed value; lines that match none of the
//! templates an extractor knows are skipped.

pub mod onyms;
pub mod pronunciation;
pub mod terms;
pub mod translations;

pub use onyms::{extract_onyms, OnymMap};
pub use pronunciation::{extract_pronunciation, PronunciationEntry};
pub use terms::extract_terms;
pub use translations::{extract_translations, TranslationEntry, TranslationTable};
