//! Structured word entries from Wiktionary wikitext.
//!
//! An article is split on its `==Header==` lines into a section tree,
//! reshaped according to a [`Taxonomy`] of section titles, and then passed
//! through extractors for pronunciation, synonyms and antonyms, derived and
//! related terms, and translations. Translation tables moved to a
//! `/translations` subpage are fetched and spliced back in.
//!
//! ```no_run
//! use wiktionary_tree::{DirectoryFetcher, Pipeline};
//!
//! let pipeline = Pipeline::new(DirectoryFetcher::new("pages"));
//! if let Some(entry) = pipeline.process("palabra")? {
//!     println!("{}", serde_json::to_string_pretty(&entry).unwrap());
//! }
//! # Ok::<(), wiktionary_tree::Error>(())
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod resolve;
pub mod section;
pub mod taxonomy;
pub mod translit;
pub mod tree;
pub mod walk;

pub use classify::classify;
pub use config::{Config, SplicePolicy};
pub use error::{Error, Result};
pub use fetch::{DirectoryFetcher, DumpFetcher, Fetcher, MemoryFetcher};
pub use pipeline::Pipeline;
pub use section::{Node, OrderedMap, Section, CONTENT_KEY, DEFINITIONS_KEY, ETYMOLOGY_KEY, FORMS_KEY};
pub use taxonomy::Taxonomy;
pub use translit::{NoTransliteration, TableTransliterator, Transliterator};
pub use tree::build_tree;
pub use walk::{run_pass, Extractor, Pass, Preaction, Visit, TRANSLATIONS_KEY};
