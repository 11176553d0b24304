use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::taxonomy::Taxonomy;

/// What to do when a translation subpage reference cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplicePolicy {
    /// Fail the whole request.
    Abort,
    /// Leave the raw marker lines in place.
    #[default]
    Unresolved,
    /// Replace the reference with an empty translation table.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub taxonomy: Taxonomy,
    /// How many `/translations` subpages may be chained below the requested title.
    pub max_subpage_depth: usize,
    pub splice_policy: SplicePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy: Taxonomy::builtin().clone(),
            max_subpage_depth: 3,
            splice_policy: SplicePolicy::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_yaml::from_str(&contents).map_err(|e| Error::yaml(path, e))
    }
}
