use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("error parsing yaml file {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("translation subpage {title} could not be spliced: {reason}")]
    Splice { title: String, reason: String },
    #[error("translation subpage {title} refers back to a page already being resolved")]
    SubpageCycle { title: String },
    #[error("translation subpage {title} is nested {depth} levels deep")]
    SubpageDepth { title: String, depth: usize },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }

    /// True for failures that stem from a missing or malformed subpage rather
    /// than from the environment.
    pub fn is_splice_failure(&self) -> bool {
        matches!(
            self,
            Self::Splice { .. } | Self::SubpageCycle { .. } | Self::SubpageDepth { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
