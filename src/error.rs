use std::path::PathBuf;

use thiserror::Error;

/// Errors raised around the animation core: configuration, the problem
/// catalog and the solved-problem store. Simulators and the playback
/// controller never produce these.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog {}: {source}", path.display())]
    Catalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed progress file {}: {source}", path.display())]
    Progress {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no data directory available for progress storage")]
    NoDataDir,

    #[error("unknown pattern: {0}")]
    UnknownPattern(String),

    #[error("unknown problem id: {0}")]
    UnknownProblem(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_path() {
        let err = Error::io(
            "/tmp/missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.json"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_unknown_pattern_display() {
        let err = Error::UnknownPattern("xyz".into());
        assert_eq!(err.to_string(), "unknown pattern: xyz");
    }
}
