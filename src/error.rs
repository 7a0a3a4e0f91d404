use std::path::PathBuf;

/// Errors raised while loading a marker table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("{path}:{line}: {reason}: '{content}'")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
        content: String,
    },

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

impl TableError {
    /// Convenience for wrapping an `io::Error` with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// 1-based line number of a parse failure.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => Some(*line),
            Self::Io { .. } => None,
        }
    }
}
