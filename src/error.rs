use std::{error::Error, fmt, io, path::PathBuf};

/// The crate's result type.
pub type Result<T> = std::result::Result<T, TraceError>;

/// All errors that abort a weight trace run.
#[derive(Debug)]
pub enum TraceError {
    /// Reading or writing a file failed.
    Io { path: PathBuf, source: io::Error },
    /// A checkpoint or config file is not the expected JSON.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A matrix row has a different length than the first one.
    Ragged {
        path: PathBuf,
        layer: &'static str,
        row: usize,
    },
    /// The final checkpoint holds a matrix without rows or columns.
    EmptyMatrix { path: PathBuf, layer: &'static str },
    /// Rejected before touching any checkpoint.
    InvalidConfig(String),
    /// A chart could not be serialized.
    Serialize(serde_json::Error),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error on {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "invalid JSON in {}: {source}", path.display())
            }
            Self::Ragged { path, layer, row } => write!(
                f,
                "{layer} in {} is ragged: row {row} differs in length from row 0",
                path.display()
            ),
            Self::EmptyMatrix { path, layer } => {
                write!(f, "{layer} in {} is empty", path.display())
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Serialize(e) => write!(f, "cannot serialize chart data: {e}"),
        }
    }
}

impl Error for TraceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TraceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}

impl TraceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
