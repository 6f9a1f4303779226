use thiserror::Error;

/// Failure to resolve a single prediction file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no prediction file found for {0}")]
    NotFound(String),
    #[error("multiple prediction files found for {0}")]
    Multiple(String),
}

#[derive(Debug, Error)]
pub enum EvalError {
    /// Invalid run setup, e.g. a sample rate that cannot be reached by striding.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("implausible pose: {0}")]
    Plausibility(String),
    #[error("degenerate pose: {0}")]
    DegeneratePose(String),
    #[error("unknown skeleton \"{0}\"")]
    UnknownSkeleton(String),
    #[error("unknown split \"{0}\"")]
    UnknownSplit(String),
    #[error("unsupported mocap format for {0}")]
    UnsupportedFormat(String),
    #[error("dataset error: {0}")]
    Dataset(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Glob(#[from] glob::PatternError),
    /// A directory could not be read while searching for files.
    #[error(transparent)]
    GlobIo(#[from] glob::GlobError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl EvalError {
    /// Missing or ambiguous prediction files are the only failures `--skip-missing` tolerates.
    pub fn is_lookup(&self) -> bool {
        matches!(self, EvalError::Lookup(_))
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
