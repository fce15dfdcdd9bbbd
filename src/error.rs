use thiserror::Error;

#[derive(Error, Debug)]
pub enum PosterError {
    #[error("not enough track points: found {found}, need at least {required}")]
    InsufficientData { found: usize, required: usize },

    #[error("GPX document contains no track points")]
    NoTrack,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),
}

/// Reasons a user-supplied `HH:MM:SS` duration could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("expected HH:MM:SS, got {0} field(s)")]
    FieldCount(usize),

    #[error("'{0}' is not a whole number")]
    NotInteger(String),

    #[error("'{0}' is too long to count in seconds")]
    Overflow(String),
}
