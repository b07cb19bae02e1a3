use thiserror::Error;

pub type OutputResult<T> = Result<T, OutputError>;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("invalid filter format: {0} (expected key=value)")]
    InvalidFilter(String),

    #[error("unknown sort field: {0} (expected service, region, id, name, type or state)")]
    UnknownSortKey(String),

    #[error("unknown output format: {0} (expected table, json or csv)")]
    UnknownFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
