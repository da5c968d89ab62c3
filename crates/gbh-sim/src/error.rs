use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("insufficient data for {analysis}: need at least {required} rows, got {actual}")]
    InsufficientData {
        analysis: &'static str,
        required: usize,
        actual: usize,
    },
}

pub type SimResult<T> = Result<T, SimError>;

pub(crate) fn require_rows(analysis: &'static str, required: usize, actual: usize) -> SimResult<()> {
    if actual < required {
        return Err(SimError::InsufficientData {
            analysis,
            required,
            actual,
        });
    }
    Ok(())
}
