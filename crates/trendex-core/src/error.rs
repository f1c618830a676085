use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrendexError>;

#[derive(Debug, Error)]
pub enum TrendexError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("cycle detected in topic hierarchy: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl TrendexError {
    pub(crate) fn mutex_poisoned(resource: &str) -> Self {
        Self::Internal(format!("{resource} mutex poisoned"))
    }

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
