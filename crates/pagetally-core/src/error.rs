use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid utc offset: {0}")]
    InvalidUtcOffset(String),

    #[error("invalid entry type: {0}")]
    InvalidEntryType(String),
}
