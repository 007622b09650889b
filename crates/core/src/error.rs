use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("item name must not be empty")]
    EmptyName,

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("malformed import payload: {0}")]
    MalformedImport(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
