use packlist_core::CoreError;
use packlist_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("validation error: {0}")]
    Validation(String),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::Storage(err) if err.is_not_found())
    }

    /// Validation failures are raised before any store contact and reported
    /// to the user without a retry.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::Core(
                    CoreError::EmptyName
                        | CoreError::UnknownCategory(_)
                        | CoreError::UnknownStatus(_)
                        | CoreError::MalformedImport(_)
                )
        )
    }
}
