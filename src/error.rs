use thiserror::Error;

/// Errors returned by inventory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Already exists: {0}")]
    DuplicateKey(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

pub type InventoryResult<T> = std::result::Result<T, InventoryError>;

/// Rejects empty or whitespace-only identifiers and names.
pub(crate) fn require_non_empty(field: &str, value: &str) -> InventoryResult<()> {
    if value.trim().is_empty() {
        return Err(InventoryError::InvalidArgument(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Rejects zero amounts.
pub(crate) fn require_positive(field: &str, value: u32) -> InventoryResult<()> {
    if value == 0 {
        return Err(InventoryError::InvalidArgument(format!("{} must be positive", field)));
    }
    Ok(())
}
