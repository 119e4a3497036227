use thiserror::Error;

/// Errors returned by the transaction store and the operations built on it.
///
/// None of these are fatal: the caller reports them and the user may retry.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// Input rejected at the boundary (amount, type, date or id). Nothing was written.
    #[error("{0}")]
    Validation(String),

    /// No transaction exists with the given ID. Nothing was written.
    #[error("Transaction with ID {0} not found")]
    NotFound(i64),

    /// The database failed or returned a row that could not be decoded.
    #[error("Database error: {0}")]
    Storage(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for TransactionError {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        TransactionError::Storage(value)
    }
}

impl TransactionError {
    pub fn validation(message: impl Into<String>) -> Self {
        TransactionError::Validation(message.into())
    }

    /// Short heading for dialogs and the status line.
    pub fn title(&self) -> &'static str {
        match self {
            TransactionError::Validation(_) => "Input Error",
            TransactionError::NotFound(_) => "Error",
            TransactionError::Storage(_) => "Database Error",
        }
    }
}
