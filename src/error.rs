//! Error types for the book catalog

use thiserror::Error;
use uuid::Uuid;

/// Stable numeric error codes, printed alongside every REPL error message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    NoSuchBook = 1,
    BookNotAvailable = 2,
    BookNotBorrowed = 3,
    CheckoutAlreadyClosed = 4,
    NoSuchCheckout = 5,
    BadValue = 6,
    StorageFailure = 7,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Book with ID {0} not found")]
    BookNotFound(String),

    #[error("Book '{title}' is already checked out")]
    AlreadyCheckedOut { book_id: String, title: String },

    #[error("Book '{title}' is not currently checked out")]
    NotCheckedOut { book_id: String, title: String },

    #[error("Checkout {0} has already been checked in")]
    AlreadyClosed(Uuid),

    #[error("Checkout {0} not found")]
    RecordNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::BookNotFound(_) => ErrorCode::NoSuchBook,
            AppError::AlreadyCheckedOut { .. } => ErrorCode::BookNotAvailable,
            AppError::NotCheckedOut { .. } => ErrorCode::BookNotBorrowed,
            AppError::AlreadyClosed(_) => ErrorCode::CheckoutAlreadyClosed,
            AppError::RecordNotFound(_) => ErrorCode::NoSuchCheckout,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Storage(_) | AppError::Serialization(_) => ErrorCode::StorageFailure,
        }
    }

    /// Human-readable line for the REPL. Storage failures are logged in full
    /// and shown to the user in short form.
    pub fn render(&self) -> String {
        let code = self.code();
        let message = match self {
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                "Could not read or write the data files".to_string()
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                "A data file is corrupt".to_string()
            }
            other => other.to_string(),
        };

        format!("[{:?} {}] {}", code, code as u32, message)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        AppError::Validation(messages.join(", "))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
