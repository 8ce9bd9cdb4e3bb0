use crate::db::errors::DbError;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// User input could not be coerced to the type a handler needs
    #[error("Invalid {field}: {value:?}")]
    InvalidInput { field: &'static str, value: String },

    /// Standard input was closed
    #[error("End of input")]
    EndOfInput,

    /// Reading from or writing to the terminal failed
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database statement error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn invalid_input(field: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            value: value.into(),
        }
    }

    /// Returns the line printed on the error stream when a handler aborts
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidInput { field, value } => format!("Your input is invalid! Could not read {field} from {value:?}"),
            Error::EndOfInput => "No more input".to_string(),
            Error::Io(e) => format!("Terminal error: {e}"),
            Error::Database(db_err) => db_err.user_message(),
            Error::Other(e) => format!("Unexpected error: {e}"),
        }
    }

    /// Log the error at a level matching its severity
    pub fn log(&self) {
        match self {
            Error::Database(DbError::Other(_)) | Error::Io(_) | Error::Other(_) => {
                tracing::error!("Operation aborted: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::InvalidInput { .. } | Error::EndOfInput => {
                tracing::debug!("Input error: {}", self);
            }
        }
    }
}

/// Type alias for handler results
pub type Result<T> = std::result::Result<T, Error>;
