use thiserror::Error;

/// Unified error type for statements issued through the gateway
#[derive(Error, Debug)]
pub enum DbError {
    /// A query expected to return a row returned none
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation: {message}")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Foreign key constraint violation, e.g. booking a room that does not exist
    #[error("Foreign key constraint violation: {message}")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Check constraint violation
    #[error("Check constraint violation: {message}")]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// A column came back with a PostgreSQL type the gateway cannot render as text
    #[error("Unsupported column type {type_name} for column {column}")]
    UnsupportedType { column: String, type_name: String },

    /// Catch-all for non-recoverable errors (malformed SQL, lost connection, ...)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convert from sqlx::Error using sqlx's error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(|s| s.to_string());
                let table = db_err.table().map(|s| s.to_string());
                let message = db_err.message().to_string();

                if db_err.is_unique_violation() {
                    DbError::UniqueViolation { constraint, table, message }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation { constraint, table, message }
                } else if db_err.is_check_violation() {
                    DbError::CheckViolation { constraint, table, message }
                } else {
                    // Syntax errors, type mismatches, missing relations etc.
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

impl DbError {
    /// One-line description safe to print on the terminal
    pub fn user_message(&self) -> String {
        match self {
            DbError::NotFound => "No matching record was found".to_string(),
            DbError::UniqueViolation { table, .. } => match table.as_deref() {
                Some(table) => format!("A matching record already exists in {table}"),
                None => "A matching record already exists".to_string(),
            },
            DbError::ForeignKeyViolation { message, .. } => format!("Invalid reference: {message}"),
            DbError::CheckViolation { message, .. } => format!("Invalid data provided: {message}"),
            DbError::UnsupportedType { .. } => self.to_string(),
            DbError::Other(e) => format!("Database error: {e}"),
        }
    }
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;
