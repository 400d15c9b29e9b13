//! Error types for Document Store operations

use thiserror::Error;

/// Errors that can occur during document store operations
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    #[error("Failed to add column {column}: {source}")]
    SchemaMutation {
        column: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Document store is closed")]
    Closed,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
}

impl DocumentStoreError {
    pub fn invalid_operator(op: impl Into<String>) -> Self {
        Self::InvalidOperator(op.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn schema_mutation(column: impl Into<String>, source: sqlx::Error) -> Self {
        Self::SchemaMutation {
            column: column.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DocumentStoreError>;
