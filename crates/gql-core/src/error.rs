//! Error types for statement compilation.

use thiserror::Error;

/// Boxed error returned by [`Valuer`](crate::builder::Valuer) hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while compiling a statement.
#[derive(Debug, Error)]
pub enum GqlError {
    /// The update payload is neither a mapping nor a record.
    #[error("gql: Unsupported update interface type {0}")]
    UnsupportedPayload(String),

    /// A value hook failed while encoding a column.
    #[error("{source}")]
    Encode {
        /// Column whose value failed to encode.
        column: String,
        /// Error returned by the hook.
        #[source]
        source: BoxError,
    },

    /// Two entries resolve to the same column.
    #[error("gql: duplicate column {column}")]
    DuplicateColumn {
        /// The repeated column name.
        column: String,
    },

    /// A record declared a column but exposed no value for it.
    #[error("gql: record field {column} has no value")]
    MissingField {
        /// Resolved column name.
        column: String,
    },
}

/// Result type alias for compilation.
pub type Result<T> = std::result::Result<T, GqlError>;
