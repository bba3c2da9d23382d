use derive_more::{Display, Error};
use sqlx;

/// Every way a `sqlquery` invocation can fail. The `Display` output of each
/// variant is the `message` reported in the JSON error envelope.
#[derive(Debug, Display, Error)]
pub enum SqlQueryError {
    #[display("{message}")]
    ConnectionFailure { message: String },
    #[display("SQL file not found: {path}")]
    FileNotFound { path: String },
    #[display("No SQL query or file provided")]
    MissingQuery,
    #[display("{message}")]
    DatabaseExecution { message: String },
    #[display("Type {type_name} not serializable")]
    Serialization { type_name: String },
    #[display("Unexpected error: {message}")]
    Unexpected { message: String },
}

/// MySQL errors read `<number> (<sqlstate>): <message>`; anything else
/// the driver raises keeps its own description.
pub fn driver_message(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_error) => db_error.to_string(),
        _ => err.to_string(),
    }
}

impl From<sqlx::Error> for SqlQueryError {
    fn from(cause: sqlx::Error) -> Self {
        SqlQueryError::DatabaseExecution {
            message: driver_message(&cause),
        }
    }
}

impl From<std::io::Error> for SqlQueryError {
    fn from(cause: std::io::Error) -> Self {
        SqlQueryError::Unexpected {
            message: cause.to_string(),
        }
    }
}

impl From<serde_json::Error> for SqlQueryError {
    fn from(cause: serde_json::Error) -> Self {
        SqlQueryError::Unexpected {
            message: cause.to_string(),
        }
    }
}
