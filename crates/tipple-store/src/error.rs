// SPDX-License-Identifier: Apache-2.0

use rusqlite::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// No row for the requested id; carries the entity name.
    NotFound(&'static str),
    /// A uniqueness constraint rejected the write.
    Conflict(String),
    Sql(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::Conflict(msg) | Self::Sql(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(err, msg)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Self::Conflict(msg.unwrap_or_else(|| "constraint violation".to_string()))
            }
            other => Self::Sql(other.to_string()),
        }
    }
}
