use thiserror::Error;

#[derive(Debug, Error)]
pub enum SocialDbError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Row mapping error: {0}")]
    MappingError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Other database error: {0}")]
    Other(String),
}

impl SocialDbError {
    /// True when the failure means the connection itself is unusable and
    /// should be reopened before the next command.
    #[must_use]
    pub fn is_connection_fault(&self) -> bool {
        match self {
            SocialDbError::ConnectionError(_) => true,
            SocialDbError::SqliteError(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::NotADatabase
                    | rusqlite::ErrorCode::DatabaseCorrupt
                    | rusqlite::ErrorCode::SystemIoFailure
            ),
            _ => false,
        }
    }
}

impl From<tokio::task::JoinError> for SocialDbError {
    fn from(err: tokio::task::JoinError) -> Self {
        SocialDbError::ExecutionError(format!("sqlite spawn_blocking join error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_faults_are_recognised() {
        let cant_open = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
            None,
        );
        assert!(SocialDbError::from(cant_open).is_connection_fault());
        assert!(SocialDbError::ConnectionError("gone".into()).is_connection_fault());

        let constraint = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            None,
        );
        assert!(!SocialDbError::from(constraint).is_connection_fault());
        assert!(!SocialDbError::ValidationError("empty".into()).is_connection_fault());
    }
}
