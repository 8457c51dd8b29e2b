use nanban_core::error::NanbanError;

/// Failures at the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Stored value is corrupt: {0}")]
    Corrupt(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Corrupt(err.to_string())
    }
}

impl From<StorageError> for NanbanError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Corrupt(msg) => NanbanError::Serialization(msg),
            other => NanbanError::PersistenceUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_nanban_error() {
        let err: NanbanError = StorageError::Corrupt("trailing comma".to_string()).into();
        assert!(matches!(err, NanbanError::Serialization(_)));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: NanbanError = StorageError::from(io).into();
        assert!(matches!(
            err,
            NanbanError::PersistenceUnavailable(ref m) if m.contains("read-only")
        ));
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        assert!(matches!(StorageError::from(err), StorageError::Corrupt(_)));
    }
}
