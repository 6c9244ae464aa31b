use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    #[error("token lookup collision")]
    TokenLookupCollision,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid token format")]
    InvalidTokenFormat,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Collapses infrastructure failures into `StoreUnavailable`, leaving
    /// domain errors untouched.
    #[must_use]
    pub fn into_store_unavailable(self) -> Self {
        match self {
            Error::Database(e) => Error::StoreUnavailable(e.to_string()),
            Error::Io(e) => Error::StoreUnavailable(e.to_string()),
            Error::Config(msg) => Error::StoreUnavailable(msg),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_becomes_store_unavailable() {
        let err = Error::Database(rusqlite::Error::QueryReturnedNoRows).into_store_unavailable();
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }

    #[test]
    fn test_domain_errors_pass_through() {
        assert!(matches!(
            Error::NotFound.into_store_unavailable(),
            Error::NotFound
        ));
        assert!(matches!(
            Error::validation("bad").into_store_unavailable(),
            Error::Validation(msg) if msg == "bad"
        ));
    }
}
