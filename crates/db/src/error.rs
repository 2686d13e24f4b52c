use thiserror::Error;

/// Error kinds produced by the store layer.
///
/// Callers pattern-match on the variant; message text is for humans only.
#[derive(Error, Debug)]
pub enum DbError {
    /// No row matched the given identifier
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Connectivity or query failure once the store is live
    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),

    /// The store never answered within the startup retry budget
    #[error("store unreachable after {attempts} attempts: {source}")]
    FatalStartup {
        attempts: u32,
        #[source]
        source: Box<DbError>,
    },
}

impl DbError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("record"),
            other => DbError::Store(other),
        }
    }
}

/// Type alias for store operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn other_sqlx_errors_map_to_store() {
        let err = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DbError::Store(sqlx::Error::PoolTimedOut)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(DbError::not_found("book").to_string(), "book not found");
    }

    #[test]
    fn fatal_startup_reports_attempts_and_cause() {
        let err = DbError::FatalStartup {
            attempts: 10,
            source: Box::new(DbError::Store(sqlx::Error::PoolTimedOut)),
        };
        let msg = err.to_string();
        assert!(msg.contains("10 attempts"));
        assert!(msg.contains("store error"));
    }
}
