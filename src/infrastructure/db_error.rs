use sea_orm::{DbErr, SqlErr};

use crate::domain::error::RepositoryError;

/// Translate a driver error into the repository taxonomy.
///
/// This is the only place that looks at constraint-violation categories.
pub fn map_db_err(err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => RepositoryError::DuplicateKey(detail),
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => RepositoryError::ForeignKey(detail),
        _ => RepositoryError::DatabaseError(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unclassified_errors_become_database_errors() {
        let err = map_db_err(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, RepositoryError::DatabaseError(msg) if msg.contains("connection reset")));
    }
}
