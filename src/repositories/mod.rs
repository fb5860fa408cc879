use crate::errors::ServiceError;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use std::sync::Arc;

pub mod item_action_repository;
pub mod item_repository;

pub use item_action_repository::{ItemActionRepository, ItemActionStore, NewItemAction};
pub use item_repository::{ItemRepository, ItemStore, NewItem};

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Explicit identifiers must be positive; `None` lets the database assign one.
pub(crate) fn check_explicit_id(id: Option<i64>, what: &str) -> Result<(), ServiceError> {
    match id {
        Some(id) if id <= 0 => Err(ServiceError::InvalidArgument(format!(
            "Invalid {} ID: {}",
            what, id
        ))),
        _ => Ok(()),
    }
}

/// Statement moving a table's serial `id` sequence past the highest stored id.
/// Only Postgres keeps the sequence apart from the table.
pub(crate) fn id_sequence_sync(backend: DbBackend, table: &str) -> Option<Statement> {
    match backend {
        DbBackend::Postgres => Some(Statement::from_string(
            backend,
            format!(
                "SELECT setval(pg_get_serial_sequence('{table}', 'id'), (SELECT MAX(id) FROM {table}))"
            ),
        )),
        _ => None,
    }
}

/// Run after inserting rows with explicit ids, inside the same transaction.
pub(crate) async fn sync_id_sequence<C>(conn: &C, table: &str) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    if let Some(stmt) = id_sequence_sync(conn.get_database_backend(), table) {
        conn.execute(stmt).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn explicit_ids_must_be_positive() {
        assert!(check_explicit_id(None, "item").is_ok());
        assert!(check_explicit_id(Some(1), "item").is_ok());
        assert_matches!(
            check_explicit_id(Some(0), "item"),
            Err(ServiceError::InvalidArgument(msg)) if msg == "Invalid item ID: 0"
        );
        assert_matches!(
            check_explicit_id(Some(-3), "item action"),
            Err(ServiceError::InvalidArgument(_))
        );
    }

    #[test]
    fn postgres_sequences_are_moved_past_explicit_ids() {
        let stmt = id_sequence_sync(DbBackend::Postgres, "items").unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT setval(pg_get_serial_sequence('items', 'id'), (SELECT MAX(id) FROM items))"
        );
    }

    #[test]
    fn sqlite_needs_no_sequence_sync() {
        assert!(id_sequence_sync(DbBackend::Sqlite, "item_actions").is_none());
    }
}
