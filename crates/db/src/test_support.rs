//! Helpers shared by unit tests.

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use docledger_core::workflow::{Actor, Role};

use crate::migration::Migrator;

/// Fresh in-memory SQLite database with the schema applied.
///
/// The pool holds exactly one connection, since every SQLite in-memory
/// connection opens its own database.
pub async fn sqlite() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// New actor with `role`.
pub fn actor(role: Role) -> Actor {
    Actor::new(Uuid::new_v4(), role)
}
