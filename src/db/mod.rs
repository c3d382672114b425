//! Database layer: SQLite pool, migrations and the credential store backed by them.

mod pool;
mod repositories;

pub use pool::{create_pool, run_migrations, DbPool};
pub use repositories::SqliteStorage;
