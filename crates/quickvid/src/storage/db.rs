use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use crate::core::error::AppResult;
use crate::storage::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Create a connection pool for `database_path` and bring the schema up to date.
///
/// Unlike a best-effort migration, a failing migration aborts startup: the
/// feedback store cannot work without its table.
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    let manager = SqliteConnectionManager::file(database_path);
    let pool = Pool::builder()
        .max_size(4) // feedback is the only writer
        .build(manager)?;

    let mut conn = pool.get()?;
    migrations::run_migrations(&mut conn)?;

    Ok(pool)
}

/// Get a connection from the pool. It returns to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> AppResult<DbConnection> {
    Ok(pool.get()?)
}
