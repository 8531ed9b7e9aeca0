//! Connection pooling and write serialization for SQLite.

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::IntoCore;
use folionav_core::errors::{DatabaseError, Error, Result};

mod write_actor;

pub use write_actor::{spawn_writer, WriteHandle};

pub type DbPool = Arc<Pool<ConnectionManager<SqliteConnection>>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Applied to every pooled connection. WAL keeps readers unblocked while the
/// writer actor holds its transaction; the busy timeout covers the handoff.
#[derive(Debug)]
struct ConnectionOptions;

impl diesel::r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error>
    for ConnectionOptions
{
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA journal_mode = WAL; \
             PRAGMA synchronous = NORMAL; \
             PRAGMA busy_timeout = 5000; \
             PRAGMA foreign_keys = ON;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Creates an r2d2 connection pool for the database at `db_path`.
pub fn create_pool(db_path: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(10)
        .connection_timeout(Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;
    debug!("Created SQLite connection pool for {}", db_path);
    Ok(Arc::new(pool))
}

/// Checks out a connection from the pool for read queries. Writes go
/// through the [`WriteHandle`] instead.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    pool.get().into_core()
}
