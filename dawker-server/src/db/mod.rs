//! Database access layer for dawker-server
//!
//! Plain async functions over `sqlx`. Services own transaction boundaries.

pub mod daws;
pub mod forum;
pub mod notes;
pub mod presets;
pub mod ratings;
pub mod users;

use dawker_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

/// Start a transaction holding the write lock from its first statement
///
/// Every read-then-write transaction goes through here. In WAL mode a
/// deferred transaction that has already read cannot wait for the write
/// lock: SQLite fails the upgrade with SQLITE_BUSY regardless of
/// `busy_timeout`. `BEGIN IMMEDIATE` waits on the busy handler instead.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Read a sibling position column as `u32`
pub(crate) fn read_position(row: &SqliteRow, column: &str) -> Result<u32> {
    let raw: i64 = row.try_get(column)?;
    u32::try_from(raw).map_err(|_| {
        Error::Internal(format!("Stored {} {} is out of range", column, raw))
    })
}
