use color_eyre::{eyre::OptionExt, Result};
use libsql::params::IntoParams;
use serde::de::DeserializeOwned;

/// Extended SQLite result codes for key collisions. Other constraint failures
/// (NOT NULL, CHECK, FOREIGN KEY) stay errors.
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Result of an insert guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome<T> {
    Inserted(T),
    /// The row collided with an existing key; nothing was written.
    Duplicate,
}

impl<T> InsertOutcome<T> {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, InsertOutcome::Duplicate)
    }
}

/// Whether a libSQL error is a UNIQUE / PRIMARY KEY violation.
///
/// Local databases report the (extended) SQLite code; remote ones only carry the
/// message text.
pub fn is_unique_violation(err: &libsql::Error) -> bool {
    if let libsql::Error::SqliteFailure(code, _) = err {
        if matches!(*code, SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY) {
            return true;
        }
    }
    let message = err.to_string();
    message.contains("UNIQUE constraint failed") || message.contains("PRIMARY KEY constraint")
}

/// Run an insert and map uniqueness violations to [`InsertOutcome::Duplicate`].
pub async fn execute_unique(
    conn: &libsql::Connection,
    sql: &str,
    params: impl IntoParams,
) -> Result<InsertOutcome<u64>> {
    match conn.execute(sql, params).await {
        Ok(affected) => Ok(InsertOutcome::Inserted(affected)),
        Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
        Err(e) => Err(e.into()),
    }
}

/// Fetch all rows and deserialize each into `T` via `libsql::de::from_row`.
pub async fn query_all<T: DeserializeOwned>(
    conn: &libsql::Connection,
    sql: &str,
    params: impl IntoParams,
) -> Result<Vec<T>> {
    let mut rows = conn.query(sql, params).await?;
    let mut results = Vec::new();
    while let Some(row) = rows.next().await? {
        results.push(libsql::de::from_row::<T>(&row)?);
    }
    Ok(results)
}

/// Fetch the first row and deserialize into `T`, or return `None` if no rows.
pub async fn query_optional<T: DeserializeOwned>(
    conn: &libsql::Connection,
    sql: &str,
    params: impl IntoParams,
) -> Result<Option<T>> {
    match conn.query(sql, params).await?.next().await? {
        Some(row) => Ok(Some(libsql::de::from_row::<T>(&row)?)),
        None => Ok(None),
    }
}

/// Fetch a single integer from the first column of the first row.
pub async fn query_scalar(
    conn: &libsql::Connection,
    sql: &str,
    params: impl IntoParams,
) -> Result<i64> {
    let value = conn
        .query(sql, params)
        .await?
        .next()
        .await?
        .ok_or_eyre("expected a row but got none")?
        .get::<i64>(0)?;
    Ok(value)
}
