// Database module - provides data access layer

use std::{sync::Arc, time::Duration};
use color_eyre::{eyre::OptionExt, Result};

// Re-export models for convenience
pub mod models;
pub use models::*;

mod helpers;
pub use helpers::InsertOutcome;

// Internal modules
mod schema;
mod seed;
mod user;
mod course;
mod content;
mod quiz;
mod result;

/// How long a local writer waits for the file lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// Main database handle
#[derive(Clone)]
pub struct Db {
    db: Arc<libsql::Database>,
    local: bool,
}

impl Db {
    pub async fn new(url: String, auth_token: String) -> Result<Self> {
        let local = url.starts_with("file:");
        let db = if local {
            // Local SQLite file
            let path = url.strip_prefix("file:").unwrap_or(&url);
            libsql::Builder::new_local(path).build().await?
        } else {
            // Remote libSQL server
            libsql::Builder::new_remote(url.to_owned(), auth_token)
                .build()
                .await?
        };

        let conn = db.connect()?;

        // Verify connection
        let one = conn
            .query("SELECT 1", ())
            .await?
            .next()
            .await?
            .ok_or_eyre("connection check failed")?
            .get::<i32>(0)?;
        if one != 1 {
            color_eyre::eyre::bail!("connection check returned {one}");
        }

        if local {
            // Readers no longer block the single writer
            conn.query("PRAGMA journal_mode=WAL", ()).await?;
        }

        schema::create_schema(&conn).await?;

        tracing::info!("database connection has been verified");

        Ok(Self {
            db: Arc::new(db),
            local,
        })
    }

    /// Open a connection. Local connections queue behind a busy writer instead of
    /// failing with `database is locked`.
    fn connect(&self) -> Result<libsql::Connection> {
        let conn = self.db.connect()?;
        if self.local {
            conn.busy_timeout(BUSY_TIMEOUT)?;
        }
        Ok(conn)
    }
}
