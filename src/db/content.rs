use color_eyre::{eyre::OptionExt, Result};
use libsql::params;

use super::helpers::query_all;
use super::models::{ContentFilter, ContentRow, NewContent};
use super::Db;
use crate::utils;

const CONTENT_COLUMNS: &str =
    "id, course_id, faculty_email, title, type, description, file_path, url, created_at";

impl Db {
    pub async fn insert_content(&self, content: &NewContent) -> Result<i64> {
        let conn = self.connect()?;

        let content_id = conn
            .query(
                r#"
                INSERT INTO content (course_id, faculty_email, title, type, description, file_path, url, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING id
                "#,
                params![
                    content.course_id,
                    content.faculty_email.as_str(),
                    content.title.as_str(),
                    content.kind.as_str(),
                    content.description.as_str(),
                    content.file_path.clone(),
                    content.url.clone(),
                    utils::timestamp(),
                ],
            )
            .await?
            .next()
            .await?
            .ok_or_eyre("could not get content id")?
            .get::<i64>(0)?;

        tracing::info!(
            "new content created: id={content_id}, course_id={}, faculty={}",
            content.course_id,
            content.faculty_email
        );
        Ok(content_id)
    }

    pub async fn contents(&self, filter: &ContentFilter) -> Result<Vec<ContentRow>> {
        let conn = self.connect()?;
        match filter {
            ContentFilter::All => {
                query_all(
                    &conn,
                    &format!("SELECT {CONTENT_COLUMNS} FROM content ORDER BY id"),
                    (),
                )
                .await
            }
            ContentFilter::ByFaculty(email) => {
                query_all(
                    &conn,
                    &format!(
                        "SELECT {CONTENT_COLUMNS} FROM content WHERE faculty_email = ? ORDER BY id"
                    ),
                    params![email.as_str()],
                )
                .await
            }
        }
    }

    /// Whether some content item references exactly `file_path`.
    pub async fn content_path_exists(&self, file_path: &str) -> Result<bool> {
        let conn = self.connect()?;
        let row = conn
            .query(
                "SELECT 1 FROM content WHERE file_path = ? LIMIT 1",
                params![file_path],
            )
            .await?
            .next()
            .await?;
        Ok(row.is_some())
    }
}
