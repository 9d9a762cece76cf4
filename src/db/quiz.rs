use color_eyre::{eyre::OptionExt, Result};
use libsql::params;

use super::helpers::query_all;
use super::models::{JsonList, Quiz, QuizRow};
use super::Db;
use crate::utils;

impl Db {
    /// Store a quiz. Returns the new id and its creation timestamp.
    pub async fn insert_quiz(
        &self,
        course_id: Option<i64>,
        title: &str,
        questions: &JsonList<serde_json::Value>,
        created_by: Option<String>,
    ) -> Result<(i64, String)> {
        let created_date = utils::timestamp();
        let conn = self.connect()?;

        let quiz_id = conn
            .query(
                r#"
                INSERT INTO quizzes (course_id, title, questions, created_by, created_date)
                VALUES (?, ?, ?, ?, ?)
                RETURNING id
                "#,
                params![
                    course_id,
                    title,
                    questions.encode()?,
                    created_by.clone(),
                    created_date.clone(),
                ],
            )
            .await?
            .next()
            .await?
            .ok_or_eyre("could not get quiz id")?
            .get::<i64>(0)?;

        tracing::info!(
            "new quiz created with id: {quiz_id} by: {}",
            created_by.as_deref().unwrap_or("unknown")
        );
        Ok((quiz_id, created_date))
    }

    pub async fn quizzes(&self) -> Result<Vec<Quiz>> {
        let conn = self.connect()?;
        let rows = query_all::<QuizRow>(
            &conn,
            "SELECT id, course_id, title, questions, created_by, created_date FROM quizzes ORDER BY id",
            (),
        )
        .await?;

        Ok(rows.into_iter().map(Quiz::from).collect())
    }
}
