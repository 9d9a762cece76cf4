use color_eyre::Result;
use libsql::params;

use super::helpers::{execute_unique, query_all, InsertOutcome};
use super::models::{JsonList, QuizResultRow, ResultFilter};
use super::Db;
use crate::utils;

const RESULT_COLUMNS: &str = "quiz_id, student_email, score, completed_date, answers";

impl Db {
    /// Record a quiz submission. The (quiz, student) primary key rejects resubmissions.
    pub async fn insert_quiz_result(
        &self,
        quiz_id: i64,
        student_email: &str,
        score: i64,
        answers: &JsonList<serde_json::Value>,
    ) -> Result<InsertOutcome<()>> {
        let conn = self.connect()?;
        let outcome = execute_unique(
            &conn,
            "INSERT INTO quiz_results (quiz_id, student_email, score, completed_date, answers) VALUES (?, ?, ?, ?, ?)",
            params![quiz_id, student_email, score, utils::timestamp(), answers.encode()?],
        )
        .await?;

        Ok(match outcome {
            InsertOutcome::Inserted(_) => {
                tracing::info!(
                    "quiz result recorded: quiz_id={quiz_id}, student={student_email}, score={score}"
                );
                InsertOutcome::Inserted(())
            }
            InsertOutcome::Duplicate => InsertOutcome::Duplicate,
        })
    }

    /// Stored results, answers left encoded.
    pub async fn quiz_results(&self, filter: &ResultFilter) -> Result<Vec<QuizResultRow>> {
        let conn = self.connect()?;
        match filter {
            ResultFilter::All => {
                query_all(
                    &conn,
                    &format!("SELECT {RESULT_COLUMNS} FROM quiz_results ORDER BY completed_date"),
                    (),
                )
                .await
            }
            ResultFilter::ByStudent(email) => {
                query_all(
                    &conn,
                    &format!(
                        "SELECT {RESULT_COLUMNS} FROM quiz_results WHERE student_email = ? ORDER BY completed_date"
                    ),
                    params![email.as_str()],
                )
                .await
            }
            ResultFilter::ByQuiz(quiz_id) => {
                query_all(
                    &conn,
                    &format!(
                        "SELECT {RESULT_COLUMNS} FROM quiz_results WHERE quiz_id = ? ORDER BY completed_date"
                    ),
                    params![*quiz_id],
                )
                .await
            }
        }
    }
}
