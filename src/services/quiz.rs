use color_eyre::Result;
use serde_json::Value;

use crate::db::{Db, InsertOutcome, JsonList, Quiz, QuizResult, QuizResultRow, ResultFilter};
use crate::utils;

/// Header row of the results export.
pub const CSV_HEADER: [&str; 5] = ["quizId", "studentEmail", "score", "completedDate", "answers"];

// ---------------------------------------------------------------------------
// QuizRepository trait
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait QuizRepository: Send + Sync {
    fn insert_quiz(
        &self,
        course_id: Option<i64>,
        title: &str,
        questions: &JsonList<Value>,
        created_by: Option<String>,
    ) -> impl std::future::Future<Output = Result<(i64, String)>> + Send;

    fn quizzes(&self) -> impl std::future::Future<Output = Result<Vec<Quiz>>> + Send;

    fn insert_quiz_result(
        &self,
        quiz_id: i64,
        student_email: &str,
        score: i64,
        answers: &JsonList<Value>,
    ) -> impl std::future::Future<Output = Result<InsertOutcome<()>>> + Send;

    fn quiz_results(
        &self,
        filter: &ResultFilter,
    ) -> impl std::future::Future<Output = Result<Vec<QuizResultRow>>> + Send;
}

impl QuizRepository for Db {
    async fn insert_quiz(
        &self,
        course_id: Option<i64>,
        title: &str,
        questions: &JsonList<Value>,
        created_by: Option<String>,
    ) -> Result<(i64, String)> {
        Db::insert_quiz(self, course_id, title, questions, created_by).await
    }

    async fn quizzes(&self) -> Result<Vec<Quiz>> {
        Db::quizzes(self).await
    }

    async fn insert_quiz_result(
        &self,
        quiz_id: i64,
        student_email: &str,
        score: i64,
        answers: &JsonList<Value>,
    ) -> Result<InsertOutcome<()>> {
        Db::insert_quiz_result(self, quiz_id, student_email, score, answers).await
    }

    async fn quiz_results(&self, filter: &ResultFilter) -> Result<Vec<QuizResultRow>> {
        Db::quiz_results(self, filter).await
    }
}

// ---------------------------------------------------------------------------
// Inputs and outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewQuiz {
    pub course_id: Option<i64>,
    pub title: Option<String>,
    pub questions: Option<JsonList<Value>>,
    pub created_by: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum AuthorOutcome {
    Created(Quiz),
    /// Title or questions were missing.
    MissingFields,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub quiz_id: Option<i64>,
    pub student_email: Option<String>,
    /// `Some(0)` is a real score.
    pub score: Option<i64>,
    pub answers: Option<JsonList<Value>>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored under the normalized student email.
    Recorded { student_email: String },
    /// Quiz id, student email or score was missing.
    MissingFields,
    /// This student already has a result for this quiz.
    AlreadySubmitted,
}

// ---------------------------------------------------------------------------
// QuizService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct QuizService<R: QuizRepository = Db> {
    repo: R,
}

impl<R: QuizRepository> QuizService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn author(&self, quiz: NewQuiz) -> Result<AuthorOutcome> {
        let (Some(title), Some(questions)) = (quiz.title, quiz.questions) else {
            return Ok(AuthorOutcome::MissingFields);
        };
        if title.trim().is_empty() {
            return Ok(AuthorOutcome::MissingFields);
        }

        let (id, created_date) = self
            .repo
            .insert_quiz(quiz.course_id, &title, &questions, quiz.created_by.clone())
            .await?;

        Ok(AuthorOutcome::Created(Quiz {
            id,
            course_id: quiz.course_id,
            title,
            questions,
            created_by: quiz.created_by,
            created_date,
        }))
    }

    pub async fn list(&self) -> Result<Vec<Quiz>> {
        self.repo.quizzes().await
    }

    pub async fn submit(&self, submission: Submission) -> Result<SubmitOutcome> {
        let student_email = submission
            .student_email
            .as_deref()
            .map(utils::normalize_email)
            .filter(|email| !email.is_empty());

        let (Some(quiz_id), Some(student_email), Some(score)) =
            (submission.quiz_id, student_email, submission.score)
        else {
            return Ok(SubmitOutcome::MissingFields);
        };

        let answers = submission.answers.unwrap_or_default();
        let outcome = self
            .repo
            .insert_quiz_result(quiz_id, &student_email, score, &answers)
            .await?;
        match outcome {
            InsertOutcome::Inserted(()) => Ok(SubmitOutcome::Recorded { student_email }),
            InsertOutcome::Duplicate => Ok(SubmitOutcome::AlreadySubmitted),
        }
    }

    pub async fn results(&self, filter: &ResultFilter) -> Result<Vec<QuizResult>> {
        let filter = match filter {
            ResultFilter::ByStudent(email) => ResultFilter::ByStudent(utils::normalize_email(email)),
            other => other.clone(),
        };

        Ok(self
            .repo
            .quiz_results(&filter)
            .await?
            .into_iter()
            .map(QuizResult::from)
            .collect())
    }

    /// Results of one quiz as CSV, answers kept in their stored encoded form.
    pub async fn export_csv(&self, quiz_id: i64) -> Result<Vec<u8>> {
        let rows = self.repo.quiz_results(&ResultFilter::ByQuiz(quiz_id)).await?;

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for row in &rows {
            writer.write_record([
                row.quiz_id.to_string(),
                row.student_email.clone(),
                row.score.to_string(),
                row.completed_date.clone(),
                row.answers.clone(),
            ])?;
        }

        tracing::info!("exported {} results for quiz {quiz_id}", rows.len());
        Ok(writer.into_inner().map_err(|e| e.into_error())?)
    }
}
