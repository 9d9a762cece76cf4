use color_eyre::Result;
use libsql::params;

use super::helpers::{execute_unique, query_all, query_scalar, InsertOutcome};
use super::models::{Course, Enrollee};
use super::Db;

impl Db {
    /// Insert a course. Without an explicit id the next sequential one is used.
    ///
    /// Existing students are not enrolled in the new course.
    pub async fn create_course(
        &self,
        id: Option<i64>,
        name: &str,
        description: &str,
        faculty: &str,
    ) -> Result<InsertOutcome<i64>> {
        let conn = self.connect()?;
        let outcome = execute_unique(
            &conn,
            "INSERT INTO courses (id, name, description, faculty) VALUES (?, ?, ?, ?)",
            params![id, name, description, faculty],
        )
        .await?;

        if outcome.is_duplicate() {
            return Ok(InsertOutcome::Duplicate);
        }
        let course_id = conn.last_insert_rowid();

        tracing::info!("new course created: id={course_id}, name={name}");
        Ok(InsertOutcome::Inserted(course_id))
    }

    pub async fn courses(&self) -> Result<Vec<Course>> {
        let conn = self.connect()?;
        query_all(
            &conn,
            "SELECT id, name, description, faculty FROM courses ORDER BY id",
            (),
        )
        .await
    }

    pub async fn course_count(&self) -> Result<i64> {
        let conn = self.connect()?;
        query_scalar(&conn, "SELECT COUNT(*) FROM courses", ()).await
    }

    /// Students enrolled in `course_id`, ordered by name.
    pub async fn course_enrollments(&self, course_id: i64) -> Result<Vec<Enrollee>> {
        let conn = self.connect()?;
        query_all(
            &conn,
            r#"
            SELECT u.name, u.email
            FROM users u
            JOIN course_enrollments ce ON u.email = ce.student_email
            WHERE ce.course_id = ?
            ORDER BY u.name
            "#,
            params![course_id],
        )
        .await
    }
}
