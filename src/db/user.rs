use color_eyre::Result;
use libsql::{params, TransactionBehavior};

use super::helpers::{execute_unique, query_all, query_optional, query_scalar, InsertOutcome};
use super::models::{JsonList, Role, Student, User, UserRow};
use super::Db;

impl Db {
    pub async fn find_user(&self, email: &str) -> Result<Option<User>> {
        let conn = self.connect()?;
        let row = query_optional::<UserRow>(
            &conn,
            "SELECT email, role, name, subjects FROM users WHERE email = ?",
            params![email],
        )
        .await?;

        row.map(User::try_from).transpose()
    }

    /// The stored credential for `email`, in whatever form the password scheme sealed it.
    pub async fn stored_secret(&self, email: &str) -> Result<Option<String>> {
        let conn = self.connect()?;
        let row = conn
            .query("SELECT password FROM users WHERE email = ?", params![email])
            .await?
            .next()
            .await?;

        match row {
            Some(row) => Ok(Some(row.get::<String>(0)?)),
            None => Ok(None),
        }
    }

    /// Insert a student and enroll them in every course that exists right now.
    ///
    /// Runs in one transaction: a duplicate email leaves the store untouched.
    /// Returns the number of enrollments created.
    pub async fn register_student(
        &self,
        email: &str,
        secret: &str,
        name: &str,
    ) -> Result<InsertOutcome<usize>> {
        let conn = self.connect()?;
        // Take the write lock up front so concurrent registrations queue here
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;

        let inserted = execute_unique(
            &tx,
            "INSERT INTO users (email, password, role, name, subjects) VALUES (?, ?, ?, ?, '[]')",
            params![email, secret, Role::Student.as_str(), name],
        )
        .await?;

        if inserted.is_duplicate() {
            tx.rollback().await?;
            tracing::info!("student registration rejected, email taken: {email}");
            return Ok(InsertOutcome::Duplicate);
        }

        let enrolled = tx
            .execute(
                r#"
                INSERT INTO course_enrollments (student_email, course_id)
                SELECT ?, id FROM courses
                "#,
                params![email],
            )
            .await?;

        tx.commit().await?;

        tracing::info!("new student created: email={email}, enrollments={enrolled}");
        Ok(InsertOutcome::Inserted(enrolled as usize))
    }

    pub async fn create_faculty(
        &self,
        email: &str,
        secret: &str,
        name: &str,
        subjects: &JsonList<i64>,
    ) -> Result<InsertOutcome<()>> {
        let conn = self.connect()?;
        let outcome = execute_unique(
            &conn,
            "INSERT INTO users (email, password, role, name, subjects) VALUES (?, ?, ?, ?, ?)",
            params![email, secret, Role::Faculty.as_str(), name, subjects.encode()?],
        )
        .await?;

        Ok(match outcome {
            InsertOutcome::Inserted(_) => {
                tracing::info!("new faculty created: email={email}");
                InsertOutcome::Inserted(())
            }
            InsertOutcome::Duplicate => InsertOutcome::Duplicate,
        })
    }

    pub async fn students(&self) -> Result<Vec<Student>> {
        let conn = self.connect()?;
        query_all(
            &conn,
            "SELECT email, name FROM users WHERE role = ? ORDER BY email",
            params![Role::Student.as_str()],
        )
        .await
    }

    pub async fn user_count(&self) -> Result<i64> {
        let conn = self.connect()?;
        query_scalar(&conn, "SELECT COUNT(*) FROM users", ()).await
    }
}
