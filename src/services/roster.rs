use color_eyre::Result;

use super::auth::PasswordScheme;
use crate::db::{Course, Db, Enrollee, InsertOutcome, Student};
use crate::utils;

/// Password given to students registered without one.
pub const DEFAULT_STUDENT_PASSWORD: &str = "123";

// ---------------------------------------------------------------------------
// RosterRepository trait
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait RosterRepository: Send + Sync {
    fn register_student(
        &self,
        email: &str,
        secret: &str,
        name: &str,
    ) -> impl std::future::Future<Output = Result<InsertOutcome<usize>>> + Send;

    fn students(&self) -> impl std::future::Future<Output = Result<Vec<Student>>> + Send;

    fn courses(&self) -> impl std::future::Future<Output = Result<Vec<Course>>> + Send;

    fn course_enrollments(
        &self,
        course_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Enrollee>>> + Send;
}

impl RosterRepository for Db {
    async fn register_student(
        &self,
        email: &str,
        secret: &str,
        name: &str,
    ) -> Result<InsertOutcome<usize>> {
        Db::register_student(self, email, secret, name).await
    }

    async fn students(&self) -> Result<Vec<Student>> {
        Db::students(self).await
    }

    async fn courses(&self) -> Result<Vec<Course>> {
        Db::courses(self).await
    }

    async fn course_enrollments(&self, course_id: i64) -> Result<Vec<Enrollee>> {
        Db::course_enrollments(self, course_id).await
    }
}

// ---------------------------------------------------------------------------
// RosterService
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Student created and enrolled in every course that existed at that moment.
    Registered { email: String, enrollments: usize },
    /// Name, email or password was empty.
    MissingFields,
    /// A user with this email already exists.
    EmailTaken,
}

#[derive(Clone)]
pub struct RosterService<R: RosterRepository = Db> {
    repo: R,
    scheme: PasswordScheme,
}

impl<R: RosterRepository> RosterService<R> {
    pub fn new(repo: R, scheme: PasswordScheme) -> Self {
        Self { repo, scheme }
    }

    pub async fn register_student(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterOutcome> {
        let name = name.trim();
        let email = utils::normalize_email(email);
        let password = password.trim();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Ok(RegisterOutcome::MissingFields);
        }

        let secret = self.scheme.seal(password)?;
        match self.repo.register_student(&email, &secret, name).await? {
            InsertOutcome::Inserted(enrollments) => {
                Ok(RegisterOutcome::Registered { email, enrollments })
            }
            InsertOutcome::Duplicate => Ok(RegisterOutcome::EmailTaken),
        }
    }

    pub async fn students(&self) -> Result<Vec<Student>> {
        self.repo.students().await
    }

    pub async fn courses(&self) -> Result<Vec<Course>> {
        self.repo.courses().await
    }

    pub async fn enrollments(&self, course_id: i64) -> Result<Vec<Enrollee>> {
        self.repo.course_enrollments(course_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(repo: MockRosterRepository) -> RosterService<MockRosterRepository> {
        RosterService::new(repo, PasswordScheme::Plain)
    }

    #[tokio::test]
    async fn register_normalizes_email_before_insert() {
        let mut repo = MockRosterRepository::new();
        repo.expect_register_student()
            .withf(|email, secret, name| email == "ann@x.com" && secret == "pw" && name == "Ann")
            .times(1)
            .returning(|_, _, _| Box::pin(async { Ok(InsertOutcome::Inserted(4)) }));

        let outcome = service(repo)
            .register_student("Ann", " ANN@X.com", "pw")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RegisterOutcome::Registered {
                email: "ann@x.com".to_string(),
                enrollments: 4
            }
        );
    }

    #[tokio::test]
    async fn register_duplicate_reports_email_taken() {
        let mut repo = MockRosterRepository::new();
        repo.expect_register_student()
            .returning(|_, _, _| Box::pin(async { Ok(InsertOutcome::Duplicate) }));

        let outcome = service(repo)
            .register_student("Ann", "ann@x.com", "pw")
            .await
            .unwrap();

        assert_eq!(outcome, RegisterOutcome::EmailTaken);
    }

    #[tokio::test]
    async fn register_with_blank_fields_touches_nothing() {
        let cases = [
            ("", "a@x.com", "pw"),
            ("Ann", "  ", "pw"),
            ("Ann", "a@x.com", ""),
        ];
        for (name, email, password) in cases {
            let outcome = service(MockRosterRepository::new())
                .register_student(name, email, password)
                .await
                .unwrap();
            assert_eq!(outcome, RegisterOutcome::MissingFields);
        }
    }

    #[tokio::test]
    async fn argon2_scheme_never_stores_plaintext() {
        let mut repo = MockRosterRepository::new();
        repo.expect_register_student()
            .withf(|_, secret, _| secret.starts_with("$argon2"))
            .returning(|_, _, _| Box::pin(async { Ok(InsertOutcome::Inserted(0)) }));

        let outcome = RosterService::new(repo, PasswordScheme::Argon2)
            .register_student("Ann", "ann@x.com", "pw")
            .await
            .unwrap();

        assert!(matches!(outcome, RegisterOutcome::Registered { .. }));
    }
}
