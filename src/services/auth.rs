use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use color_eyre::Result;

use crate::db::{Db, User};
use crate::utils;

// ---------------------------------------------------------------------------
// Password schemes
// ---------------------------------------------------------------------------

/// How passwords are sealed before storage and compared at login.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PasswordScheme {
    /// Stored as given and compared for equality.
    #[default]
    Plain,
    /// Stored as an argon2 PHC string.
    Argon2,
}

impl PasswordScheme {
    pub fn seal(&self, password: &str) -> Result<String> {
        match self {
            PasswordScheme::Plain => Ok(password.to_string()),
            PasswordScheme::Argon2 => hash_password(password),
        }
    }

    pub fn matches(&self, candidate: &str, stored: &str) -> bool {
        match self {
            PasswordScheme::Plain => candidate == stored,
            PasswordScheme::Argon2 => verify_password(candidate, stored),
        }
    }
}

/// Run argon2 hashing on a dedicated thread with a large stack to avoid
/// stack overflow in debug builds.
fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024) // 4 MB stack
        .spawn(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| color_eyre::eyre::eyre!("failed to hash password: {e}"))
        })?
        .join()
        .map_err(|_| color_eyre::eyre::eyre!("hash thread panicked"))?
}

fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    std::thread::Builder::new()
        .stack_size(4 * 1024 * 1024)
        .spawn(move || {
            let parsed_hash = match PasswordHash::new(&hash) {
                Ok(h) => h,
                Err(_) => return false,
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .map(|h| h.join().unwrap_or(false))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// CredentialVerifier trait (the login flow only asks "is this the password?")
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait CredentialVerifier: Send + Sync {
    fn verify(
        &self,
        email: &str,
        candidate: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// Checks candidates against the secret stored in the users table.
#[derive(Clone)]
pub struct StoredCredentials {
    db: Db,
    scheme: PasswordScheme,
}

impl StoredCredentials {
    pub fn new(db: Db, scheme: PasswordScheme) -> Self {
        Self { db, scheme }
    }
}

impl CredentialVerifier for StoredCredentials {
    async fn verify(&self, email: &str, candidate: &str) -> Result<bool> {
        let stored = self.db.stored_secret(email).await?;
        Ok(stored.is_some_and(|stored| self.scheme.matches(candidate, &stored)))
    }
}

// ---------------------------------------------------------------------------
// AuthRepository trait
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AuthRepository: Send + Sync {
    fn find_user(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>>> + Send;
}

impl AuthRepository for Db {
    async fn find_user(&self, email: &str) -> Result<Option<User>> {
        Db::find_user(self, email).await
    }
}

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials matched. The user carries no password.
    Success(User),
    /// Email or password was empty.
    MissingCredentials,
    /// Password was incorrect (or email not found).
    InvalidCredentials,
}

#[derive(Clone)]
pub struct AuthService<R: AuthRepository = Db, V: CredentialVerifier = StoredCredentials> {
    repo: R,
    verifier: V,
}

impl<R: AuthRepository, V: CredentialVerifier> AuthService<R, V> {
    pub fn new(repo: R, verifier: V) -> Self {
        Self { repo, verifier }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        if email.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::MissingCredentials);
        }

        let email = utils::normalize_email(email);
        let password = password.trim();

        if !self.verifier.verify(&email, password).await? {
            tracing::info!("login rejected for {email}");
            return Ok(LoginOutcome::InvalidCredentials);
        }

        match self.repo.find_user(&email).await? {
            Some(user) => Ok(LoginOutcome::Success(user)),
            None => Ok(LoginOutcome::InvalidCredentials),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
