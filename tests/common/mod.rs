#![allow(dead_code)]

use std::path::{Path, PathBuf};

use coursehub::{db::Db, services::auth::PasswordScheme, AppState};

fn unique_suffix() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}_{}", std::process::id(), id)
}

pub fn create_test_db_path() -> PathBuf {
    let path = std::env::temp_dir().join(format!("coursehub_test_{}.db", unique_suffix()));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    path
}

pub async fn open_test_db(path: &Path) -> Db {
    let url = format!("file:{}", path.display());
    Db::new(url, String::new())
        .await
        .expect("failed to create test database")
}

pub async fn create_test_db() -> Db {
    open_test_db(&create_test_db_path()).await
}

pub fn create_test_data_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("coursehub_data_{}", unique_suffix()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// Router over a fresh database seeded with the demo courses and users.
pub async fn create_test_app() -> (axum::Router, Db, PathBuf) {
    create_test_app_on(&create_test_db_path()).await
}

/// Like [`create_test_app`], over the database file at `db_path`.
pub async fn create_test_app_on(db_path: &Path) -> (axum::Router, Db, PathBuf) {
    let db = open_test_db(db_path).await;
    db.seed_demo_data(&PasswordScheme::Plain)
        .await
        .expect("failed to seed test database");
    let data_dir = create_test_data_dir();
    let state = AppState::new(db.clone(), &data_dir, PasswordScheme::Plain, 1024 * 1024);
    (coursehub::router(state), db, data_dir)
}
