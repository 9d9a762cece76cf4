pub mod db;
pub mod event_log;
pub mod extractors;
pub mod files;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod services;
pub mod statics;
pub mod utils;

use std::path::PathBuf;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;

use db::Db;
use event_log::EventLog;
use files::FileStore;
use services::{
    auth::{AuthService, PasswordScheme, StoredCredentials},
    content::ContentService,
    quiz::QuizService,
    roster::RosterService,
};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub roster: RosterService,
    pub content: ContentService,
    pub quizzes: QuizService,
    pub events: EventLog,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wire the services over one store. Uploads and the event log live under
    /// `data_dir`.
    pub fn new(
        db: Db,
        data_dir: impl Into<PathBuf>,
        scheme: PasswordScheme,
        max_upload_bytes: usize,
    ) -> Self {
        let data_dir = data_dir.into();
        Self {
            auth: AuthService::new(db.clone(), StoredCredentials::new(db.clone(), scheme)),
            roster: RosterService::new(db.clone(), scheme),
            content: ContentService::new(db.clone(), FileStore::new(&data_dir)),
            quizzes: QuizService::new(db),
            events: EventLog::new(data_dir.join(names::EVENT_LOG_FILE_NAME)),
            max_upload_bytes,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .merge(handlers::auth::routes())
        .merge(handlers::roster::routes())
        .merge(handlers::content::routes())
        .merge(handlers::quiz::routes())
        .merge(handlers::logs::routes())
        .merge(statics::routes())
        .fallback(statics::fallback)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
