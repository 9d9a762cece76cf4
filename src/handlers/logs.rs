use axum::{extract::State, routing::get, Json, Router};

use crate::{
    event_log::LogEntry,
    names,
    rejections::{AppError, ResultExt},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::LOGS_URL, get(logs))
}

async fn logs(State(state): State<AppState>) -> Result<Json<Vec<LogEntry>>, AppError> {
    let entries = state
        .events
        .entries()
        .await
        .reject("could not read event log")?;
    Ok(Json(entries))
}
