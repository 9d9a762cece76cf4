use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};

use crate::{
    extractors::JsonBody,
    models::LoginBody,
    names,
    rejections::{AppError, ResultExt},
    services::auth::LoginOutcome,
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route(names::LOGIN_URL, post(login))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginBody>,
) -> Result<Json<Value>, AppError> {
    let outcome = state
        .auth
        .login(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await
        .reject("login failed")?;

    match outcome {
        LoginOutcome::Success(user) => Ok(Json(json!({ "status": "ok", "user": user }))),
        LoginOutcome::MissingCredentials => Err(AppError::Input("missing credentials")),
        LoginOutcome::InvalidCredentials => Err(AppError::Unauthorized("invalid credentials")),
    }
}
