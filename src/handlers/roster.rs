use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use serde_json::{json, Value};

use crate::{
    event_log,
    extractors::{FacultyEmail, Id, JsonBody},
    models::AddStudentBody,
    names,
    rejections::{AppError, ResultExt},
    services::roster::{RegisterOutcome, DEFAULT_STUDENT_PASSWORD},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::FACULTY_STUDENTS_URL, post(add_student))
        .route(names::STUDENTS_URL, get(students))
        .route(names::COURSES_URL, get(courses))
        .route(names::COURSE_ENROLLMENTS_URL, get(enrollments))
}

async fn add_student(
    FacultyEmail(faculty): FacultyEmail,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AddStudentBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let outcome = state
        .roster
        .register_student(
            body.name.as_deref().unwrap_or_default(),
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or(DEFAULT_STUDENT_PASSWORD),
        )
        .await
        .reject_store("Database error")?;

    match outcome {
        RegisterOutcome::Registered { email, enrollments } => {
            tracing::info!("{faculty} registered {email} into {enrollments} courses");
            state
                .events
                .record(
                    event_log::ADD_STUDENT,
                    json!({ "faculty": faculty, "student": email }),
                )
                .await;
            Ok((StatusCode::CREATED, Json(json!({ "status": "ok" }))))
        }
        RegisterOutcome::MissingFields => Err(AppError::Input("Missing name, email, or password")),
        RegisterOutcome::EmailTaken => Err(AppError::Conflict("User with this email already exists")),
    }
}

async fn students(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let students = state
        .roster
        .students()
        .await
        .reject("could not list students")?;
    Ok(Json(json!({ "students": students })))
}

async fn courses(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let courses = state
        .roster
        .courses()
        .await
        .reject("could not list courses")?;
    Ok(Json(json!({ "courses": courses })))
}

async fn enrollments(
    State(state): State<AppState>,
    Id(course_id): Id,
) -> Result<Json<Value>, AppError> {
    let enrollments = state
        .roster
        .enrollments(course_id)
        .await
        .reject("could not list enrollments")?;
    Ok(Json(json!({ "courseId": course_id, "enrollments": enrollments })))
}
