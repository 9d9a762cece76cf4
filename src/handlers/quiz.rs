use axum::{
    extract::{Query, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    db::ResultFilter,
    event_log,
    extractors::{Id, JsonBody},
    models::{self, QuizBody, QuizResultBody, ResultsQuery},
    names,
    rejections::{AppError, ResultExt},
    services::quiz::{AuthorOutcome, NewQuiz, SubmitOutcome, Submission},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::QUIZZES_URL, get(quizzes).post(create_quiz))
        .route(names::QUIZ_RESULTS_URL, get(results).post(submit_result))
        .route(names::QUIZ_EXPORT_URL, get(export))
}

async fn quizzes(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let quizzes = state
        .quizzes
        .list()
        .await
        .reject("could not list quizzes")?;
    Ok(Json(json!({ "quizzes": quizzes })))
}

async fn create_quiz(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<QuizBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let quiz = NewQuiz {
        course_id: body.course_id,
        title: body.title,
        questions: body.questions,
        created_by: body.created_by,
    };

    match state
        .quizzes
        .author(quiz)
        .await
        .reject_store("Failed to create quiz")?
    {
        AuthorOutcome::Created(quiz) => {
            tracing::info!("created quiz {} ({})", quiz.id, quiz.title);
            state
                .events
                .record(
                    event_log::CREATE_QUIZ,
                    json!({ "quizId": quiz.id, "title": quiz.title, "createdBy": quiz.created_by }),
                )
                .await;
            Ok((
                StatusCode::CREATED,
                Json(json!({ "status": "ok", "quiz": quiz })),
            ))
        }
        AuthorOutcome::MissingFields => Err(AppError::Input("missing title or questions")),
    }
}

async fn submit_result(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<QuizResultBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let submission = Submission {
        quiz_id: body.quiz_id,
        student_email: body.student_email,
        score: body.score,
        answers: body.answers,
    };
    let (quiz_id, score) = (submission.quiz_id, submission.score);

    match state
        .quizzes
        .submit(submission)
        .await
        .reject_store("Database error")?
    {
        SubmitOutcome::Recorded { student_email } => {
            state
                .events
                .record(
                    event_log::QUIZ_RESULT,
                    json!({ "quizId": quiz_id, "studentEmail": student_email, "score": score }),
                )
                .await;
            Ok((StatusCode::CREATED, Json(json!({ "status": "ok" }))))
        }
        SubmitOutcome::MissingFields => {
            Err(AppError::Input("missing quizId, studentEmail, or score"))
        }
        SubmitOutcome::AlreadySubmitted => Err(AppError::Conflict("quiz already submitted")),
    }
}

fn result_filter(query: ResultsQuery) -> Result<ResultFilter, AppError> {
    if let Some(email) = query.student_email.filter(|e| !e.trim().is_empty()) {
        return Ok(ResultFilter::ByStudent(email));
    }
    let quiz_id = models::parse_opt_int(query.quiz_id.as_deref().unwrap_or_default())
        .map_err(|_| AppError::Input("invalid quizId"))?;
    Ok(quiz_id.map_or(ResultFilter::All, ResultFilter::ByQuiz))
}

async fn results(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = result_filter(query)?;
    let results = state
        .quizzes
        .results(&filter)
        .await
        .reject("could not list quiz results")?;
    Ok(Json(json!({ "results": results })))
}

async fn export(State(state): State<AppState>, Id(quiz_id): Id) -> Result<Response, AppError> {
    let csv = state
        .quizzes
        .export_csv(quiz_id)
        .await
        .reject("could not export quiz results")?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        names::quiz_export_file_name(quiz_id)
    );
    Ok((
        [
            (CONTENT_TYPE, "text/csv".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
