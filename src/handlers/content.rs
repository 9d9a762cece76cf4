use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::{
    db::ContentFilter,
    event_log,
    extractors::{FacultyEmail, JsonBody},
    models::{self, ContentBody},
    names,
    rejections::{AppError, ResultExt},
    services::content::{ContentSource, PublishOutcome, PublishRequest, Upload},
    statics, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            names::FACULTY_CONTENT_URL,
            get(faculty_content).post(publish),
        )
        .route(names::CONTENT_URL, get(all_content))
        .route(names::FILES_URL, get(file))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn link_or_metadata(url: Option<String>) -> ContentSource {
    match non_blank(url) {
        Some(url) => ContentSource::Link(url),
        None => ContentSource::MetadataOnly,
    }
}

async fn multipart_request(mut multipart: Multipart) -> Result<PublishRequest, AppError> {
    let mut upload = None;
    let mut title = None;
    let mut kind = None;
    let mut description = None;
    let mut course_id = None;
    let mut url = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("rejected multipart body: {e}");
        AppError::Input("malformed multipart body")
    })? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|e| {
                tracing::debug!("could not read uploaded file: {e}");
                AppError::Input("could not read uploaded file")
            })?;
            if !file_name.trim().is_empty() {
                upload = Some(Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|_| AppError::Input("malformed form field"))?;
        match name.as_str() {
            "title" => title = Some(text),
            "type" => kind = Some(text),
            "description" => description = Some(text),
            "courseId" => {
                course_id =
                    models::parse_opt_int(&text).map_err(|_| AppError::Input("invalid courseId"))?
            }
            "url" => url = Some(text),
            _ => {}
        }
    }

    let source = match upload {
        Some(file) => ContentSource::Upload {
            file,
            url: non_blank(url),
        },
        None => link_or_metadata(url),
    };

    Ok(PublishRequest {
        course_id,
        title,
        kind: kind.unwrap_or_default(),
        description: description.unwrap_or_default(),
        source,
    })
}

fn json_request(body: ContentBody) -> PublishRequest {
    PublishRequest {
        course_id: body.course_id,
        title: body.title,
        kind: body.kind.unwrap_or_default(),
        description: body.description.unwrap_or_default(),
        source: link_or_metadata(body.url),
    }
}

async fn publish(
    FacultyEmail(faculty): FacultyEmail,
    State(state): State<AppState>,
    req: Request,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let request = if is_multipart {
        let multipart = Multipart::from_request(req, &state)
            .await
            .map_err(|_| AppError::Input("malformed multipart body"))?;
        multipart_request(multipart).await?
    } else {
        let JsonBody(body) = JsonBody::<ContentBody>::from_request(req, &state).await?;
        json_request(body)
    };

    match state.content.publish(&faculty, request).await {
        Ok(PublishOutcome::Published {
            id,
            title,
            location,
        }) => {
            tracing::info!("{faculty} published content {id}");
            state
                .events
                .record(
                    event_log::ADD_CONTENT,
                    json!({ "faculty": faculty, "title": title, "location": location }),
                )
                .await;
            Ok((StatusCode::CREATED, Json(json!({ "status": "ok", "id": id }))))
        }
        Ok(PublishOutcome::MissingFields) => Err(AppError::Input("missing title or courseId")),
        Err(e) => {
            state
                .events
                .record(
                    event_log::ADD_CONTENT_ERROR,
                    json!({ "faculty": faculty, "error": e.to_string() }),
                )
                .await;
            Err(e).reject_store("Database error during insertion")
        }
    }
}

async fn faculty_content(
    FacultyEmail(faculty): FacultyEmail,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let content = state
        .content
        .list(&ContentFilter::ByFaculty(faculty.clone()))
        .await
        .reject("could not list content")?;
    Ok(Json(json!({ "faculty": faculty, "content": content })))
}

async fn all_content(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let content = state
        .content
        .list(&ContentFilter::All)
        .await
        .reject("could not list content")?;
    Ok(Json(json!({ "content": content })))
}

async fn file(
    State(state): State<AppState>,
    Path((owner_dir, file_name)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let bytes = state
        .content
        .authorized_file(&owner_dir, &file_name)
        .await
        .reject("could not read file")?
        .ok_or(AppError::NotFound("file not found or unauthorized"))?;

    Ok(([(CONTENT_TYPE, statics::content_type(&file_name))], bytes).into_response())
}
