use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::{rejections::AppError, utils};

/// The faculty email claimed by the `{faculty_email}` path segment.
///
/// Nothing verifies the claim; it is normalized and shape-checked, then only
/// used as the recorded owner of what the request creates.
pub struct FacultyEmail(pub String);

impl<S: Send + Sync> FromRequestParts<S> for FacultyEmail {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Input("missing faculty email"))?;

        let email = utils::normalize_email(&raw);
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
                Ok(FacultyEmail(email))
            }
            _ => Err(AppError::Input("malformed faculty email")),
        }
    }
}

/// A numeric id taken from the only path parameter. Non-numeric ids are unknown
/// resources.
pub struct Id(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for Id {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<i64>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| Id(id))
            .map_err(|_| AppError::NotFound("not found"))
    }
}

/// JSON body parsed regardless of the request's content type.
pub struct JsonBody<T>(pub T);

impl<S: Send + Sync, T: DeserializeOwned> FromRequest<S> for JsonBody<T> {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!("could not read request body: {e}");
            AppError::Input("could not read request body")
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!("rejected JSON payload: {e}");
            AppError::Input("malformed JSON payload")
        })
    }
}
