use std::path::Path;

use axum::{
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        Method, StatusCode, Uri,
    },
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use include_dir::{include_dir, Dir};

use crate::{names, rejections::AppError, AppState};

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static");
const STATIC_CACHE_CONTROL: &str = "max-age=3600, must-revalidate";

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Content type for a file name, by extension.
pub fn content_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("csv") => "text/csv",
        Some("mp4") => "video/mp4",
        Some("mp3") => "audio/mpeg",
        Some("zip") => "application/zip",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("ppt") => "application/vnd.ms-powerpoint",
        Some("pptx") => {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        }
        _ => "application/octet-stream",
    }
}

/// Append the site footer before `</body>` unless the page already has one.
pub fn with_footer(html: &str) -> String {
    if html.contains(names::FOOTER_MARKER) {
        return html.to_string();
    }
    match html.rfind("</body>") {
        Some(idx) => format!("{}{}{}", &html[..idx], names::FOOTER_HTML, &html[idx..]),
        None => format!("{html}{}", names::FOOTER_HTML),
    }
}

async fn index() -> Result<Html<String>, AppError> {
    let page = STATIC_DIR
        .get_file(names::INDEX_PAGE)
        .and_then(|file| file.contents_utf8())
        .ok_or(AppError::NotFound("not found"))?;

    Ok(Html(with_footer(page)))
}

/// Serves embedded assets for any GET that no API route claimed.
pub async fn fallback(method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return AppError::NotFound("not found").into_response();
    }

    let path = uri.path().trim_start_matches('/');
    let Some(file) = STATIC_DIR.get_file(Path::new(path)) else {
        return AppError::NotFound("not found").into_response();
    };

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type(path)),
            (CACHE_CONTROL, STATIC_CACHE_CONTROL),
        ],
        file.contents(),
    )
        .into_response()
}
