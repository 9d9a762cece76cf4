mod common;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use coursehub::names;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            req = req.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(req.body(body).expect("request build should succeed"))
        .await
        .expect("router should respond");

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn register_url() -> String {
    names::faculty_students_url("kaminee@rc.edu")
}

#[tokio::test]
async fn registered_student_can_log_in_with_normalized_email() {
    let (app, _, _) = common::create_test_app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        &register_url(),
        Some(json!({"name": "Ann", "email": "ANN@X.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "ok");

    let (status, body) = send_json(
        &app,
        Method::POST,
        names::LOGIN_URL,
        Some(json!({"email": "ann@x.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "student");
    assert_eq!(body["user"]["email"], "ann@x.com");
    assert!(body["user"].get("password").is_none());

    let (_, body) = send_json(&app, Method::GET, &names::course_enrollments_url(2), None).await;
    assert_eq!(body["courseId"], 2);
    let emails: Vec<_> = body["enrollments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["email"].as_str().unwrap().to_string())
        .collect();
    assert!(emails.contains(&"ann@x.com".to_string()));
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let (app, _, _) = common::create_test_app().await;
    let body = json!({"name": "Ann", "email": "ann@x.com", "password": "pw"});

    let (status, _) = send_json(&app, Method::POST, &register_url(), Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(&app, Method::POST, &register_url(), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User with this email already exists");
}

#[tokio::test]
async fn registration_without_password_uses_the_default() {
    let (app, _, _) = common::create_test_app().await;

    let (status, _) = send_json(
        &app,
        Method::POST,
        &register_url(),
        Some(json!({"name": "Bo", "email": "bo@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send_json(
        &app,
        Method::POST,
        names::LOGIN_URL,
        Some(json!({"email": "bo@x.com", "password": "123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_fields_are_bad_requests() {
    let (app, _, _) = common::create_test_app().await;

    let cases = [
        (register_url(), json!({"email": "a@x.com"})),
        (names::LOGIN_URL.to_string(), json!({"email": "a@x.com"})),
        (names::faculty_content_url("kaminee@rc.edu"), json!({"title": "T"})),
        (names::QUIZZES_URL.to_string(), json!({"title": "T"})),
        (
            names::QUIZ_RESULTS_URL.to_string(),
            json!({"quizId": 1, "studentEmail": "a@x.com"}),
        ),
    ];

    for (uri, body) in cases {
        let (status, body) = send_json(&app, Method::POST, &uri, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "expected 400 for {uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, _, _) = common::create_test_app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        names::LOGIN_URL,
        Some(json!({"email": "student@rc.edu", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn metadata_only_content_lists_with_empty_locations() {
    let (app, _, _) = common::create_test_app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        &names::faculty_content_url("Kaminee@RC.edu"),
        Some(json!({"title": "T", "courseId": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_i64());

    let (status, body) = send_json(
        &app,
        Method::GET,
        &names::faculty_content_url("kaminee@rc.edu"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["faculty"], "kaminee@rc.edu");
    let item = &body["content"][0];
    assert_eq!(item["title"], "T");
    assert_eq!(item["fileUrl"], "");
    assert_eq!(item["url"], "");
}

#[tokio::test]
async fn uploaded_file_is_served_back() {
    let (app, _, _) = common::create_test_app().await;

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"courseId\"\r\n\r\n\
         1\r\n\
         --{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\
         Content-Type: text/plain\r\n\r\n\
         hello notes\r\n\
         --{boundary}--\r\n"
    );
    let req = Request::builder()
        .method(Method::POST)
        .uri(names::faculty_content_url("kaminee@rc.edu"))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let (_, listing) = send_json(&app, Method::GET, names::CONTENT_URL, None).await;
    let item = &listing["content"][0];
    assert_eq!(item["title"], "notes.txt");
    assert_eq!(item["facultyFolder"], "kaminee_at_rc_edu");
    let file_url = item["fileUrl"].as_str().unwrap().to_string();
    assert!(file_url.starts_with("/files/kaminee_at_rc_edu/"));

    let (status, bytes) = send(&app, Method::GET, &file_url, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"hello notes");
}

#[tokio::test]
async fn unreferenced_files_are_not_served() {
    let (app, _, data_dir) = common::create_test_app().await;
    let owner = data_dir.join("kaminee_at_rc_edu");
    std::fs::create_dir_all(&owner).unwrap();
    std::fs::write(owner.join("secret.txt"), b"secret").unwrap();

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/files/kaminee_at_rc_edu/secret.txt",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "file not found or unauthorized");
}

#[tokio::test]
async fn quiz_flow_records_zero_scores_once_and_exports_csv() {
    let (app, _, _) = common::create_test_app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        names::QUIZZES_URL,
        Some(json!({"courseId": 1, "title": "Warmup", "questions": [{"q": "1+1?"}], "createdBy": "kaminee@rc.edu"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let quiz_id = body["quiz"]["id"].as_i64().unwrap();
    assert_eq!(body["quiz"]["createdBy"], "kaminee@rc.edu");

    let submission = json!({"quizId": quiz_id, "studentEmail": "student@rc.edu", "score": 0, "answers": ["a", "b"]});
    let (status, _) = send_json(&app, Method::POST, names::QUIZ_RESULTS_URL, Some(submission.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(&app, Method::POST, names::QUIZ_RESULTS_URL, Some(submission)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "quiz already submitted");

    let (status, body) = send_json(
        &app,
        Method::GET,
        &format!("{}?studentEmail=student@rc.edu", names::QUIZ_RESULTS_URL),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["score"], 0);
    assert_eq!(body["results"][0]["answers"], json!(["a", "b"]));

    let (status, csv) = send(&app, Method::GET, &names::quiz_export_url(quiz_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let csv = String::from_utf8(csv).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "quizId,studentEmail,score,completedDate,answers");
    assert!(lines[1].ends_with(r#","[""a"",""b""]""#));

    let (_, body) = send_json(&app, Method::GET, names::QUIZZES_URL, None).await;
    assert_eq!(body["quizzes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bad_quiz_id_filter_is_rejected() {
    let (app, _, _) = common::create_test_app().await;
    let (status, _) = send_json(
        &app,
        Method::GET,
        &format!("{}?quizId=seven", names::QUIZ_RESULTS_URL),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn events_are_logged_in_order() {
    let (app, _, _) = common::create_test_app().await;

    send_json(
        &app,
        Method::POST,
        &register_url(),
        Some(json!({"name": "Ann", "email": "ann@x.com", "password": "pw"})),
    )
    .await;
    send_json(
        &app,
        Method::POST,
        &names::faculty_content_url("kaminee@rc.edu"),
        Some(json!({"title": "T", "courseId": 1})),
    )
    .await;

    let (status, body) = send_json(&app, Method::GET, names::LOGS_URL, None).await;
    assert_eq!(status, StatusCode::OK);
    let events: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(events, vec!["add_student", "add_content"]);
    assert_eq!(body[0]["details"]["student"], "ann@x.com");
}

#[tokio::test]
async fn listings_cover_seeded_data() {
    let (app, _, _) = common::create_test_app().await;

    let (_, body) = send_json(&app, Method::GET, names::COURSES_URL, None).await;
    assert_eq!(body["courses"].as_array().unwrap().len(), 4);

    let (_, body) = send_json(&app, Method::GET, names::STUDENTS_URL, None).await;
    assert_eq!(body["students"][0]["email"], "student@rc.edu");

    let (status, _) = send_json(&app, Method::GET, "/api/course/abc/enrollments", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn index_page_carries_the_footer() {
    let (app, _, _) = common::create_test_app().await;

    let (status, bytes) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(bytes).unwrap();
    assert!(page.contains(names::FOOTER_MARKER));

    let (status, _) = send(&app, Method::GET, "/styles.css", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/missing.js", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn registration_store_failure_reports_the_store_message() {
    let db_path = common::create_test_db_path();
    let (app, _, _) = common::create_test_app_on(&db_path).await;

    let raw = libsql::Builder::new_local(&db_path).build().await.unwrap();
    raw.connect()
        .unwrap()
        .execute("DROP TABLE course_enrollments", ())
        .await
        .unwrap();

    let (status, body) = send_json(
        &app,
        Method::POST,
        &register_url(),
        Some(json!({"name": "Ann", "email": "ann@x.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Database error: "), "{message}");
    assert!(message.contains("course_enrollments"), "{message}");

    let (status, _) = send_json(
        &app,
        Method::POST,
        names::LOGIN_URL,
        Some(json!({"email": "ann@x.com", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn quiz_result_event_records_the_normalized_email() {
    let (app, _, _) = common::create_test_app().await;

    let (status, _) = send_json(
        &app,
        Method::POST,
        names::QUIZ_RESULTS_URL,
        Some(json!({"quizId": 3, "studentEmail": "  Student@RC.edu ", "score": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send_json(&app, Method::GET, names::LOGS_URL, None).await;
    let entry = &body[0];
    assert_eq!(entry["event"], "quiz_result");
    assert_eq!(entry["details"]["studentEmail"], "student@rc.edu");
    assert_eq!(entry["details"]["quizId"], 3);
    assert_eq!(entry["details"]["score"], 4);
}
