// Routes
pub const LOGIN_URL: &str = "/api/auth/login";
pub const STUDENTS_URL: &str = "/api/students";
pub const COURSES_URL: &str = "/api/courses";
pub const COURSE_ENROLLMENTS_URL: &str = "/api/course/{course_id}/enrollments";
pub const FACULTY_STUDENTS_URL: &str = "/api/faculty/{faculty_email}/students";
pub const FACULTY_CONTENT_URL: &str = "/api/faculty/{faculty_email}/content";
pub const CONTENT_URL: &str = "/api/content";
pub const FILES_URL: &str = "/files/{owner_dir}/{*file_name}";
pub const QUIZZES_URL: &str = "/api/quizzes";
pub const QUIZ_EXPORT_URL: &str = "/api/quizzes/{quiz_id}/export";
pub const QUIZ_RESULTS_URL: &str = "/api/quiz_results";
pub const LOGS_URL: &str = "/api/logs";

pub fn faculty_students_url(faculty_email: &str) -> String {
    format!("/api/faculty/{faculty_email}/students")
}

pub fn faculty_content_url(faculty_email: &str) -> String {
    format!("/api/faculty/{faculty_email}/content")
}

pub fn course_enrollments_url(course_id: i64) -> String {
    format!("/api/course/{course_id}/enrollments")
}

pub fn quiz_export_url(quiz_id: i64) -> String {
    format!("/api/quizzes/{quiz_id}/export")
}

pub fn quiz_export_file_name(quiz_id: i64) -> String {
    format!("quiz_{quiz_id}_results.csv")
}

// Files under the data directory
pub const DEFAULT_DATABASE_URL: &str = "file:data/app_data.db";
pub const EVENT_LOG_FILE_NAME: &str = "logs.jsonl";

// Pages
pub const INDEX_PAGE: &str = "index.html";
pub const FOOTER_MARKER: &str = "Team VedaNetra";
pub const FOOTER_HTML: &str = r#"<footer class="text-center text-gray-500 text-sm py-4">&copy;Team VedaNetra, 2025 All rights reserved</footer>"#;
