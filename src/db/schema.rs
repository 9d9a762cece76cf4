// Database schema initialization

use color_eyre::Result;

pub async fn create_schema(conn: &libsql::Connection) -> Result<()> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            email TEXT PRIMARY KEY,
            password TEXT NOT NULL,
            role TEXT NOT NULL,
            name TEXT,
            subjects TEXT
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            faculty TEXT
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS content (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER NOT NULL,
            faculty_email TEXT NOT NULL,
            title TEXT NOT NULL,
            type TEXT,
            description TEXT,
            file_path TEXT,
            url TEXT,
            created_at TEXT NOT NULL
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_content_faculty ON content(faculty_email)",
        (),
    )
    .await?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_content_file_path ON content(file_path)",
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS quizzes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_id INTEGER,
            title TEXT NOT NULL,
            questions TEXT NOT NULL,
            created_by TEXT,
            created_date TEXT NOT NULL
        )
        "#,
        (),
    )
    .await?;

    // One submission per student per quiz
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS quiz_results (
            quiz_id INTEGER NOT NULL,
            student_email TEXT NOT NULL,
            score INTEGER NOT NULL,
            completed_date TEXT NOT NULL,
            answers TEXT NOT NULL,
            PRIMARY KEY (quiz_id, student_email)
        )
        "#,
        (),
    )
    .await?;

    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS course_enrollments (
            student_email TEXT NOT NULL,
            course_id INTEGER NOT NULL,
            PRIMARY KEY (student_email, course_id)
        )
        "#,
        (),
    )
    .await?;

    Ok(())
}
