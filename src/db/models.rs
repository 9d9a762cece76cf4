// Database model structs

use std::{fmt, str::FromStr};

use color_eyre::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A list column persisted as JSON text.
///
/// Encoding and decoding only happen at the store boundary; everywhere else the
/// list is structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonList<T>(pub Vec<T>);

impl<T> Default for JsonList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> JsonList<T> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> From<Vec<T>> for JsonList<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}

impl<T: Serialize> JsonList<T> {
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl<T: DeserializeOwned> JsonList<T> {
    pub fn decode(text: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    /// Missing, empty or malformed columns decode to an empty list.
    pub fn decode_or_empty(text: Option<&str>) -> Self {
        match text {
            Some(text) if !text.trim().is_empty() => Self::decode(text).unwrap_or_else(|e| {
                tracing::warn!("could not decode list column: {e}");
                Self::default()
            }),
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Faculty => "faculty",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "student" => Ok(Role::Student),
            "faculty" => Ok(Role::Faculty),
            other => Err(color_eyre::eyre::eyre!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRow {
    pub email: String,
    pub role: String,
    pub name: Option<String>,
    pub subjects: Option<String>,
}

/// A user as returned to callers; the stored secret never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub email: String,
    pub role: Role,
    pub name: String,
    pub subjects: JsonList<i64>,
}

impl TryFrom<UserRow> for User {
    type Error = color_eyre::Report;

    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            role: row.role.parse()?,
            name: row.name.unwrap_or_default(),
            subjects: JsonList::decode_or_empty(row.subjects.as_deref()),
            email: row.email,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollee {
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub faculty: Option<String>,
}

/// Which content items a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentFilter {
    All,
    ByFaculty(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContent {
    pub course_id: i64,
    pub faculty_email: String,
    pub title: String,
    pub kind: String,
    pub description: String,
    pub file_path: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContentRow {
    pub id: i64,
    pub course_id: i64,
    pub faculty_email: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizRow {
    pub id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub questions: String,
    pub created_by: Option<String>,
    pub created_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub questions: JsonList<serde_json::Value>,
    pub created_by: Option<String>,
    pub created_date: String,
}

impl From<QuizRow> for Quiz {
    fn from(row: QuizRow) -> Self {
        Quiz {
            id: row.id,
            course_id: row.course_id,
            title: row.title,
            questions: JsonList::decode_or_empty(Some(&row.questions)),
            created_by: row.created_by,
            created_date: row.created_date,
        }
    }
}

/// Which quiz results a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultFilter {
    All,
    ByStudent(String),
    ByQuiz(i64),
}

/// A stored quiz result with `answers` still in its encoded text form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuizResultRow {
    pub quiz_id: i64,
    pub student_email: String,
    pub score: i64,
    pub completed_date: String,
    pub answers: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub quiz_id: i64,
    pub student_email: String,
    pub score: i64,
    pub completed_date: String,
    pub answers: JsonList<serde_json::Value>,
}

impl From<QuizResultRow> for QuizResult {
    fn from(row: QuizResultRow) -> Self {
        QuizResult {
            answers: JsonList::decode_or_empty(Some(&row.answers)),
            quiz_id: row.quiz_id,
            student_email: row.student_email,
            score: row.score,
            completed_date: row.completed_date,
        }
    }
}
