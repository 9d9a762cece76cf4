// Request payloads accepted by the JSON API

use serde::Deserialize;
use serde_json::Value;

use crate::db::JsonList;

/// Deserialize an optional integer sent either as a JSON number or as a numeric
/// string. Form-style clients send every value as a string.
fn deserialize_opt_int<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    struct Vis;

    impl<'de> serde::de::Visitor<'de> for Vis {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("integer, numeric string or null")
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: serde::Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v).map(Some).map_err(E::custom)
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                Ok(Some(v as i64))
            } else {
                Err(E::custom(format!("expected an integer, got {v}")))
            }
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
            parse_opt_int(v).map_err(E::custom)
        }
    }

    d.deserialize_option(Vis)
}

/// Parse a form or query value. Blank means absent.
pub fn parse_opt_int(value: &str) -> Result<Option<i64>, std::num::ParseIntError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct AddStudentBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// JSON form of a content item: a link or plain text entry, no file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBody {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_int")]
    pub course_id: Option<i64>,
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizBody {
    #[serde(default, deserialize_with = "deserialize_opt_int")]
    pub course_id: Option<i64>,
    pub title: Option<String>,
    pub questions: Option<JsonList<Value>>,
    pub created_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultBody {
    #[serde(default, deserialize_with = "deserialize_opt_int")]
    pub quiz_id: Option<i64>,
    pub student_email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_int")]
    pub score: Option<i64>,
    pub answers: Option<JsonList<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsQuery {
    pub student_email: Option<String>,
    pub quiz_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_id_accepts_numbers_and_numeric_strings() {
        let body: ContentBody = serde_json::from_str(r#"{"title":"T","courseId":1}"#).unwrap();
        assert_eq!(body.course_id, Some(1));

        let body: ContentBody = serde_json::from_str(r#"{"title":"T","courseId":"2"}"#).unwrap();
        assert_eq!(body.course_id, Some(2));

        let body: ContentBody = serde_json::from_str(r#"{"title":"T"}"#).unwrap();
        assert_eq!(body.course_id, None);

        let body: ContentBody = serde_json::from_str(r#"{"courseId":null}"#).unwrap();
        assert_eq!(body.course_id, None);
    }

    #[test]
    fn zero_score_survives_deserialization() {
        let body: QuizResultBody =
            serde_json::from_str(r#"{"quizId":7,"studentEmail":"a@x.com","score":0}"#).unwrap();
        assert_eq!(body.score, Some(0));
        assert!(body.answers.is_none());
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        assert!(serde_json::from_str::<QuizResultBody>(r#"{"quizId":"seven"}"#).is_err());
        assert!(serde_json::from_str::<QuizResultBody>(r#"{"score":2.5}"#).is_err());
    }

    #[test]
    fn questions_must_be_a_list() {
        let body: QuizBody =
            serde_json::from_str(r#"{"title":"T","questions":[{"q":"1+1?"}]}"#).unwrap();
        assert_eq!(body.questions.unwrap().len(), 1);
        assert!(serde_json::from_str::<QuizBody>(r#"{"questions":"nope"}"#).is_err());
    }
}
