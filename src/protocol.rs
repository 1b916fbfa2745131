//! Public protocol structs for HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Difficulty, StoredQuestion};
use crate::error::QuizError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOut {
    /// The query as the user typed it.
    pub topic: String,
    pub total_questions: usize,
    pub questions: Vec<QuestionOut>,
}

#[derive(Debug, Serialize)]
pub struct QuestionOut {
    pub id: u64,
    pub text: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub options: Vec<OptionOut>,
}

#[derive(Debug, Serialize)]
pub struct OptionOut {
    pub id: u64,
    pub text: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}

/// Convert a stored question to the public DTO.
pub fn to_out(q: &StoredQuestion) -> QuestionOut {
    QuestionOut {
        id: q.id,
        text: q.text.clone(),
        difficulty: q.difficulty,
        explanation: q.explanation.clone(),
        options: q
            .options
            .iter()
            .map(|o| OptionOut { id: o.id, text: o.text.clone(), is_correct: o.is_correct })
            .collect(),
    }
}

//
// HTTP request/response DTOs
//

/// Query key carrying ids the client has already seen.
pub const EXCLUDE_PARAM: &str = "excludeQuestionIds";

/// Collect ids from every `excludeQuestionIds` pair. Both `?k=1,2` and `?k=1&k=2` are accepted.
/// Empty segments are ignored; anything non-numeric is rejected.
pub fn parse_exclusions(pairs: &[(String, String)]) -> Result<Vec<u64>, QuizError> {
    pairs
        .iter()
        .filter(|(k, _)| k == EXCLUDE_PARAM)
        .flat_map(|(_, v)| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| QuizError::InvalidRequest(format!("invalid question id '{s}'")))
        })
        .collect()
}

#[derive(Deserialize)]
pub struct ChatIn {
    pub prompt: String,
}
#[derive(Serialize)]
pub struct ChatOut {
    pub response: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
    /// HTTP status code as a string, e.g. `"404"`.
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn exclusions_parse_and_reject() {
        assert_eq!(parse_exclusions(&[]).unwrap(), Vec::<u64>::new());
        assert_eq!(parse_exclusions(&pairs(&[(EXCLUDE_PARAM, "")])).unwrap(), Vec::<u64>::new());
        assert_eq!(parse_exclusions(&pairs(&[(EXCLUDE_PARAM, "1, 2,,3")])).unwrap(), vec![1, 2, 3]);
        assert!(matches!(
            parse_exclusions(&pairs(&[(EXCLUDE_PARAM, "1,x")])),
            Err(QuizError::InvalidRequest(_))
        ));
    }

    #[test]
    fn repeated_exclusion_keys_are_merged() {
        let q = pairs(&[(EXCLUDE_PARAM, "1"), ("other", "9"), (EXCLUDE_PARAM, "2,3")]);
        assert_eq!(parse_exclusions(&q).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn quiz_serializes_with_frontend_field_names() {
        let out = QuizOut {
            topic: "Java".into(),
            total_questions: 1,
            questions: vec![QuestionOut {
                id: 7,
                text: "Q".into(),
                difficulty: Difficulty::Easy,
                explanation: None,
                options: vec![OptionOut { id: 8, text: "A".into(), is_correct: true }],
            }],
        };
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["totalQuestions"], 1);
        assert_eq!(v["questions"][0]["difficulty"], "EASY");
        assert_eq!(v["questions"][0]["options"][0]["isCorrect"], true);
        assert!(v["questions"][0].get("explanation").is_none());
    }
}
