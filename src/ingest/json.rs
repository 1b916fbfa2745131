//! Structured (JSON) question format, kept as a fallback for older prompts and stray responses.
//!
//! Schema: `{"questions": [{"question", "options", "correct_index", "difficulty", "explanation"?}]}`

use serde_json::Value;
use tracing::warn;

use crate::domain::{Difficulty, ParsedOption, ParsedQuestion};
use crate::error::IngestError;

const QUESTIONS_FIELD: &str = "questions";

/// Parse a balanced JSON object into questions.
///
/// A broken element is skipped; a missing or non-array `questions` field fails the whole object.
pub fn parse_json_questions(payload: &str) -> Result<Vec<ParsedQuestion>, IngestError> {
  let root: Value = serde_json::from_str(payload)
    .map_err(|e| IngestError::Structure(format!("invalid JSON: {e}")))?;

  let items = root
    .get(QUESTIONS_FIELD)
    .and_then(Value::as_array)
    .ok_or_else(|| IngestError::Structure(format!("missing '{QUESTIONS_FIELD}' array")))?;

  let mut out = Vec::with_capacity(items.len());
  for (idx, item) in items.iter().enumerate() {
    match parse_item(item) {
      Ok(q) => out.push(q),
      Err(e) => warn!(target: "ingest", index = idx, error = %e, "Skipping JSON question"),
    }
  }
  Ok(out)
}

fn parse_item(node: &Value) -> Result<ParsedQuestion, IngestError> {
  let text = str_field(node, "question")?.to_string();
  let difficulty = Difficulty::normalize(str_field(node, "difficulty")?);
  let explanation = node
    .get("explanation")
    .and_then(Value::as_str)
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_string);

  let raw_options = node
    .get("options")
    .and_then(Value::as_array)
    .ok_or_else(|| IngestError::Field("'options' must be an array".into()))?;
  let correct_index = index_field(node, "correct_index")?;
  if correct_index >= raw_options.len() {
    return Err(IngestError::Field(format!(
      "correct_index {} out of range for {} options",
      correct_index,
      raw_options.len()
    )));
  }

  let options = raw_options
    .iter()
    .enumerate()
    .map(|(i, v)| {
      Ok(ParsedOption { text: option_text(v)?, is_correct: i == correct_index })
    })
    .collect::<Result<Vec<_>, IngestError>>()?;

  ParsedQuestion::new(text, difficulty, explanation, options)
}

fn str_field<'a>(node: &'a Value, key: &str) -> Result<&'a str, IngestError> {
  node
    .get(key)
    .and_then(Value::as_str)
    .ok_or_else(|| IngestError::Field(format!("'{key}' must be a string")))
}

// Models sometimes quote the index ("0"); accept that too.
fn index_field(node: &Value, key: &str) -> Result<usize, IngestError> {
  let parsed = match node.get(key) {
    Some(Value::Number(n)) => n.as_u64().map(|n| n as usize),
    Some(Value::String(s)) => s.trim().parse::<usize>().ok(),
    _ => None,
  };
  parsed.ok_or_else(|| IngestError::Field(format!("'{key}' must be a non-negative integer")))
}

// Options like [4, 22, true] are rendered as their JSON text.
fn option_text(v: &Value) -> Result<String, IngestError> {
  match v {
    Value::String(s) => Ok(s.clone()),
    Value::Number(_) | Value::Bool(_) => Ok(v.to_string()),
    _ => Err(IngestError::Field("option must be a scalar".into())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_every_well_formed_question() {
    let payload = r#"{
      "questions": [
        {
          "question": "What is Java?",
          "options": ["A language", "A drink", "An island", "A framework"],
          "correct_index": 0,
          "difficulty": "easy",
          "explanation": "Java is a programming language"
        },
        {
          "question": "What does `System.out.println(\"Hello\");` do?",
          "options": ["Prints Hello", "Throws error"],
          "correct_index": 1,
          "difficulty": "HARD"
        }
      ]
    }"#;

    let qs = parse_json_questions(payload).unwrap();
    assert_eq!(qs.len(), 2);

    assert_eq!(qs[0].text, "What is Java?");
    assert_eq!(qs[0].difficulty, Difficulty::Easy);
    assert_eq!(qs[0].explanation.as_deref(), Some("Java is a programming language"));
    assert_eq!(qs[0].options.len(), 4);
    assert!(qs[0].options[0].is_correct);
    assert_eq!(qs[0].correct_count(), 1);

    assert!(qs[1].text.contains("System.out.println(\"Hello\");"));
    assert_eq!(qs[1].difficulty, Difficulty::Hard);
    assert_eq!(qs[1].explanation, None);
    assert!(!qs[1].options[0].is_correct);
    assert!(qs[1].options[1].is_correct);
  }

  #[test]
  fn broken_elements_are_skipped_individually() {
    let payload = r#"{"questions": [
      {"options": ["a"], "correct_index": 0, "difficulty": "easy"},
      {"question": "ok", "options": ["a", "b"], "correct_index": 1, "difficulty": "medium"},
      {"question": "bad index", "options": ["a"], "correct_index": 3, "difficulty": "easy"},
      {"question": "no options", "options": [], "correct_index": 0, "difficulty": "easy"},
      {"question": "options not array", "options": "a", "correct_index": 0, "difficulty": "easy"},
      {"question": "no difficulty", "options": ["a"], "correct_index": 0}
    ]}"#;

    let qs = parse_json_questions(payload).unwrap();
    assert_eq!(qs.len(), 1);
    assert_eq!(qs[0].text, "ok");
  }

  #[test]
  fn lenient_scalars() {
    let payload = r#"{"questions": [
      {"question": "2+2?", "options": [4, 22], "correct_index": "0", "difficulty": "weird"}
    ]}"#;
    let qs = parse_json_questions(payload).unwrap();
    assert_eq!(qs[0].options[0].text, "4");
    assert!(qs[0].options[0].is_correct);
    assert_eq!(qs[0].difficulty, Difficulty::Medium);
  }

  #[test]
  fn missing_question_list_fails_the_object() {
    assert!(matches!(parse_json_questions(r#"{"items": []}"#), Err(IngestError::Structure(_))));
    assert!(matches!(parse_json_questions(r#"{"questions": {}}"#), Err(IngestError::Structure(_))));
    assert!(matches!(parse_json_questions(r#"{"questions": [,]}"#), Err(IngestError::Structure(_))));
  }

  #[test]
  fn empty_list_is_not_an_error() {
    assert!(parse_json_questions(r#"{"questions": []}"#).unwrap().is_empty());
  }
}
