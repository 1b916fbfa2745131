//! Turning raw model output into validated questions.
//!
//! Format routing: the delimited format is tried first when its marker is present, JSON is the
//! fallback. Each format is a strategy returning a result; the first one producing at least one
//! valid question wins. Nothing here fails: an unusable response yields an empty vector.

pub mod delimited;
pub mod extract;
pub mod json;
pub mod validate;

use tracing::{debug, error, info, instrument, warn};

use crate::domain::ParsedQuestion;
use crate::error::IngestError;
use crate::util::preview;

/// Literal that selects the delimited parser.
pub const DELIMITED_MARKER: &str = "### QUESTION";

type Strategy = fn(&str) -> Result<Vec<ParsedQuestion>, IngestError>;

#[instrument(level = "debug", skip(raw), fields(raw_len = raw.len()))]
pub fn parse_response(raw: &str) -> Vec<ParsedQuestion> {
  for (name, strategy) in strategies_for(raw) {
    match strategy(raw) {
      Ok(parsed) => {
        let found = parsed.len();
        let valid = validate::retain_valid(parsed);
        if !valid.is_empty() {
          info!(target: "ingest", format = name, found, valid = valid.len(), "Parsed questions");
          return valid;
        }
        debug!(target: "ingest", format = name, found, "No valid questions from format");
      }
      Err(e @ IngestError::Extraction(_)) => {
        error!(target: "ingest", format = name, error = %e, head = %preview(raw, 200), "Could not extract content");
      }
      Err(e) => warn!(target: "ingest", format = name, error = %e, "Format attempt failed"),
    }
  }
  Vec::new()
}

fn strategies_for(raw: &str) -> Vec<(&'static str, Strategy)> {
  let mut out: Vec<(&'static str, Strategy)> = Vec::with_capacity(2);
  if raw.contains(DELIMITED_MARKER) {
    out.push(("delimited", parse_delimited_strategy));
  }
  out.push(("json", parse_json_strategy));
  out
}

fn parse_delimited_strategy(raw: &str) -> Result<Vec<ParsedQuestion>, IngestError> {
  Ok(delimited::parse_delimited(raw))
}

fn parse_json_strategy(raw: &str) -> Result<Vec<ParsedQuestion>, IngestError> {
  let payload = extract::extract_json(raw)?;
  json::parse_json_questions(payload)
}

#[cfg(test)]
mod tests {
  use super::*;

  const JSON_ONE: &str = r#"{
    "questions": [{
      "question": "JSON format test",
      "options": ["A", "B", "C", "D"],
      "correct_index": 0,
      "difficulty": "easy",
      "explanation": "Testing JSON fallback"
    }]
  }"#;

  #[test]
  fn prefers_delimited_format() {
    let raw = "### QUESTION 1 ###\nDIFFICULTY: easy\nQUESTION: Test question\nOPTION: Answer [CORRECT]\nOPTION: Wrong\nEXPLANATION: Test explanation\n";
    let qs = parse_response(raw);
    assert_eq!(qs.len(), 1);
    assert_eq!(qs[0].text, "Test question");
  }

  #[test]
  fn goes_straight_to_json_without_marker() {
    let qs = parse_response(JSON_ONE);
    assert_eq!(qs.len(), 1);
    assert_eq!(qs[0].text, "JSON format test");
  }

  #[test]
  fn fenced_json_parses_like_bare_json() {
    let tagged = format!("```json\n{JSON_ONE}\n```");
    let bare = format!("```\n{JSON_ONE}\n```");
    assert_eq!(parse_response(&tagged), parse_response(JSON_ONE));
    assert_eq!(parse_response(&bare), parse_response(JSON_ONE));
  }

  #[test]
  fn malformed_delimited_falls_back_to_json() {
    let raw = format!("### QUESTION 1 ###\nnothing useful here\n\n{JSON_ONE}");
    let qs = parse_response(&raw);
    assert_eq!(qs.len(), 1);
    assert_eq!(qs[0].text, "JSON format test");
  }

  #[test]
  fn json_with_code_braces_is_not_truncated() {
    let raw = r#"Here you go:
    {"questions": [{
      "question": "What does this return?\n```java\npublic int add(int a, int b) {\n  return a + b;\n}\n```",
      "options": ["5", "23"],
      "correct_index": 0,
      "difficulty": "easy"
    }]}
    Enjoy {"#;
    let qs = parse_response(raw);
    assert_eq!(qs.len(), 1);
    assert!(qs[0].text.contains("return a + b;\n}"));
  }

  #[test]
  fn unusable_input_yields_empty() {
    assert!(parse_response("").is_empty());
    assert!(parse_response("This is not JSON").is_empty());
    assert!(parse_response(r#"{"questions": ["#).is_empty());
    assert!(parse_response("### QUESTION 1 ###\ngarbage").is_empty());
  }
}
