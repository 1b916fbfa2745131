//! Last gate before parsed questions leave the pipeline.

use tracing::warn;

use crate::domain::ParsedQuestion;

/// Accept a question with non-blank text. Difficulty is always set once parsed.
///
/// Option and correct-option counts are not enforced; a count other than one is only logged.
pub fn is_acceptable(q: &ParsedQuestion) -> bool {
  if q.text.trim().is_empty() {
    warn!(target: "ingest", "Question has empty text");
    return false;
  }
  let correct = q.correct_count();
  if correct != 1 {
    warn!(target: "ingest", correct, options = q.options.len(), "Question does not have exactly one correct option; keeping it");
  }
  true
}

pub fn retain_valid(questions: Vec<ParsedQuestion>) -> Vec<ParsedQuestion> {
  questions.into_iter().filter(is_acceptable).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, ParsedOption};

  fn question(text: &str, correct: &[bool]) -> ParsedQuestion {
    let options = correct
      .iter()
      .enumerate()
      .map(|(i, c)| ParsedOption { text: format!("o{i}"), is_correct: *c })
      .collect();
    ParsedQuestion::new(text.into(), Difficulty::Easy, None, options).unwrap()
  }

  #[test]
  fn blank_text_is_rejected() {
    assert!(!is_acceptable(&question("   \n", &[true])));
    assert!(is_acceptable(&question("Q?", &[true, false])));
  }

  #[test]
  fn correct_count_is_not_enforced() {
    assert!(is_acceptable(&question("none", &[false, false])));
    assert!(is_acceptable(&question("two", &[true, true])));
  }

  #[test]
  fn retain_valid_filters_in_order() {
    let kept = retain_valid(vec![question("a", &[true]), question(" ", &[true]), question("b", &[true])]);
    let texts: Vec<_> = kept.iter().map(|q| q.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "b"]);
  }
}
