//! Delimited-block question format: the primary contract with the generator.
//!
//! ~~~text
//! ### QUESTION 1 ###
//! DIFFICULTY: easy
//! QUESTION: What does this print?
//! ```java
//! System.out.println("hi");
//! ```
//! OPTION: hi [CORRECT]
//! OPTION: nothing
//! EXPLANATION: println writes its argument.
//! ~~~
//!
//! Nothing needs escaping, so code survives verbatim. The number in the heading is only a
//! separator; blocks are taken in textual order.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::domain::{Difficulty, ParsedOption, ParsedQuestion};
use crate::error::IngestError;

static HEADING_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"###\s*QUESTION\s+\d+\s*###").expect("valid regex"));

const DIFFICULTY_PREFIX: &str = "DIFFICULTY:";
const QUESTION_PREFIX: &str = "QUESTION:";
const OPTION_PREFIX: &str = "OPTION:";
const EXPLANATION_PREFIX: &str = "EXPLANATION:";
const CORRECT_MARKER: &str = "[CORRECT]";

/// Parse every block after a `### QUESTION n ###` heading. Text before the first heading is ignored.
/// Incomplete blocks are logged and dropped.
pub fn parse_delimited(raw: &str) -> Vec<ParsedQuestion> {
  let headings: Vec<_> = HEADING_RE.find_iter(raw).collect();
  let mut out = Vec::with_capacity(headings.len());

  for (i, heading) in headings.iter().enumerate() {
    let end = headings.get(i + 1).map(|next| next.start()).unwrap_or(raw.len());
    match parse_block(&raw[heading.end()..end]) {
      Ok(q) => out.push(q),
      Err(e) => warn!(target: "ingest", block = i + 1, error = %e, "Skipping delimited block"),
    }
  }
  out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Active {
  None,
  Difficulty,
  Question,
  Option,
  Explanation,
}

fn parse_block(block: &str) -> Result<ParsedQuestion, IngestError> {
  let mut active = Active::None;
  let mut difficulty: Option<String> = None;
  let mut question = String::new();
  let mut explanation = String::new();
  let mut options = Vec::new();

  for line in block.lines() {
    if line.trim().is_empty() {
      continue;
    }
    // Prefixes only count at column 0; indented lines belong to code in the active field.
    let head = line.strip_suffix('\r').unwrap_or(line);

    if let Some(rest) = head.strip_prefix(DIFFICULTY_PREFIX) {
      active = Active::Difficulty;
      difficulty = Some(rest.trim().to_lowercase());
    } else if let Some(rest) = head.strip_prefix(QUESTION_PREFIX) {
      active = Active::Question;
      question = rest.trim().to_string();
    } else if let Some(rest) = head.strip_prefix(OPTION_PREFIX) {
      active = Active::Option;
      let is_correct = rest.contains(CORRECT_MARKER);
      let text = rest.replace(CORRECT_MARKER, "").trim().to_string();
      options.push(ParsedOption { text, is_correct });
    } else if let Some(rest) = head.strip_prefix(EXPLANATION_PREFIX) {
      active = Active::Explanation;
      explanation = rest.trim().to_string();
    } else {
      // Continuation keeps the raw line, indentation included.
      match active {
        Active::Question => push_line(&mut question, line),
        Active::Explanation => push_line(&mut explanation, line),
        Active::None | Active::Difficulty | Active::Option => {}
      }
    }
  }

  let difficulty = match difficulty.as_deref() {
    Some(d) if !d.is_empty() => Difficulty::normalize(d),
    _ => return Err(IngestError::Field("missing DIFFICULTY".into())),
  };
  let text = question.trim_start_matches('\n').trim_end().to_string();
  if text.trim().is_empty() {
    return Err(IngestError::Field("missing QUESTION".into()));
  }
  let explanation = explanation.trim_start_matches('\n').trim_end().to_string();
  let explanation = if explanation.trim().is_empty() { None } else { Some(explanation) };

  ParsedQuestion::new(text, difficulty, explanation, options)
}

fn push_line(buf: &mut String, line: &str) {
  buf.push('\n');
  buf.push_str(line);
}
