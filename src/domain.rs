//! Domain models: difficulty, parsed (not yet stored) questions, catalog topics and stored questions.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::IngestError;

/// Difficulty level of a question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  /// Map a free-form label onto a level. Case-insensitive; unknown labels fall back to MEDIUM.
  pub fn normalize(label: &str) -> Difficulty {
    match label.trim().to_lowercase().as_str() {
      "easy" => Difficulty::Easy,
      "medium" => Difficulty::Medium,
      "hard" => Difficulty::Hard,
      other => {
        warn!(target: "ingest", difficulty = %other, "Unknown difficulty, defaulting to MEDIUM");
        Difficulty::Medium
      }
    }
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedOption {
  pub text: String,
  pub is_correct: bool,
}

/// A question recovered from model output, not yet tagged with a topic or stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedQuestion {
  pub text: String,
  pub difficulty: Difficulty,
  pub explanation: Option<String>,
  pub options: Vec<ParsedOption>,
}

impl ParsedQuestion {
  /// Fails when `options` is empty; a question without answers is never constructed.
  pub fn new(
    text: String,
    difficulty: Difficulty,
    explanation: Option<String>,
    options: Vec<ParsedOption>,
  ) -> Result<Self, IngestError> {
    if options.is_empty() {
      return Err(IngestError::Field("question has no options".into()));
    }
    Ok(Self { text, difficulty, explanation, options })
  }

  pub fn correct_count(&self) -> usize {
    self.options.iter().filter(|o| o.is_correct).count()
  }
}

/// Known topic. Names are unique case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
  pub id: u64,
  pub name: String,
  pub category: String,
}

/// Outcome of resolving a free-text query against the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTopic {
  pub topic: CatalogEntry,
  pub subtopic: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StoredOption {
  pub id: u64,
  pub text: String,
  pub is_correct: bool,
}

/// Question persisted in the in-memory store.
#[derive(Clone, Debug)]
pub struct StoredQuestion {
  pub id: u64,
  pub topic_id: u64,
  pub text: String,
  pub subtopic: Option<String>, // free-form refinement, e.g. "records", "hooks"
  pub difficulty: Difficulty,
  pub explanation: Option<String>,
  pub options: Vec<StoredOption>,
}

impl StoredQuestion {
  /// Case-insensitive containment of `needle` in the stored subtopic.
  /// "record" matches a stored "records"; questions without a subtopic never match.
  pub fn subtopic_contains(&self, needle: &str) -> bool {
    match &self.subtopic {
      Some(s) => s.to_lowercase().contains(&needle.to_lowercase()),
      None => false,
    }
  }
}
