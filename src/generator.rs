//! Question generation capability and its implementations.
//!
//! Quiz assembly only sees `QuestionGenerator`; which implementation backs it is decided once at
//! startup from configuration. Generators never fail towards the caller: any problem is logged
//! and reported as "no questions this round".

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{GeneratorKind, Prompts, QuizSettings};
use crate::domain::ParsedQuestion;
use crate::ingest::parse_response;
use crate::openai::OpenAI;
use crate::util::{fill_template, preview};

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
  /// Generate up to `count` questions about `topic` that differ from `existing`.
  async fn generate_questions(
    &self,
    topic: &str,
    count: usize,
    existing: &[String],
  ) -> Vec<ParsedQuestion>;

  fn name(&self) -> &'static str;
}

/// Generator that never produces anything. Quizzes are served from stored questions only.
pub struct StubGenerator;

#[async_trait]
impl QuestionGenerator for StubGenerator {
  async fn generate_questions(&self, topic: &str, count: usize, _existing: &[String]) -> Vec<ParsedQuestion> {
    debug!(target: "quiz", %topic, count, "Stub generator: no questions generated");
    Vec::new()
  }

  fn name(&self) -> &'static str { "stub" }
}

/// Model-backed generator: one chat call, then the ingest pipeline.
pub struct OpenAiGenerator {
  client: OpenAI,
  prompts: Prompts,
  settings: QuizSettings,
}

impl OpenAiGenerator {
  pub fn new(client: OpenAI, prompts: Prompts, settings: QuizSettings) -> Self {
    Self { client, prompts, settings }
  }
}

#[async_trait]
impl QuestionGenerator for OpenAiGenerator {
  #[instrument(level = "info", skip(self, existing), fields(model = %self.client.model, existing = existing.len()))]
  async fn generate_questions(&self, topic: &str, count: usize, existing: &[String]) -> Vec<ParsedQuestion> {
    if count == 0 {
      return Vec::new();
    }
    info!(target: "quiz", %topic, count, "Generating questions");

    let user = build_generation_prompt(&self.prompts, topic, count, existing, self.settings.max_exclusion_hints);
    let raw = match self.client.chat_plain(Some(&self.prompts.system), &user, self.settings.temperature).await {
      Ok(raw) => raw,
      Err(e) => {
        error!(target: "quiz", %topic, error = %e, "Model call failed; no questions generated");
        return Vec::new();
      }
    };
    debug!(target: "quiz", raw_len = raw.len(), head = %preview(&raw, 300), "Raw model response");

    let questions = parse_response(&raw);
    info!(target: "quiz", %topic, requested = count, parsed = questions.len(), "Generation round finished");
    questions
  }

  fn name(&self) -> &'static str { "openai" }
}

/// Pick the generator implementation for this process.
pub fn build_generator(
  kind: GeneratorKind,
  client: Option<OpenAI>,
  prompts: &Prompts,
  settings: &QuizSettings,
) -> Arc<dyn QuestionGenerator> {
  match (kind, client) {
    (GeneratorKind::OpenAi, Some(client)) => {
      Arc::new(OpenAiGenerator::new(client, prompts.clone(), settings.clone()))
    }
    (GeneratorKind::OpenAi, None) => {
      warn!(target: "codepop_backend", "QUIZ_GENERATOR=openai but no OPENAI_API_KEY; using stub generator");
      Arc::new(StubGenerator)
    }
    (GeneratorKind::Stub, _) => Arc::new(StubGenerator),
  }
}

/// 40% easy and 20% hard (both rounded up); medium takes the rest.
pub fn difficulty_split(count: usize) -> (usize, usize, usize) {
  let easy = (count * 2).div_ceil(5);
  let hard = count.div_ceil(5);
  let medium = count.saturating_sub(easy + hard);
  (easy, medium, hard)
}

pub fn build_generation_prompt(
  prompts: &Prompts,
  topic: &str,
  count: usize,
  existing: &[String],
  max_hints: usize,
) -> String {
  let (easy, medium, hard) = difficulty_split(count);

  let mut avoid = String::new();
  if !existing.is_empty() && max_hints > 0 {
    avoid.push_str("\nIMPORTANT: Avoid generating questions similar to these existing ones:\n");
    for text in existing.iter().take(max_hints) {
      avoid.push_str("- ");
      avoid.push_str(text);
      avoid.push('\n');
    }
  }

  fill_template(
    &prompts.user_template,
    &[
      ("count", &count.to_string()),
      ("topic", topic),
      ("easy", &easy.to_string()),
      ("medium", &medium.to_string()),
      ("hard", &hard.to_string()),
      ("avoid", &avoid),
    ],
  )
}
