//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Assembling a quiz: resolve topic, serve stored questions, top up via the generator
//!   - The free-form chat passthrough

use rand::seq::SliceRandom;
use tracing::{info, instrument};

use crate::domain::StoredQuestion;
use crate::error::{GenerationError, QuizError};
use crate::protocol::{to_out, QuizOut};
use crate::resolver::resolve_topic;
use crate::state::AppState;

#[instrument(level = "info", skip(state, exclude), fields(exclude_count = exclude.len()))]
pub async fn get_quiz(state: &AppState, user_input: &str, exclude: &[u64]) -> Result<QuizOut, QuizError> {
  let size = state.settings.size;
  let resolved = resolve_topic(user_input, state.catalog())
    .ok_or_else(|| QuizError::TopicNotFound(user_input.to_string()))?;
  let topic_id = resolved.topic.id;
  let subtopic = resolved.subtopic.as_deref();
  info!(target: "quiz", topic = %resolved.topic.name, subtopic = ?subtopic, "Topic resolved");

  let mut all = state.fetch_questions(topic_id, subtopic).await;
  let mut available = not_excluded(&all, exclude);
  info!(target: "quiz", total = all.len(), available = available.len(), "Stored questions");

  if available.len() < size {
    // Every fetched text, excluded ones included, so the model does not repeat them.
    let existing: Vec<String> = all.iter().map(|q| q.text.clone()).collect();
    let needed = size - available.len();

    let generated = state.generator.generate_questions(user_input, needed, &existing).await;
    if !generated.is_empty() {
      let ids = state.save_questions(topic_id, subtopic, generated).await;
      info!(target: "quiz", saved = ids.len(), generator = state.generator.name(), "Stored generated questions");

      all = state.fetch_questions(topic_id, subtopic).await;
      available = not_excluded(&all, exclude);
    }
  }

  let selected: Vec<StoredQuestion> = if available.len() > size {
    let mut rng = rand::thread_rng();
    available.shuffle(&mut rng);
    available.into_iter().take(size).collect()
  } else {
    available
  };

  let questions: Vec<_> = selected.iter().map(to_out).collect();
  Ok(QuizOut { topic: user_input.to_string(), total_questions: questions.len(), questions })
}

fn not_excluded(questions: &[StoredQuestion], exclude: &[u64]) -> Vec<StoredQuestion> {
  questions.iter().filter(|q| !exclude.contains(&q.id)).cloned().collect()
}

#[instrument(level = "info", skip(state, prompt), fields(prompt_len = prompt.len()))]
pub async fn do_chat(state: &AppState, prompt: &str) -> Result<String, GenerationError> {
  let oa = state.openai.as_ref().ok_or(GenerationError::Disabled)?;
  oa.chat_plain(None, prompt, state.settings.temperature).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;
  use std::sync::{Arc, Mutex};

  use async_trait::async_trait;

  use crate::config::QuizConfig;
  use crate::domain::{Difficulty, ParsedOption, ParsedQuestion};
  use crate::generator::{QuestionGenerator, StubGenerator};

  /// Records calls and returns `per_call` questions each time.
  struct RecordingGenerator {
    per_call: usize,
    calls: Mutex<Vec<(String, usize, Vec<String>)>>,
  }

  impl RecordingGenerator {
    fn new(per_call: usize) -> Arc<Self> {
      Arc::new(Self { per_call, calls: Mutex::new(Vec::new()) })
    }
  }

  #[async_trait]
  impl QuestionGenerator for RecordingGenerator {
    async fn generate_questions(&self, topic: &str, count: usize, existing: &[String]) -> Vec<ParsedQuestion> {
      self.calls.lock().unwrap().push((topic.to_string(), count, existing.to_vec()));
      (0..self.per_call)
        .map(|i| {
          ParsedQuestion::new(
            format!("Generated {i}"),
            Difficulty::Easy,
            None,
            vec![ParsedOption { text: "yes".into(), is_correct: true }],
          )
          .unwrap()
        })
        .collect()
    }

    fn name(&self) -> &'static str { "recording" }
  }

  fn state_with(generator: Arc<dyn QuestionGenerator>) -> AppState {
    AppState::with_parts(QuizConfig::default(), generator, None)
  }

  #[tokio::test]
  async fn serves_stored_questions_for_topic() {
    let st = state_with(Arc::new(StubGenerator));
    let quiz = get_quiz(&st, "Java", &[]).await.unwrap();
    assert_eq!(quiz.topic, "Java");
    assert_eq!(quiz.total_questions, 3);
    assert_eq!(quiz.questions.len(), 3);
  }

  #[tokio::test]
  async fn lookup_is_case_insensitive() {
    let st = state_with(Arc::new(StubGenerator));
    let quiz = get_quiz(&st, "jAVA", &[]).await.unwrap();
    assert_eq!(quiz.total_questions, 3);
  }

  #[tokio::test]
  async fn unknown_topic_is_reported() {
    let st = state_with(Arc::new(StubGenerator));
    let err = get_quiz(&st, "NonExistentTopic", &[]).await.unwrap_err();
    assert!(matches!(err, QuizError::TopicNotFound(_)));
    assert!(err.to_string().contains("Topic not found"));
  }

  #[tokio::test]
  async fn excluded_ids_are_filtered_out() {
    let st = state_with(Arc::new(StubGenerator));
    let first = get_quiz(&st, "Java", &[]).await.unwrap();
    let ids: Vec<u64> = first.questions.iter().map(|q| q.id).collect();

    let second = get_quiz(&st, "Java", &ids[..2]).await.unwrap();
    assert_eq!(second.total_questions, 1);
    assert_eq!(second.questions[0].id, ids[2]);
  }

  #[tokio::test]
  async fn singular_subtopic_matches_plural_tag() {
    let st = state_with(Arc::new(StubGenerator));
    let quiz = get_quiz(&st, "Java record", &[]).await.unwrap();
    assert_eq!(quiz.topic, "Java record");
    assert_eq!(quiz.total_questions, 3);
  }

  #[tokio::test]
  async fn tops_up_with_generated_questions_and_tags_them() {
    let generator = RecordingGenerator::new(2);
    let st = state_with(generator.clone());
    let java = st.catalog().iter().find(|t| t.name == "Java").unwrap().id;
    let seeded: Vec<u64> = st.fetch_questions(java, None).await.iter().map(|q| q.id).collect();

    let quiz = get_quiz(&st, "Java records", &seeded[..1]).await.unwrap();
    assert_eq!(quiz.total_questions, 4);

    let calls = generator.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    let (topic, count, existing) = &calls[0];
    assert_eq!(topic, "Java records");
    assert_eq!(*count, 3);
    // excluded question text is still passed as a hint
    assert_eq!(existing.len(), 3);

    let tagged = st.fetch_questions(java, Some("records")).await;
    assert_eq!(tagged.len(), 5);
  }

  #[tokio::test]
  async fn no_generation_when_enough_questions_and_selection_is_capped() {
    let generator = RecordingGenerator::new(4);
    let st = state_with(generator.clone());

    // first round tops React up from 3 to 7 stored questions
    let first = get_quiz(&st, "React", &[]).await.unwrap();
    assert_eq!(first.total_questions, 5);
    assert_eq!(generator.calls.lock().unwrap().len(), 1);

    let second = get_quiz(&st, "React", &[]).await.unwrap();
    assert_eq!(second.total_questions, 5);
    assert_eq!(generator.calls.lock().unwrap().len(), 1);
    let distinct: HashSet<u64> = second.questions.iter().map(|q| q.id).collect();
    assert_eq!(distinct.len(), 5);
  }

  #[tokio::test]
  async fn unknown_subtopic_yields_empty_quiz_when_generation_fails() {
    let st = state_with(Arc::new(StubGenerator));
    let quiz = get_quiz(&st, "Java streams", &[]).await.unwrap();
    assert_eq!(quiz.total_questions, 0);
  }

  #[tokio::test]
  async fn chat_requires_a_model() {
    let st = state_with(Arc::new(StubGenerator));
    assert!(matches!(do_chat(&st, "hi").await, Err(GenerationError::Disabled)));
  }
}
