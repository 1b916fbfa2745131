//! Application state: topic catalog, in-memory question store, and the question generator.
//!
//! This module owns:
//!   - the catalog (built-in topics + TOML extras), fixed after startup
//!   - stored questions (seeded, then grown by generation rounds)
//!   - the generator selected from configuration
//!   - an optional OpenAI client for the chat passthrough

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::config::{load_quiz_config_from_env, GeneratorKind, QuizConfig, QuizSettings};
use crate::domain::{CatalogEntry, ParsedQuestion, StoredOption, StoredQuestion};
use crate::generator::{build_generator, QuestionGenerator};
use crate::openai::OpenAI;
use crate::seeds::{seed_catalog, seed_questions};

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<Vec<CatalogEntry>>,
    questions: Arc<RwLock<Vec<StoredQuestion>>>,
    next_id: Arc<AtomicU64>,
    pub generator: Arc<dyn QuestionGenerator>,
    pub openai: Option<OpenAI>,
    pub settings: QuizSettings,
}

impl AppState {
    /// Build state from env: load config, init OpenAI, pick the generator, seed the store.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg = load_quiz_config_from_env().unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "codepop_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "codepop_backend", "OpenAI disabled (no OPENAI_API_KEY). Serving stored questions only.");
        }

        let generator = build_generator(GeneratorKind::from_env(), openai.clone(), &cfg.prompts, &cfg.quiz);
        info!(target: "codepop_backend", generator = generator.name(), "Question generator selected");

        Self::with_parts(cfg, generator, openai)
    }

    /// Assemble state from explicit parts; seeds catalog and starter questions.
    pub fn with_parts(
        cfg: QuizConfig,
        generator: Arc<dyn QuestionGenerator>,
        openai: Option<OpenAI>,
    ) -> Self {
        let next_id = AtomicU64::new(1);
        let mut catalog: Vec<CatalogEntry> = seed_catalog()
            .into_iter()
            .map(|(name, category)| CatalogEntry {
                id: next_id.fetch_add(1, Ordering::Relaxed),
                name: name.into(),
                category: category.into(),
            })
            .collect();

        for t in &cfg.topics {
            let name = t.name.trim();
            if name.is_empty() {
                warn!(target: "codepop_backend", "Skipping config topic with empty name");
                continue;
            }
            if catalog.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
                warn!(target: "codepop_backend", topic = %name, "Skipping duplicate config topic");
                continue;
            }
            catalog.push(CatalogEntry {
                id: next_id.fetch_add(1, Ordering::Relaxed),
                name: name.to_string(),
                category: t.category.clone().unwrap_or_else(|| "general".into()),
            });
        }

        let mut questions = Vec::new();
        for seed in seed_questions() {
            let Some(topic) = catalog.iter().find(|c| c.name == seed.topic) else {
                warn!(target: "quiz", topic = seed.topic, "Seed question for unknown topic");
                continue;
            };
            questions.push(StoredQuestion {
                id: next_id.fetch_add(1, Ordering::Relaxed),
                topic_id: topic.id,
                text: seed.text.into(),
                subtopic: Some(seed.subtopic.into()),
                difficulty: seed.difficulty,
                explanation: seed.explanation.map(Into::into),
                options: seed
                    .options
                    .iter()
                    .map(|(text, is_correct)| StoredOption {
                        id: next_id.fetch_add(1, Ordering::Relaxed),
                        text: (*text).into(),
                        is_correct: *is_correct,
                    })
                    .collect(),
            });
        }

        info!(target: "quiz", topics = catalog.len(), questions = questions.len(), "Startup inventory");

        Self {
            catalog: Arc::new(catalog),
            questions: Arc::new(RwLock::new(questions)),
            next_id: Arc::new(next_id),
            generator,
            openai,
            settings: cfg.quiz,
        }
    }

    /// Catalog in lookup order.
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    /// Questions of a topic; with a subtopic, only those whose stored subtopic contains it.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch_questions(&self, topic_id: u64, subtopic: Option<&str>) -> Vec<StoredQuestion> {
        let questions = self.questions.read().await;
        questions
            .iter()
            .filter(|q| q.topic_id == topic_id)
            .filter(|q| match subtopic {
                Some(s) if !s.is_empty() => q.subtopic_contains(s),
                _ => true,
            })
            .cloned()
            .collect()
    }

    /// Store generated questions under a topic (and subtopic, if any). Returns the new ids.
    #[instrument(level = "debug", skip(self, parsed), fields(count = parsed.len()))]
    pub async fn save_questions(
        &self,
        topic_id: u64,
        subtopic: Option<&str>,
        parsed: Vec<ParsedQuestion>,
    ) -> Vec<u64> {
        let stored: Vec<StoredQuestion> = parsed
            .into_iter()
            .map(|p| StoredQuestion {
                id: self.allocate_id(),
                topic_id,
                text: p.text,
                subtopic: subtopic.map(str::to_string),
                difficulty: p.difficulty,
                explanation: p.explanation,
                options: p
                    .options
                    .into_iter()
                    .map(|o| StoredOption { id: self.allocate_id(), text: o.text, is_correct: o.is_correct })
                    .collect(),
            })
            .collect();

        let ids: Vec<u64> = stored.iter().map(|q| q.id).collect();
        self.questions.write().await.extend(stored);
        ids
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}
