//! Runtime configuration: environment variables plus an optional TOML file.
//!
//! TOML schema (every section optional):
//!
//! ```toml
//! [quiz]
//! size = 5
//! max_exclusion_hints = 10
//! temperature = 0.8
//!
//! [prompts]
//! system = "..."
//! user_template = "... {count} {topic} {easy} {medium} {hard} {avoid} ..."
//!
//! [[topics]]
//! name = "Elixir"
//! category = "backend"
//! ```

use serde::Deserialize;
use tracing::{error, info, warn};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub quiz: QuizSettings,
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub topics: Vec<TopicCfg>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
  /// Questions per quiz.
  pub size: usize,
  /// How many existing question texts are listed in the prompt as "avoid".
  pub max_exclusion_hints: usize,
  pub temperature: f32,
}

impl Default for QuizSettings {
  fn default() -> Self {
    Self { size: 5, max_exclusion_hints: 10, temperature: 0.8 }
  }
}

/// Extra catalog topic accepted in TOML.
#[derive(Clone, Debug, Deserialize)]
pub struct TopicCfg {
  pub name: String,
  #[serde(default)]
  pub category: Option<String>,
}

/// Prompts used for question generation. Override in TOML to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub system: String,
  pub user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      system: "You are a quiz master specialized in coding topics. You follow the requested output format exactly.".into(),
      user_template: DEFAULT_USER_TEMPLATE.into(),
    }
  }
}

const DEFAULT_USER_TEMPLATE: &str = r#"Generate {count} multiple-choice quiz questions about: {topic}

Requirements:
- Generate exactly {easy} easy, {medium} medium, and {hard} hard questions
- Each question must have exactly 4 options
- Exactly one option must be correct
- Create factual, verifiable questions (no opinions or ambiguous questions)
- Include an explanation for each question
- Make the incorrect options plausible distractors
- ENCOURAGED: include code snippets in questions, inside fenced code blocks
{avoid}
Use EXACTLY this format for every question. Do not use JSON. Mark the correct option with [CORRECT].

### QUESTION 1 ###
DIFFICULTY: easy
QUESTION: What is the output of: print(2 + 2)?
OPTION: 4 [CORRECT]
OPTION: 22
OPTION: TypeError
OPTION: SyntaxError
EXPLANATION: Basic arithmetic on integers.

### QUESTION 2 ###
DIFFICULTY: medium
QUESTION: What does this method return for add(2, 3)?
```java
public int add(int a, int b) {
  return a + b;
}
```
OPTION: 5 [CORRECT]
OPTION: 23
OPTION: Error
OPTION: null
EXPLANATION: The method adds two integers.
"#;

/// Which question generator backs quiz assembly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorKind {
  OpenAi,
  Stub,
}

impl GeneratorKind {
  /// QUIZ_GENERATOR=openai|stub; defaults to openai when a key is configured.
  pub fn from_env() -> Self {
    let has_key = std::env::var("OPENAI_API_KEY").map(|k| !k.trim().is_empty()).unwrap_or(false);
    Self::select(std::env::var("QUIZ_GENERATOR").ok().as_deref(), has_key)
  }

  fn select(requested: Option<&str>, has_key: bool) -> Self {
    match requested.map(|s| s.trim().to_lowercase()).as_deref() {
      Some("stub") => GeneratorKind::Stub,
      Some("openai") => GeneratorKind::OpenAi,
      Some(other) => {
        warn!(target: "codepop_backend", requested = %other, "Unknown QUIZ_GENERATOR; using default");
        Self::select(None, has_key)
      }
      None if has_key => GeneratorKind::OpenAi,
      None => GeneratorKind::Stub,
    }
  }
}

pub fn parse_quiz_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_quiz_config(&s) {
      Ok(cfg) => {
        info!(target: "codepop_backend", %path, topics = cfg.topics.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "codepop_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "codepop_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
