//! Error types.
//!
//! Parsing errors never leave the ingest pipeline; quiz errors reach the HTTP layer;
//! generation errors are absorbed at the generator boundary.

use thiserror::Error;

/// Failures inside one format attempt of the ingest pipeline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
  /// No opening brace, or braces never balance.
  #[error("extraction failed: {0}")]
  Extraction(String),
  /// JSON present but the question list is missing or not an array.
  #[error("unexpected structure: {0}")]
  Structure(String),
  /// A single record is missing a required field; only that record is dropped.
  #[error("invalid field: {0}")]
  Field(String),
}

/// Errors surfaced to callers of quiz assembly.
#[derive(Debug, Error)]
pub enum QuizError {
  #[error("Topic not found: {0}")]
  TopicNotFound(String),
  #[error("invalid request: {0}")]
  InvalidRequest(String),
}

/// Errors from the model client.
#[derive(Debug, Error)]
pub enum GenerationError {
  #[error("model generation is disabled")]
  Disabled,
  #[error("model HTTP {status}: {message}")]
  Http { status: u16, message: String },
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("could not decode model response: {0}")]
  Decode(String),
}
