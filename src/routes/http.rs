//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{error, info, instrument};

use crate::error::{GenerationError, QuizError};
use crate::logic::{do_chat, get_quiz};
use crate::protocol::*;
use crate::state::AppState;

/// JSON error body shared by every endpoint.
fn error_response(status: StatusCode, error: String) -> Response {
  (status, Json(ErrorOut { error, status: status.as_str().to_string() })).into_response()
}

impl IntoResponse for QuizError {
  fn into_response(self) -> Response {
    let status = match &self {
      QuizError::TopicNotFound(_) => StatusCode::NOT_FOUND,
      QuizError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
    };
    error_response(status, self.to_string())
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, q))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(topic): Path<String>,
  Query(q): Query<Vec<(String, String)>>,
) -> Result<Json<QuizOut>, QuizError> {
  let exclude = parse_exclusions(&q)?;
  let quiz = get_quiz(&state, &topic, &exclude).await?;
  info!(target: "quiz", %topic, total = quiz.total_questions, excluded = exclude.len(), "HTTP quiz served");
  Ok(Json(quiz))
}

#[instrument(level = "info", skip(state, body), fields(prompt_len = body.prompt.len()))]
pub async fn http_post_chat(State(state): State<Arc<AppState>>, Json(body): Json<ChatIn>) -> Response {
  if body.prompt.trim().is_empty() {
    return QuizError::InvalidRequest("prompt must not be blank".into()).into_response();
  }
  match do_chat(&state, &body.prompt).await {
    Ok(response) => Json(ChatOut { response }).into_response(),
    Err(e @ GenerationError::Disabled) => error_response(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    Err(e) => {
      error!(target: "codepop_backend", error = %e, "Chat passthrough failed");
      error_response(StatusCode::BAD_GATEWAY, e.to_string())
    }
  }
}
