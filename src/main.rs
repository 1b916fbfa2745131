//! CodePop · Quiz Backend
//!
//! - Axum HTTP API for topic quizzes and a chat passthrough
//! - Optional OpenAI integration (via environment variables)
//! - In-memory question store seeded at startup
//!
//! Important env variables:
//!   PORT                : u16 (default 8080)
//!   OPENAI_API_KEY      : enables OpenAI integration if present
//!   OPENAI_BASE_URL     : default "https://api.openai.com/v1"
//!   OPENAI_MODEL        : default "gpt-4o-mini"
//!   OPENAI_TIMEOUT_SECS : request timeout, default 120
//!   QUIZ_GENERATOR      : "openai" or "stub"
//!   QUIZ_CONFIG_PATH    : path to TOML config (quiz settings, prompts, extra topics)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod seeds;
mod state;
mod protocol;
mod logic;
mod openai;
mod generator;
mod ingest;
mod resolver;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Catalog, seeded store, model client and generator.
  let state = Arc::new(AppState::new());

  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "codepop_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
