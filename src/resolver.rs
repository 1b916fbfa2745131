//! Free-text query → catalog topic (+ optional subtopic).
//!
//! Strategies, first hit wins:
//!   1. a whitespace token equals a topic name (case-insensitive); other tokens form the subtopic
//!   2. whole query and a topic name contain one another (case-insensitive); no subtopic
//!   3. same containment test on the first token only; remaining tokens form the subtopic
//!
//! Fuzzy ties go to catalog order. There is no similarity scoring. A blank query is contained in
//! every name, so it lands on the first catalog entry.

use tracing::debug;

use crate::domain::{CatalogEntry, ResolvedTopic};

pub fn resolve_topic(query: &str, catalog: &[CatalogEntry]) -> Option<ResolvedTopic> {
  let tokens: Vec<&str> = query.split_whitespace().collect();

  if let Some(found) = exact_token_match(&tokens, catalog) {
    debug!(target: "quiz", %query, topic = %found.topic.name, strategy = "exact_token", "Resolved topic");
    return Some(found);
  }

  if let Some(topic) = fuzzy_find(query.trim(), catalog) {
    debug!(target: "quiz", %query, topic = %topic.name, strategy = "fuzzy_query", "Resolved topic");
    return Some(ResolvedTopic { topic: topic.clone(), subtopic: None });
  }

  if tokens.len() > 1 {
    if let Some(topic) = fuzzy_find(tokens[0], catalog) {
      debug!(target: "quiz", %query, topic = %topic.name, strategy = "fuzzy_first_token", "Resolved topic");
      return Some(ResolvedTopic { topic: topic.clone(), subtopic: join_nonempty(&tokens[1..]) });
    }
  }

  None
}

fn exact_token_match(tokens: &[&str], catalog: &[CatalogEntry]) -> Option<ResolvedTopic> {
  tokens.iter().enumerate().find_map(|(i, token)| {
    let token = token.to_lowercase();
    catalog.iter().find(|t| t.name.to_lowercase() == token).map(|topic| {
      let rest: Vec<&str> = tokens
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != i)
        .map(|(_, t)| *t)
        .collect();
      ResolvedTopic { topic: topic.clone(), subtopic: join_nonempty(&rest) }
    })
  })
}

/// Bidirectional case-insensitive containment.
fn fuzzy_find<'a>(input: &str, catalog: &'a [CatalogEntry]) -> Option<&'a CatalogEntry> {
  let input = input.to_lowercase();
  catalog.iter().find(|t| {
    let name = t.name.to_lowercase();
    input.contains(&name) || name.contains(&input)
  })
}

fn join_nonempty(tokens: &[&str]) -> Option<String> {
  if tokens.is_empty() { None } else { Some(tokens.join(" ")) }
}
