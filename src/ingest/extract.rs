//! Locate a balanced JSON object inside free-form model output.
//!
//! Models wrap JSON in code fences, prepend chatter, or embed code with its own braces
//! inside string values. First/last brace indexing corrupts the latter, so we scan.

use crate::error::IngestError;

/// Return the first balanced `{ ... }` span of `raw`, after stripping one surrounding code fence.
///
/// Braces only count outside string literals; `\` escapes the next char inside strings.
pub fn extract_json(raw: &str) -> Result<&str, IngestError> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return Err(IngestError::Extraction("empty response".into()));
  }

  let body = strip_code_fence(trimmed);
  let start = body
    .find('{')
    .ok_or_else(|| IngestError::Extraction("no opening brace".into()))?;

  let mut depth = 0usize;
  let mut in_str = false;
  let mut esc = false;

  for (i, ch) in body[start..].char_indices() {
    if in_str {
      if esc {
        esc = false;
      } else if ch == '\\' {
        esc = true;
      } else if ch == '"' {
        in_str = false;
      }
      continue;
    }

    match ch {
      '"' => in_str = true,
      '{' => depth += 1,
      '}' => {
        depth -= 1;
        if depth == 0 {
          return Ok(&body[start..=start + i]);
        }
      }
      _ => {}
    }
  }

  Err(IngestError::Extraction(format!("unbalanced braces (depth {} at end of input)", depth)))
}

/// Remove one leading ```json / ``` fence and one trailing ``` fence.
fn strip_code_fence(s: &str) -> &str {
  let s = s
    .strip_prefix("```json")
    .or_else(|| s.strip_prefix("```"))
    .unwrap_or(s);
  let s = s.strip_suffix("```").unwrap_or(s);
  s.trim()
}
