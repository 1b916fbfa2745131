//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe preview of a large string, cut on a char boundary.
/// Keeps raw model output from flooding the logs.
pub fn preview(s: &str, max_chars: usize) -> String {
  let total = s.chars().count();
  if total <= max_chars {
    s.to_string()
  } else {
    let head: String = s.chars().take(max_chars).collect();
    format!("{}… ({} chars total)", head, total)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{topic} and {topic} x{count}", &[("topic", "Rust"), ("count", "3")]);
    assert_eq!(out, "Rust and Rust x3");
  }

  #[test]
  fn preview_cuts_on_char_boundary() {
    assert_eq!(preview("short", 10), "short");
    let p = preview("héllo wörld", 4);
    assert!(p.starts_with("héll…"));
    assert!(p.ends_with("(11 chars total)"));
  }
}
