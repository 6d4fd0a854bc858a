/* src/server/core/rust/src/matcher.rs */

use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;

use crate::errors::StitchError;

/// Route path that matches every pathname. A route declared with it still
/// renders, but the server answers with status 404.
pub const CATCH_ALL: &str = "**";

/// Outcome of matching one pathname against one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
  /// Position of the matched descriptor in its route table.
  pub route_index: usize,
  /// The pattern that matched, as declared.
  pub path: String,
  /// The matched portion of the pathname.
  pub url: String,
  pub is_exact: bool,
  pub params: BTreeMap<String, String>,
}

/// A compiled route pattern.
///
/// Supported syntax: literal segments (case-insensitive), `:name` and
/// `:name?` parameters, and `*` splats captured as `"0"`, `"1"`, ...
#[derive(Debug, Clone)]
pub struct Pattern {
  source: String,
  exact: bool,
  regex: Regex,
  keys: Vec<String>,
}

/// Match data before it is tied to a route index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
  pub url: String,
  pub is_exact: bool,
  pub params: BTreeMap<String, String>,
}

impl Pattern {
  pub fn compile(source: &str, exact: bool) -> Result<Self, StitchError> {
    let trimmed = source.trim_end_matches('/');
    let mut body = String::new();
    let mut keys = Vec::new();
    let mut splats = 0usize;

    for (i, segment) in trimmed.split('/').enumerate() {
      let prefix = if i == 0 { "" } else { "/" };
      if let Some(name) = segment.strip_prefix(':') {
        let (name, optional) = match name.strip_suffix('?') {
          Some(n) => (n, true),
          None => (name, false),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
          return Err(StitchError::invalid_route(format!(
            "invalid parameter '{segment}' in route '{source}'"
          )));
        }
        keys.push(name.to_string());
        if optional {
          body.push_str(&format!("(?:{}([^/]+))?", regex::escape(prefix)));
        } else {
          body.push_str(&format!("{}([^/]+)", regex::escape(prefix)));
        }
      } else {
        body.push_str(&regex::escape(prefix));
        push_literal(segment, &mut body, &mut keys, &mut splats);
      }
    }

    let tail = if exact { "/?$" } else { "(?:/.*)?$" };
    let regex = Regex::new(&format!("(?i)^({body}){tail}"))
      .map_err(|e| StitchError::invalid_route(format!("route '{source}': {e}")))?;

    Ok(Self { source: source.to_string(), exact, regex, keys })
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn is_exact(&self) -> bool {
    self.exact
  }

  pub fn matches(&self, pathname: &str) -> Option<PathMatch> {
    let caps = self.regex.captures(pathname)?;
    let matched = caps.get(1).map_or("", |m| m.as_str());

    // A lone trailing slash belongs to the matched url.
    let rest = &pathname[matched.len()..];
    let url = if rest == "/" {
      pathname.to_string()
    } else if matched.is_empty() {
      "/".to_string()
    } else {
      matched.to_string()
    };

    let mut params = BTreeMap::new();
    for (i, key) in self.keys.iter().enumerate() {
      if let Some(value) = caps.get(i + 2) {
        params.insert(key.clone(), value.as_str().to_string());
      }
    }

    Some(PathMatch { is_exact: url == pathname, url, params })
  }
}

/// Escape literal text; each run of `*` becomes one numbered splat group.
fn push_literal(segment: &str, body: &mut String, keys: &mut Vec<String>, splats: &mut usize) {
  let mut literal = String::new();
  let mut in_star = false;
  for ch in segment.chars() {
    if ch == '*' {
      if !in_star {
        body.push_str(&regex::escape(&literal));
        literal.clear();
        body.push_str("(.*)");
        keys.push(splats.to_string());
        *splats += 1;
        in_star = true;
      }
    } else {
      in_star = false;
      literal.push(ch);
    }
  }
  body.push_str(&regex::escape(&literal));
}

/// Build a concrete path from a route pattern. `:name` segments take their
/// value from `params`, a missing optional segment is dropped, and each run
/// of `*` takes the next numbered splat.
pub fn fill_pattern(
  pattern: &str,
  params: &BTreeMap<String, String>,
) -> Result<String, StitchError> {
  let missing = |key: &str| {
    StitchError::invalid_route(format!("no value for '{key}' when building '{pattern}'"))
  };
  let mut segments = Vec::new();
  let mut splats = 0usize;

  for segment in pattern.split('/') {
    if let Some(name) = segment.strip_prefix(':') {
      match name.strip_suffix('?') {
        Some(optional) => {
          if let Some(value) = params.get(optional) {
            segments.push(value.clone());
          }
        }
        None => segments.push(params.get(name).cloned().ok_or_else(|| missing(name))?),
      }
      continue;
    }

    let mut out = String::new();
    let mut in_star = false;
    for ch in segment.chars() {
      if ch == '*' {
        if !in_star {
          let key = splats.to_string();
          out.push_str(params.get(&key).ok_or_else(|| missing(&key))?);
          splats += 1;
          in_star = true;
        }
      } else {
        in_star = false;
        out.push(ch);
      }
    }
    segments.push(out);
  }

  Ok(segments.join("/"))
}
