/* src/server/core/rust/src/location.rs */

use serde::{Deserialize, Serialize};

/// A parsed in-app location: `pathname`, `search` (with leading `?`) and
/// `hash` (with leading `#`). Empty strings mean "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
  pub pathname: String,
  #[serde(default)]
  pub search: String,
  #[serde(default)]
  pub hash: String,
}

impl Location {
  /// Split a url path (`/a/b?x=1#top`) into its parts. A missing pathname
  /// becomes `/`.
  pub fn parse(url: &str) -> Self {
    let (rest, hash) = match url.find('#') {
      Some(i) => (&url[..i], &url[i..]),
      None => (url, ""),
    };
    let (pathname, search) = match rest.find('?') {
      Some(i) => (&rest[..i], &rest[i..]),
      None => (rest, ""),
    };
    let pathname = if pathname.is_empty() { "/" } else { pathname };
    Self { pathname: pathname.to_string(), search: search.to_string(), hash: hash.to_string() }
  }

  pub fn href(&self) -> String {
    format!("{}{}{}", self.pathname, self.search, self.hash)
  }
}

impl From<&str> for Location {
  fn from(url: &str) -> Self {
    Self::parse(url)
  }
}

/// Whether `path` starts with `prefix` (case-insensitive) at a boundary:
/// the next character must be `/`, `?`, `#` or the end of the string.
pub fn has_basename(path: &str, prefix: &str) -> bool {
  if path.len() < prefix.len() || !path.is_char_boundary(prefix.len()) {
    return false;
  }
  if !path[..prefix.len()].eq_ignore_ascii_case(prefix) {
    return false;
  }
  matches!(path[prefix.len()..].chars().next(), None | Some('/' | '?' | '#'))
}

/// Remove `prefix` from `path` when [`has_basename`] holds, otherwise return
/// `path` untouched.
pub fn strip_basename<'a>(path: &'a str, prefix: &str) -> &'a str {
  if has_basename(path, prefix) { &path[prefix.len()..] } else { path }
}

/// [`strip_basename`] for an optional basename; an empty stripped path
/// normalizes to `/`.
pub fn normalize_path<'a>(path: &'a str, basename: Option<&str>) -> &'a str {
  let stripped = match basename {
    Some(base) if !base.is_empty() => strip_basename(path, base),
    _ => path,
  };
  if stripped.is_empty() { "/" } else { stripped }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_full_url() {
    let loc = Location::parse("/users/42?tab=posts#top");
    assert_eq!(loc.pathname, "/users/42");
    assert_eq!(loc.search, "?tab=posts");
    assert_eq!(loc.hash, "#top");
    assert_eq!(loc.href(), "/users/42?tab=posts#top");
  }

  #[test]
  fn parse_query_only() {
    let loc = Location::parse("?q=1");
    assert_eq!(loc.pathname, "/");
    assert_eq!(loc.search, "?q=1");
  }

  #[test]
  fn basename_boundaries() {
    assert!(has_basename("/app", "/app"));
    assert!(has_basename("/app/users", "/app"));
    assert!(has_basename("/app?x=1", "/app"));
    assert!(has_basename("/app#frag", "/app"));
    assert!(has_basename("/APP/users", "/app"));
    assert!(!has_basename("/application", "/app"));
    assert!(!has_basename("/ap", "/app"));
  }

  #[test]
  fn strip_only_at_boundary() {
    assert_eq!(strip_basename("/app/users", "/app"), "/users");
    assert_eq!(strip_basename("/application", "/app"), "/application");
    assert_eq!(strip_basename("/app", "/app"), "");
  }

  #[test]
  fn normalize_empty_becomes_root() {
    assert_eq!(normalize_path("/app", Some("/app")), "/");
    assert_eq!(normalize_path("/app/x", None), "/app/x");
    assert_eq!(normalize_path("/app/x", Some("")), "/app/x");
  }
}
