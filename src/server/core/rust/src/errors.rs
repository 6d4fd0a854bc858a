/* src/server/core/rust/src/errors.rs */

use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct StitchError {
  code: String,
  message: String,
  status: u16,
}

fn default_status(code: &str) -> u16 {
  match code {
    "NOT_FOUND" => 404,
    "LOAD_FAILURE" => 500,
    "DATA_FETCH_FAILURE" => 500,
    "HYDRATION_ERROR" => 500,
    "INVALID_ROUTE" => 500,
    "CONFIG_ERROR" => 500,
    "INTERNAL_ERROR" => 500,
    _ => 500,
  }
}

impl StitchError {
  pub fn new(code: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
    Self { code: code.into(), message: message.into(), status }
  }

  pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
    let code = code.into();
    let status = default_status(&code);
    Self { code, message: message.into(), status }
  }

  /// No route descriptor matched a pathname.
  pub fn not_found(msg: impl Into<String>) -> Self {
    Self::with_code("NOT_FOUND", msg)
  }

  /// A view's code-load capability rejected.
  pub fn load_failure(msg: impl Into<String>) -> Self {
    Self::with_code("LOAD_FAILURE", msg)
  }

  /// A view's initial-props capability rejected.
  pub fn data_fetch(msg: impl Into<String>) -> Self {
    Self::with_code("DATA_FETCH_FAILURE", msg)
  }

  pub fn hydration(msg: impl Into<String>) -> Self {
    Self::with_code("HYDRATION_ERROR", msg)
  }

  pub fn invalid_route(msg: impl Into<String>) -> Self {
    Self::with_code("INVALID_ROUTE", msg)
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::with_code("CONFIG_ERROR", msg)
  }

  pub fn internal(msg: impl Into<String>) -> Self {
    Self::with_code("INTERNAL_ERROR", msg)
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn status(&self) -> u16 {
    self.status
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_status_known_codes() {
    assert_eq!(default_status("NOT_FOUND"), 404);
    assert_eq!(default_status("LOAD_FAILURE"), 500);
    assert_eq!(default_status("DATA_FETCH_FAILURE"), 500);
    assert_eq!(default_status("HYDRATION_ERROR"), 500);
  }

  #[test]
  fn default_status_unknown_code() {
    assert_eq!(default_status("CUSTOM_ERROR"), 500);
  }

  #[test]
  fn new_explicit_status() {
    let err = StitchError::new("UPSTREAM", "bad gateway", 502);
    assert_eq!(err.code(), "UPSTREAM");
    assert_eq!(err.message(), "bad gateway");
    assert_eq!(err.status(), 502);
  }

  #[test]
  fn convenience_constructors() {
    assert_eq!(StitchError::not_found("x").status(), 404);
    assert_eq!(StitchError::load_failure("x").code(), "LOAD_FAILURE");
    assert_eq!(StitchError::data_fetch("x").code(), "DATA_FETCH_FAILURE");
    assert_eq!(StitchError::config("x").code(), "CONFIG_ERROR");
    assert_eq!(StitchError::internal("x").status(), 500);
  }

  #[test]
  fn display_format() {
    let err = StitchError::data_fetch("user service down");
    assert_eq!(err.to_string(), "DATA_FETCH_FAILURE: user service down");
  }
}
