/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use stitch_core::StitchError;

#[derive(serde::Serialize)]
struct ErrorBody<'a> {
  ok: bool,
  error: ErrorDetail<'a>,
}

#[derive(serde::Serialize)]
struct ErrorDetail<'a> {
  code: &'a str,
  message: &'a str,
}

/// Response wrapper for render failures.
pub(crate) struct AxumError(pub StitchError);

impl From<StitchError> for AxumError {
  fn from(err: StitchError) -> Self {
    Self(err)
  }
}

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    let status = StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorBody {
      ok: false,
      error: ErrorDetail { code: self.0.code(), message: self.0.message() },
    };
    (status, axum::Json(body)).into_response()
  }
}
