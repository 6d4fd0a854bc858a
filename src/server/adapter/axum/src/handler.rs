/* src/server/adapter/axum/src/handler.rs */

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use stitch_core::RequestInfo;
use stitch_engine::{RenderContext, RenderOptions, RenderOutcome, render};

use crate::StitchApp;
use crate::error::AxumError;

pub(crate) fn build_router(app: StitchApp) -> Router {
  // Every GET the host does not route itself goes through the renderer.
  Router::new().fallback(get(handle_page)).with_state(Arc::new(app))
}

fn request_info(method: &Method, uri: &Uri, headers: &HeaderMap) -> RequestInfo {
  let url =
    uri.path_and_query().map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
  let headers: BTreeMap<String, String> = headers
    .iter()
    .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
    .collect();
  RequestInfo { method: method.as_str().to_string(), original_url: url.clone(), url, headers }
}

async fn handle_page(
  State(app): State<Arc<StitchApp>>,
  method: Method,
  uri: Uri,
  headers: HeaderMap,
) -> Result<Response, AxumError> {
  let mut context = RenderContext::new(request_info(&method, &uri, &headers), app.assets.clone());
  context.basename = app.basename.clone();
  context.extra = app.extra.clone();

  let mut options = RenderOptions::new(context, app.routes.clone());
  if let Some(ref document) = app.document {
    options = options.document(document.clone());
  }
  if let Some(ref renderer) = app.custom_renderer {
    options = options.custom_renderer(renderer.clone());
  }

  match render(options).await {
    RenderOutcome::Document { status, html } => {
      let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
      Ok((status, Html(html)).into_response())
    }
    RenderOutcome::NotFound => Ok(StatusCode::NOT_FOUND.into_response()),
    RenderOutcome::Redirect { status, location } => {
      let status = StatusCode::from_u16(status).unwrap_or(StatusCode::MOVED_PERMANENTLY);
      Ok((status, [(header::LOCATION, location)]).into_response())
    }
    RenderOutcome::Failed(err) => Err(err.into()),
  }
}
