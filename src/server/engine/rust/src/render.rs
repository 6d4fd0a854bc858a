/* src/server/engine/rust/src/render.rs */

use std::sync::Arc;

use serde_json::{Map, Value};
use stitch_core::{
  CATCH_ALL, History, LoadContext, Location, MatchResult, RequestInfo, RouteTable, StaticHistory,
  StitchError, fill_pattern, load_initial_props, normalize_path, strip_basename,
};

use crate::assets::Assets;
use crate::document::{DefaultDocument, Document, DocumentCtx, assemble};
use crate::page::{CustomRenderer, RenderPage, RenderTree};

/// Per-request inputs. Built once by the host and never mutated.
#[derive(Debug, Clone)]
pub struct RenderContext {
  pub request: Arc<RequestInfo>,
  pub assets: Arc<Assets>,
  pub basename: Option<String>,
  /// Caller values forwarded to loaders and the document.
  pub extra: Map<String, Value>,
}

impl RenderContext {
  pub fn new(request: RequestInfo, assets: Arc<Assets>) -> Self {
    Self { request: Arc::new(request), assets, basename: None, extra: Map::new() }
  }
}

pub struct RenderOptions {
  pub context: RenderContext,
  pub routes: Arc<RouteTable>,
  /// Location handed to loaders; defaults to the normalized request url.
  pub location: Option<Location>,
  pub document: Option<Arc<dyn Document>>,
  pub custom_renderer: Option<CustomRenderer>,
}

impl RenderOptions {
  pub fn new(context: RenderContext, routes: Arc<RouteTable>) -> Self {
    Self { context, routes, location: None, document: None, custom_renderer: None }
  }

  pub fn document(mut self, document: Arc<dyn Document>) -> Self {
    self.document = Some(document);
    self
  }

  pub fn custom_renderer(mut self, renderer: CustomRenderer) -> Self {
    self.custom_renderer = Some(renderer);
    self
  }

  pub fn location(mut self, location: Location) -> Self {
    self.location = Some(location);
    self
  }
}

/// What the host should send back.
#[derive(Debug)]
pub enum RenderOutcome {
  Document { status: u16, html: String },
  /// No route matched; respond 404 without a body.
  NotFound,
  Redirect { status: u16, location: String },
  /// A loader, renderer or document failed.
  Failed(StitchError),
}

impl RenderOutcome {
  pub fn status(&self) -> u16 {
    match self {
      Self::Document { status, .. } | Self::Redirect { status, .. } => *status,
      Self::NotFound => 404,
      Self::Failed(err) => err.status(),
    }
  }
}

/// Turn one request into a document, a not-found, a redirect, or a failure.
/// Every error is caught here and reported as [`RenderOutcome::Failed`].
pub async fn render(options: RenderOptions) -> RenderOutcome {
  let url = options.context.request.url.clone();
  match try_render(options).await {
    Ok(outcome) => outcome,
    Err(err) => {
      tracing::error!(url = %url, code = err.code(), error = %err, "render failed");
      RenderOutcome::Failed(err)
    }
  }
}

async fn try_render(options: RenderOptions) -> Result<RenderOutcome, StitchError> {
  let RenderOptions { context, routes, location, document, custom_renderer } = options;

  let normalized = normalize_path(&context.request.url, context.basename.as_deref());
  let request_location = Location::parse(normalized);
  let history: Arc<dyn History> = Arc::new(StaticHistory::new(request_location.clone()));

  let load_ctx = LoadContext::default()
    .with_location(location.unwrap_or_else(|| request_location.clone()))
    .with_history(history)
    .with_request(context.request.clone())
    .with_extra(&context.extra);
  let loaded = load_initial_props(&routes, &request_location.pathname, load_ctx).await?;

  let (Some(route), Some(route_match)) = (loaded.route, loaded.route_match) else {
    tracing::warn!(url = %context.request.url, "no route matched");
    return Ok(RenderOutcome::NotFound);
  };

  let status = if route.path == CATCH_ALL {
    404
  } else if let Some(ref target) = route.redirect_to {
    let location =
      redirect_location(&context.request, context.basename.as_deref(), &route_match, target)?;
    tracing::debug!(from = %context.request.original_url, to = %location, "redirect route");
    return Ok(RenderOutcome::Redirect { status: 301, location });
  } else {
    200
  };

  let tree = RenderTree::new(routes.clone(), request_location, loaded.data.clone());
  let render_page = RenderPage::new(tree, custom_renderer);
  let page = render_page.render().await?;

  let document = document.unwrap_or_else(|| Arc::new(DefaultDocument::default()));
  let props = document
    .get_initial_props(DocumentCtx {
      request: context.request.clone(),
      assets: context.assets.clone(),
      render_page,
      markup: page.markup,
      head: page.head,
      data: loaded.data,
      route_match,
      extra: context.extra.clone(),
    })
    .await?;
  let html = assemble(&document.render(&props)?, &props.markup);

  tracing::debug!(url = %context.request.url, route = %route.path, status, "rendered document");
  Ok(RenderOutcome::Document { status, html })
}

/// Split `url` into its basename prefix and whatever follows the matched
/// part of the path. `None` when the path does not start with `matched`.
fn split_at_match<'a>(
  url: &'a str,
  basename: Option<&str>,
  matched: &str,
) -> Option<(&'a str, &'a str)> {
  let path = basename.map_or(url, |base| strip_basename(url, base));
  let prefix = &url[..url.len() - path.len()];
  // The root pattern consumes nothing.
  if matched == "/" {
    return Some((prefix, path));
  }
  let head = path.get(..matched.len())?;
  head.eq_ignore_ascii_case(matched).then(|| (prefix, &path[matched.len()..]))
}

/// Target url of a redirect route: the matched part of the request path is
/// replaced by `target` with the match params filled in. Basename, deeper
/// segments, query and hash are kept. A target that resolves back to the
/// request url is rejected.
fn redirect_location(
  request: &RequestInfo,
  basename: Option<&str>,
  route_match: &MatchResult,
  target: &str,
) -> Result<String, StitchError> {
  let (prefix, tail) = split_at_match(&request.original_url, basename, &route_match.url)
    .or_else(|| split_at_match(&request.url, basename, &route_match.url))
    .ok_or_else(|| {
      StitchError::invalid_route(format!(
        "matched path '{}' not found in '{}'",
        route_match.url, request.original_url
      ))
    })?;

  let filled = fill_pattern(target, &route_match.params)?;
  let mut path = format!("{}{tail}", filled.trim_end_matches('/'));
  if !path.starts_with('/') {
    path.insert(0, '/');
  }
  let location = format!("{prefix}{path}");

  if location.eq_ignore_ascii_case(&request.original_url) {
    return Err(StitchError::invalid_route(format!(
      "redirect '{}' -> '{target}' points back at '{location}'",
      route_match.path
    )));
  }
  Ok(location)
}
