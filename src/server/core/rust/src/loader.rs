/* src/server/core/rust/src/loader.rs */

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::errors::StitchError;
use crate::history::History;
use crate::location::Location;
use crate::matcher::MatchResult;
use crate::route::{RouteDescriptor, RouteTable};

/// Props owned by the router. Caller-supplied extras never override them.
pub const RESERVED_PROPS: &[&str] =
  &["children", "data", "match", "routes", "history", "location", "staticContext", "errorPage"];

/// The server request as seen by data-fetching views.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
  pub method: String,
  /// Path and query as received, basename included.
  pub url: String,
  /// Url before any host-level rewriting; redirects are computed from it.
  pub original_url: String,
  pub headers: BTreeMap<String, String>,
}

impl RequestInfo {
  pub fn get(url: impl Into<String>) -> Self {
    let url = url.into();
    Self { method: "GET".into(), original_url: url.clone(), url, headers: BTreeMap::new() }
  }

  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
  }
}

/// Context handed to the loader by its caller.
#[derive(Clone, Default)]
pub struct LoadContext {
  pub location: Option<Location>,
  pub history: Option<Arc<dyn History>>,
  pub request: Option<Arc<RequestInfo>>,
  pub extra: Map<String, Value>,
}

impl LoadContext {
  pub fn with_location(mut self, location: Location) -> Self {
    self.location = Some(location);
    self
  }

  pub fn with_history(mut self, history: Arc<dyn History>) -> Self {
    self.history = Some(history);
    self
  }

  pub fn with_request(mut self, request: Arc<RequestInfo>) -> Self {
    self.request = Some(request);
    self
  }

  /// Merge caller props, skipping [`RESERVED_PROPS`].
  pub fn with_extra(mut self, extra: &Map<String, Value>) -> Self {
    for (k, v) in extra {
      if !RESERVED_PROPS.contains(&k.as_str()) {
        self.extra.insert(k.clone(), v.clone());
      }
    }
    self
  }
}

/// What a data-fetching view receives: the match plus the caller context.
#[derive(Clone)]
pub struct InitialPropsCtx {
  pub route_match: MatchResult,
  pub location: Option<Location>,
  pub history: Option<Arc<dyn History>>,
  pub request: Option<Arc<RequestInfo>>,
  pub extra: Map<String, Value>,
}

impl InitialPropsCtx {
  pub fn new(route_match: MatchResult, ctx: LoadContext) -> Self {
    Self {
      route_match,
      location: ctx.location,
      history: ctx.history,
      request: ctx.request,
      extra: ctx.extra,
    }
  }

  pub fn param(&self, name: &str) -> Option<&str> {
    self.route_match.params.get(name).map(String::as_str)
  }
}

#[derive(Debug, Clone, Default)]
pub struct LoadResult {
  /// `None` when no route matched.
  pub route: Option<Arc<RouteDescriptor>>,
  pub route_match: Option<MatchResult>,
  pub data: Option<Value>,
}

/// Resolve the first route matching `pathname`: await its code-load, then its
/// data fetch. Later routes are never consulted. Failures propagate.
pub async fn load_initial_props(
  table: &RouteTable,
  pathname: &str,
  ctx: LoadContext,
) -> Result<LoadResult, StitchError> {
  let Some(route_match) = table.match_path(pathname) else {
    tracing::debug!(pathname, "no route matched");
    return Ok(LoadResult::default());
  };
  let route = table
    .get(route_match.route_index)
    .cloned()
    .ok_or_else(|| StitchError::internal(format!("route {} vanished", route_match.route_index)))?;

  tracing::debug!(pathname, route = %route.path, "loading initial props");

  let data = match &route.view {
    Some(view) => {
      view.load().await?;
      view.initial_props(InitialPropsCtx::new(route_match.clone(), ctx)).await?
    }
    None => None,
  };

  Ok(LoadResult { route: Some(route), route_match: Some(route_match), data })
}
