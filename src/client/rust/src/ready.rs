/* src/client/rust/src/ready.rs */

use std::sync::Arc;

use futures_util::future::try_join_all;
use serde_json::Value;
use stitch_core::hydration::{decode_payload, extract_element_text};
use stitch_core::{HYDRATION_ELEMENT_ID, History, Location, RouteTable, StitchError, normalize_path};

use crate::navigator::{Navigator, NavigatorOptions};

/// The server-rendered page the client boots on top of.
pub trait HydrationSource: Send + Sync {
  /// Pathname the page was served for.
  fn pathname(&self) -> String;
  /// Text content of the element with `id`, if the page has one.
  fn element_text(&self, id: &str) -> Option<String>;
}

/// A server response held in memory.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
  pub location: Location,
  pub html: String,
}

impl HtmlDocument {
  pub fn new(url: &str, html: impl Into<String>) -> Self {
    Self { location: Location::parse(url), html: html.into() }
  }
}

impl HydrationSource for HtmlDocument {
  fn pathname(&self) -> String {
    self.location.pathname.clone()
  }

  fn element_text(&self, id: &str) -> Option<String> {
    extract_element_text(&self.html, id).map(str::to_string)
  }
}

/// Load the code of every route matching the current pathname, then return
/// the data the server embedded. Loads run concurrently and the first
/// failure is returned. A page without the payload element yields `None`.
pub async fn ensure_ready(
  routes: &RouteTable,
  pathname: Option<&str>,
  basename: Option<&str>,
  source: &dyn HydrationSource,
) -> Result<Option<Value>, StitchError> {
  let pathname = pathname.map_or_else(|| source.pathname(), str::to_string);
  let pathname = normalize_path(&pathname, basename);

  let loads = routes
    .matches_all(pathname)
    .filter_map(|(route, _)| route.view.as_ref())
    .filter(|view| view.capabilities().loadable)
    .map(|view| view.load());
  let loaded = try_join_all(loads).await?;
  tracing::debug!(pathname = %pathname, views = loaded.len(), "client views loaded");

  match source.element_text(HYDRATION_ELEMENT_ID) {
    Some(text) => decode_payload(&text),
    None => {
      tracing::debug!("no hydration payload on page");
      Ok(None)
    }
  }
}

/// Wait for the page to be ready and start a navigator seeded with the
/// server data.
pub async fn bootstrap(
  routes: Arc<RouteTable>,
  history: Arc<dyn History>,
  source: &dyn HydrationSource,
  options: NavigatorOptions,
) -> Result<Navigator, StitchError> {
  let data = ensure_ready(&routes, None, options.basename.as_deref(), source).await?;
  Ok(Navigator::new(routes, history, data, options))
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::time::Duration;

  use serde_json::json;
  use stitch_core::{Head, InitialPropsCtx, RequestInfo, RouteDescriptor, ViewProps, ViewRef};
  use stitch_engine::{Assets, RenderContext, RenderOptions, RenderOutcome, render};

  use super::*;
  use crate::history::MemoryHistory;

  fn counted(name: &'static str, calls: Arc<AtomicUsize>) -> ViewRef {
    ViewRef::new(name, |_: &ViewProps, _: &mut Head| String::new()).loadable(move || {
      let calls = calls.clone();
      async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
      }
    })
  }

  #[tokio::test]
  async fn loads_every_match_once_and_reads_payload() {
    let calls = Arc::new(AtomicUsize::new(0));
    let routes = RouteTable::new(vec![
      RouteDescriptor::new("/docs", counted("layout", calls.clone())),
      RouteDescriptor::new("/docs/:page", counted("page", calls.clone())),
      RouteDescriptor::new("/blog", counted("blog", calls.clone())),
    ])
    .unwrap();
    let page = HtmlDocument::new(
      "/docs/intro",
      concat!(
        r#"<div id="root"></div>"#,
        r#"<script id="server-app-state" type="application/json">{"n":1}</script>"#,
      ),
    );

    assert_eq!(ensure_ready(&routes, None, None, &page).await.unwrap(), Some(json!({"n": 1})));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    ensure_ready(&routes, None, None, &page).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn first_load_failure_is_returned() {
    let broken = ViewRef::new("broken", |_: &ViewProps, _: &mut Head| String::new())
      .loadable(|| async { Err(StitchError::load_failure("chunk 7 missing")) });
    let routes = RouteTable::new(vec![RouteDescriptor::new("/", broken)]).unwrap();
    let page = HtmlDocument::new("/", "");

    let err = ensure_ready(&routes, None, None, &page).await.unwrap_err();
    assert_eq!(err.code(), "LOAD_FAILURE");
  }

  #[tokio::test]
  async fn missing_payload_is_none() {
    let routes = RouteTable::new(vec![]).unwrap();
    let page = HtmlDocument::new("/", "<html><body></body></html>");
    assert_eq!(ensure_ready(&routes, None, None, &page).await.unwrap(), None);
  }

  #[tokio::test]
  async fn malformed_payload_is_a_hydration_error() {
    let routes = RouteTable::new(vec![]).unwrap();
    let page = HtmlDocument::new(
      "/",
      r#"<script id="server-app-state" type="application/json">{oops}</script>"#,
    );
    let err = ensure_ready(&routes, None, None, &page).await.unwrap_err();
    assert_eq!(err.code(), "HYDRATION_ERROR");
  }

  #[tokio::test]
  async fn explicit_pathname_and_basename_pick_routes() {
    let calls = Arc::new(AtomicUsize::new(0));
    let about = RouteDescriptor::new("/about", counted("about", calls.clone()));
    let routes = RouteTable::new(vec![about]).unwrap();
    let page = HtmlDocument::new("/", "");

    ensure_ready(&routes, Some("/app/about"), Some("/app"), &page).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn server_document_boots_client() {
    let user = ViewRef::new("user", |props: &ViewProps, _: &mut Head| {
      format!("<h1>{}</h1>", props.prop_str("name").unwrap_or("?"))
    })
    .data_fetching(|ctx: InitialPropsCtx| async move {
      Ok(json!({"name": "<Alice & co>", "id": ctx.param("id")}))
    });
    let routes = Arc::new(RouteTable::new(vec![RouteDescriptor::new("/user/:id", user)]).unwrap());

    let context = RenderContext::new(RequestInfo::get("/user/7"), Arc::new(Assets::default()));
    let outcome = render(RenderOptions::new(context, routes.clone())).await;
    let RenderOutcome::Document { html, .. } = outcome else {
      panic!("expected a document");
    };

    let page = HtmlDocument::new("/user/7", html);
    let history = Arc::new(MemoryHistory::new("/user/7"));
    let nav = bootstrap(routes, history, &page, NavigatorOptions::default()).await.unwrap();
    assert_eq!(nav.state().data, Some(json!({"name": "<Alice & co>", "id": "7"})));
    assert_eq!(nav.render().unwrap().markup, "<h1><Alice & co></h1>");
  }
}
