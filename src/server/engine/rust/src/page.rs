/* src/server/engine/rust/src/page.rs */

use std::sync::Arc;

use serde_json::{Map, Value};
use stitch_core::{
  BoxFuture, Head, History, Location, RouteTable, StaticHistory, StitchError, SwitchProps,
  render_switch,
};
use tokio::sync::OnceCell;

/// Output of rendering the route tree for one request.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
  pub markup: String,
  /// Head metadata the views produced while rendering.
  pub head: Head,
  /// Extra values a custom renderer wants forwarded to the document.
  pub extra: Map<String, Value>,
}

/// Wraps the rendered route tree, e.g. to add a provider element around it.
pub type PageWrapFn = Arc<dyn Fn(String) -> String + Send + Sync>;

/// Replaces the default string renderer. May do async work.
pub type CustomRenderer =
  Arc<dyn Fn(RenderTree) -> BoxFuture<Result<RenderedPage, StitchError>> + Send + Sync>;

/// The route tree bound to one request location and its loaded data.
#[derive(Clone)]
pub struct RenderTree {
  routes: Arc<RouteTable>,
  location: Location,
  data: Option<Value>,
  history: Arc<StaticHistory>,
  wrap: Option<PageWrapFn>,
}

impl RenderTree {
  pub fn new(routes: Arc<RouteTable>, location: Location, data: Option<Value>) -> Self {
    let history = Arc::new(StaticHistory::new(location.clone()));
    Self { routes, location, data, history, wrap: None }
  }

  pub fn with_wrap(mut self, wrap: PageWrapFn) -> Self {
    self.wrap = Some(wrap);
    self
  }

  pub fn location(&self) -> &Location {
    &self.location
  }

  pub fn data(&self) -> Option<&Value> {
    self.data.as_ref()
  }

  /// Synchronous default renderer. Unmatched locations render empty markup.
  pub fn render_to_string(&self) -> RenderedPage {
    let history: Arc<dyn History> = self.history.clone();
    let rendered = render_switch(
      &self.routes,
      SwitchProps {
        location: &self.location,
        data: self.data.as_ref(),
        history: Some(history),
        prefetch: None,
      },
    );
    let (markup, head) = match rendered {
      Some(view) => (view.markup, view.head),
      None => (String::new(), Head::default()),
    };
    let markup = match &self.wrap {
      Some(wrap) => wrap(markup),
      None => markup,
    };
    RenderedPage { markup, head, extra: Map::new() }
  }
}

/// Lazy page render handed to the document. The unwrapped render happens at
/// most once per request; wrapped renders always run fresh.
#[derive(Clone)]
pub struct RenderPage {
  tree: RenderTree,
  renderer: Option<CustomRenderer>,
  cached: Arc<OnceCell<RenderedPage>>,
}

impl RenderPage {
  pub fn new(tree: RenderTree, renderer: Option<CustomRenderer>) -> Self {
    Self { tree, renderer, cached: Arc::new(OnceCell::new()) }
  }

  pub async fn render(&self) -> Result<RenderedPage, StitchError> {
    let page = self.cached.get_or_try_init(|| self.run(self.tree.clone())).await?;
    Ok(page.clone())
  }

  pub async fn render_with(&self, wrap: PageWrapFn) -> Result<RenderedPage, StitchError> {
    self.run(self.tree.clone().with_wrap(wrap)).await
  }

  async fn run(&self, tree: RenderTree) -> Result<RenderedPage, StitchError> {
    match &self.renderer {
      Some(renderer) => renderer(tree).await,
      None => Ok(tree.render_to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use serde_json::json;
  use stitch_core::{RouteDescriptor, ViewRef};

  use super::*;

  fn routes() -> Arc<RouteTable> {
    let home = ViewRef::new("home", |props: &stitch_core::ViewProps, head: &mut Head| {
      head.set_title("Home");
      format!("<main>{}</main>", props.prop_str("greeting").unwrap_or("hi"))
    });
    Arc::new(RouteTable::new(vec![RouteDescriptor::new("/", home).exact(true)]).unwrap())
  }

  #[test]
  fn default_render_uses_location_and_data() {
    let tree = RenderTree::new(routes(), Location::parse("/"), Some(json!({"greeting": "hello"})));
    let page = tree.render_to_string();
    assert_eq!(page.markup, "<main>hello</main>");
    assert_eq!(page.head.title.as_deref(), Some("Home"));
  }

  #[test]
  fn unmatched_location_renders_empty() {
    let tree = RenderTree::new(routes(), Location::parse("/nope"), None);
    assert_eq!(tree.render_to_string().markup, "");
  }

  #[tokio::test]
  async fn custom_renderer_is_awaited_and_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let renderer: CustomRenderer = Arc::new(move |tree: RenderTree| {
      counter.fetch_add(1, Ordering::SeqCst);
      Box::pin(async move {
        tokio::task::yield_now().await;
        let mut page = tree.render_to_string();
        page.markup = format!("<section>{}</section>", page.markup);
        page.extra.insert("styles".into(), json!("<style>.a{}</style>"));
        Ok(page)
      })
    });
    let tree = RenderTree::new(routes(), Location::parse("/"), None);
    let render_page = RenderPage::new(tree, Some(renderer));

    let first = render_page.render().await.unwrap();
    let second = render_page.render().await.unwrap();
    assert_eq!(first.markup, "<section><main>hi</main></section>");
    assert_eq!(second.markup, first.markup);
    assert_eq!(first.extra["styles"], json!("<style>.a{}</style>"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn wrapped_render_applies_wrapper() {
    let render_page = RenderPage::new(RenderTree::new(routes(), Location::parse("/"), None), None);
    let page = render_page
      .render_with(Arc::new(|markup: String| format!("<div class=\"provider\">{markup}</div>")))
      .await
      .unwrap();
    assert_eq!(page.markup, "<div class=\"provider\"><main>hi</main></div>");
  }
}
