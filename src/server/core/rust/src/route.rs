/* src/server/core/rust/src/route.rs */

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::OnceCell;

use crate::errors::StitchError;
use crate::loader::InitialPropsCtx;
use crate::location::normalize_path;
use crate::matcher::{MatchResult, PathMatch, Pattern};
use crate::view::{Head, ViewProps};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Makes a view's code available (the `Loadable` capability).
pub type LoadFn = Arc<dyn Fn() -> BoxFuture<Result<(), StitchError>> + Send + Sync>;

/// Fetches a view's data before it renders (the `DataFetching` capability).
pub type InitialPropsFn =
  Arc<dyn Fn(InitialPropsCtx) -> BoxFuture<Result<Value, StitchError>> + Send + Sync>;

/// Turns props into markup. Head tags go into the collector.
pub type ComponentFn = Arc<dyn Fn(&ViewProps, &mut Head) -> String + Send + Sync>;

/// Capability set a view declares when it is registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
  pub loadable: bool,
  pub data_fetching: bool,
}

/// A renderable view plus its optional capabilities.
///
/// Clones share the code-load state, so `load` side effects run at most once
/// per view no matter how many clones or callers ask for it.
#[derive(Clone)]
pub struct ViewRef {
  name: String,
  component: ComponentFn,
  load: Option<LoadFn>,
  initial_props: Option<InitialPropsFn>,
  loaded: Arc<OnceCell<()>>,
}

impl ViewRef {
  pub fn new<F>(name: impl Into<String>, component: F) -> Self
  where
    F: Fn(&ViewProps, &mut Head) -> String + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      component: Arc::new(component),
      load: None,
      initial_props: None,
      loaded: Arc::new(OnceCell::new()),
    }
  }

  pub fn loadable<F, Fut>(mut self, load: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), StitchError>> + Send + 'static,
  {
    self.load = Some(Arc::new(move || Box::pin(load())));
    self
  }

  pub fn data_fetching<F, Fut>(mut self, fetch: F) -> Self
  where
    F: Fn(InitialPropsCtx) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, StitchError>> + Send + 'static,
  {
    self.initial_props = Some(Arc::new(move |ctx| Box::pin(fetch(ctx))));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn capabilities(&self) -> Capabilities {
    Capabilities { loadable: self.load.is_some(), data_fetching: self.initial_props.is_some() }
  }

  /// Whether the code-load capability has completed successfully.
  pub fn is_loaded(&self) -> bool {
    self.loaded.initialized()
  }

  /// Run the code-load capability once. A failed load leaves the view
  /// unloaded so a later call can try again.
  pub async fn load(&self) -> Result<(), StitchError> {
    let Some(load) = &self.load else {
      return Ok(());
    };
    self.loaded.get_or_try_init(|| load()).await?;
    Ok(())
  }

  /// Run the data-fetching capability, `None` when the view has none.
  pub async fn initial_props(&self, ctx: InitialPropsCtx) -> Result<Option<Value>, StitchError> {
    match &self.initial_props {
      Some(fetch) => fetch(ctx).await.map(Some),
      None => Ok(None),
    }
  }

  pub fn render(&self, props: &ViewProps, head: &mut Head) -> String {
    (self.component)(props, head)
  }
}

impl std::fmt::Debug for ViewRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ViewRef")
      .field("name", &self.name)
      .field("capabilities", &self.capabilities())
      .finish()
  }
}

/// Static declaration binding a path pattern to a view or a redirect.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
  pub path: String,
  pub exact: bool,
  pub redirect_to: Option<String>,
  pub view: Option<ViewRef>,
}

impl RouteDescriptor {
  pub fn new(path: impl Into<String>, view: ViewRef) -> Self {
    Self { path: path.into(), exact: false, redirect_to: None, view: Some(view) }
  }

  pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
    Self { path: path.into(), exact: false, redirect_to: Some(to.into()), view: None }
  }

  pub fn exact(mut self, exact: bool) -> Self {
    self.exact = exact;
    self
  }

  pub fn capabilities(&self) -> Capabilities {
    self.view.as_ref().map(ViewRef::capabilities).unwrap_or_default()
  }
}

struct CompiledRoute {
  descriptor: Arc<RouteDescriptor>,
  pattern: Pattern,
}

/// Ordered, compiled, read-only list of routes. Earlier routes win.
pub struct RouteTable {
  routes: Vec<CompiledRoute>,
}

impl RouteTable {
  /// Compile every pattern and check each descriptor is either a view or a
  /// redirect.
  pub fn new(descriptors: Vec<RouteDescriptor>) -> Result<Self, StitchError> {
    let mut routes = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
      if descriptor.view.is_none() && descriptor.redirect_to.is_none() {
        return Err(StitchError::invalid_route(format!(
          "route '{}' declares neither a view nor a redirect target",
          descriptor.path
        )));
      }
      let pattern = Pattern::compile(&descriptor.path, descriptor.exact)?;
      let caps = descriptor.capabilities();
      tracing::debug!(
        path = %descriptor.path,
        exact = descriptor.exact,
        loadable = caps.loadable,
        data_fetching = caps.data_fetching,
        "registered route"
      );
      routes.push(CompiledRoute { descriptor: Arc::new(descriptor), pattern });
    }
    Ok(Self { routes })
  }

  pub fn len(&self) -> usize {
    self.routes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.routes.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Arc<RouteDescriptor>> {
    self.routes.get(index).map(|r| &r.descriptor)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteDescriptor>> {
    self.routes.iter().map(|r| &r.descriptor)
  }

  /// First route, in declared order, whose pattern matches `pathname`.
  pub fn match_path(&self, pathname: &str) -> Option<MatchResult> {
    self.routes.iter().enumerate().find_map(|(i, route)| {
      route.pattern.matches(pathname).map(|m| into_result(i, route, m))
    })
  }

  /// [`Self::match_path`] after stripping `basename` from `pathname`.
  pub fn match_with_basename(&self, pathname: &str, basename: Option<&str>) -> Option<MatchResult> {
    self.match_path(normalize_path(pathname, basename))
  }

  /// Every route that matches `pathname`, in declared order.
  pub fn matches_all<'a>(
    &'a self,
    pathname: &'a str,
  ) -> impl Iterator<Item = (&'a Arc<RouteDescriptor>, MatchResult)> + 'a {
    self.routes.iter().enumerate().filter_map(move |(i, route)| {
      route.pattern.matches(pathname).map(|m| (&route.descriptor, into_result(i, route, m)))
    })
  }
}

fn into_result(index: usize, route: &CompiledRoute, m: PathMatch) -> MatchResult {
  MatchResult {
    route_index: index,
    path: route.pattern.source().to_string(),
    url: m.url,
    is_exact: m.is_exact,
    params: m.params,
  }
}
