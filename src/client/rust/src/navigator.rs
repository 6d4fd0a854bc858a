/* src/client/rust/src/navigator.rs */

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde_json::{Map, Value};
use stitch_core::{
  History, LoadContext, Location, PrefetchFn, RenderedView, RouteTable, StitchConfig, StitchError,
  SwitchProps, load_initial_props, render_switch,
};

use crate::prefetch::PrefetchCache;

/// Scroll control of the host window.
pub trait Viewport: Send + Sync {
  fn scroll_to(&self, x: i32, y: i32);
}

pub struct NoopViewport;

impl Viewport for NoopViewport {
  fn scroll_to(&self, _x: i32, _y: i32) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigationPhase {
  #[default]
  Idle,
  Transitioning,
}

/// Observable navigation state. While `previous_location` is set the
/// outgoing view stays on screen.
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
  pub previous_location: Option<Location>,
  pub data: Option<Value>,
  pub phase: NavigationPhase,
}

/// How one call to [`Navigator::location_changed`] ended.
#[derive(Debug)]
pub enum NavigationOutcome {
  /// Same route as before: query or params changed, nothing to load.
  Unchanged,
  /// Data loaded and applied.
  Completed,
  /// Data for the new pathname was already prefetched.
  FromCache,
  /// A newer navigation started first; this result was dropped.
  Superseded,
  Failed(StitchError),
}

pub struct NavigatorOptions {
  /// Replaced into history when a transition's data fails to load.
  pub error_page: Option<String>,
  /// Caller props forwarded to loaders (router-owned keys are dropped).
  pub extra: Map<String, Value>,
  pub viewport: Arc<dyn Viewport>,
  /// Mount prefix of the app, used when bootstrapping.
  pub basename: Option<String>,
}

impl Default for NavigatorOptions {
  fn default() -> Self {
    Self { error_page: None, extra: Map::new(), viewport: Arc::new(NoopViewport), basename: None }
  }
}

impl NavigatorOptions {
  /// Take `[client] error_page` and `[server] basename` from the app config.
  pub fn from_config(config: &StitchConfig) -> Self {
    Self {
      error_page: config.client.error_page.clone(),
      basename: config.server.basename.clone(),
      ..Self::default()
    }
  }
}

struct Session {
  location: Location,
  nav: NavigationState,
  generation: u64,
}

struct Inner {
  routes: Arc<RouteTable>,
  history: Arc<dyn History>,
  viewport: Arc<dyn Viewport>,
  error_page: Option<String>,
  extra: Map<String, Value>,
  cache: PrefetchCache,
  session: Mutex<Session>,
}

/// Client navigation controller. One per running app; clones share state.
#[derive(Clone)]
pub struct Navigator {
  inner: Arc<Inner>,
}

impl Navigator {
  /// Start idle at the history's current location with hydrated `data`.
  pub fn new(
    routes: Arc<RouteTable>,
    history: Arc<dyn History>,
    data: Option<Value>,
    options: NavigatorOptions,
  ) -> Self {
    let location = history.location();
    Self {
      inner: Arc::new(Inner {
        routes,
        history,
        viewport: options.viewport,
        error_page: options.error_page,
        extra: options.extra,
        cache: PrefetchCache::default(),
        session: Mutex::new(Session {
          location,
          nav: NavigationState { data, ..NavigationState::default() },
          generation: 0,
        }),
      }),
    }
  }

  fn session(&self) -> MutexGuard<'_, Session> {
    self.inner.session.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn location(&self) -> Location {
    self.session().location.clone()
  }

  pub fn state(&self) -> NavigationState {
    self.session().nav.clone()
  }

  pub fn phase(&self) -> NavigationPhase {
    self.session().nav.phase
  }

  pub fn cache(&self) -> &PrefetchCache {
    &self.inner.cache
  }

  /// Handle a new active location. A different matched route starts a
  /// transition: scroll to the top, keep the outgoing location on screen,
  /// clear data and load the incoming route. Only the latest transition may
  /// apply its result.
  pub async fn location_changed(&self, next: Location) -> NavigationOutcome {
    let routes = &self.inner.routes;
    let generation = {
      let mut session = self.session();
      let prev = std::mem::replace(&mut session.location, next.clone());
      let from = routes.match_path(&prev.pathname).map(|m| m.route_index);
      let to = routes.match_path(&next.pathname).map(|m| m.route_index);
      if from == to {
        return NavigationOutcome::Unchanged;
      }

      session.generation += 1;

      if let Some(data) = self.inner.cache.get(&next.pathname) {
        tracing::debug!(pathname = %next.pathname, "navigation served from prefetch cache");
        session.nav = NavigationState {
          previous_location: None,
          data: Some(data),
          phase: NavigationPhase::Idle,
        };
        None
      } else {
        // A transition already in flight keeps the view that is on screen.
        if session.nav.phase == NavigationPhase::Idle {
          session.nav.previous_location = Some(prev);
        }
        session.nav.data = None;
        session.nav.phase = NavigationPhase::Transitioning;
        Some(session.generation)
      }
    };

    // The viewport may call back into the navigator, so the session is unlocked here.
    self.inner.viewport.scroll_to(0, 0);
    let Some(generation) = generation else {
      return NavigationOutcome::FromCache;
    };

    tracing::debug!(pathname = %next.pathname, generation, "transition started");
    let ctx = LoadContext::default()
      .with_location(next.clone())
      .with_history(self.inner.history.clone())
      .with_extra(&self.inner.extra);
    let result = load_initial_props(routes, &next.pathname, ctx).await;

    let mut session = self.session();
    if session.generation != generation {
      tracing::debug!(pathname = %next.pathname, generation, "discarding stale navigation result");
      return NavigationOutcome::Superseded;
    }

    match result {
      Ok(loaded) => {
        session.nav = NavigationState {
          previous_location: None,
          data: loaded.data,
          phase: NavigationPhase::Idle,
        };
        NavigationOutcome::Completed
      }
      Err(err) => {
        tracing::error!(
          pathname = %next.pathname,
          code = err.code(),
          error = %err,
          "navigation failed"
        );
        session.nav.phase = NavigationPhase::Idle;
        drop(session);
        if let Some(ref page) = self.inner.error_page {
          self.inner.history.replace(page);
        }
        NavigationOutcome::Failed(err)
      }
    }
  }

  /// Feed the history's current location into [`Self::location_changed`].
  pub async fn sync_with_history(&self) -> NavigationOutcome {
    self.location_changed(self.inner.history.location()).await
  }

  /// Load `pathname` ahead of time and keep its data. Failures are logged and
  /// not cached.
  pub async fn prefetch(&self, pathname: &str) {
    let ctx = LoadContext::default().with_history(self.inner.history.clone());
    match load_initial_props(&self.inner.routes, pathname, ctx).await {
      Ok(loaded) => {
        if let Some(data) = loaded.data {
          self.inner.cache.insert(pathname, data);
        }
      }
      Err(err) => tracing::warn!(pathname, error = %err, "prefetch failed"),
    }
  }

  /// Prefetch trigger for views. Holds the navigator weakly.
  pub fn prefetch_fn(&self) -> PrefetchFn {
    let weak: Weak<Inner> = Arc::downgrade(&self.inner);
    Arc::new(move |pathname: String| {
      let weak = weak.clone();
      Box::pin(async move {
        if let Some(inner) = weak.upgrade() {
          Navigator { inner }.prefetch(&pathname).await;
        }
      })
    })
  }

  /// Data the active view renders with: a prefetched entry for the current
  /// pathname wins over loaded state.
  pub fn effective_data(&self) -> Option<Value> {
    self.data_for(&self.session())
  }

  fn data_for(&self, session: &Session) -> Option<Value> {
    self.inner.cache.get(&session.location.pathname).or_else(|| session.nav.data.clone())
  }

  /// Render the route for the previous location while transitioning, else
  /// for the current one.
  pub fn render(&self) -> Option<RenderedView> {
    let (location, data) = {
      let session = self.session();
      let location =
        session.nav.previous_location.clone().unwrap_or_else(|| session.location.clone());
      (location, self.data_for(&session))
    };
    render_switch(
      &self.inner.routes,
      SwitchProps {
        location: &location,
        data: data.as_ref(),
        history: Some(self.inner.history.clone()),
        prefetch: Some(self.prefetch_fn()),
      },
    )
  }
}
