/* src/server/core/rust/src/history.rs */

use std::sync::Mutex;

use crate::location::Location;

/// Session history as exposed to views and loaders.
pub trait History: Send + Sync {
  fn location(&self) -> Location;
  fn push(&self, url: &str);
  /// Swap the current entry without growing the back-stack.
  fn replace(&self, url: &str);
}

/// History for a single server render. Navigation calls are recorded, not
/// followed; the last recorded target is exposed through `redirected_to`.
pub struct StaticHistory {
  location: Location,
  redirect: Mutex<Option<String>>,
}

impl StaticHistory {
  pub fn new(location: Location) -> Self {
    Self { location, redirect: Mutex::new(None) }
  }

  pub fn redirected_to(&self) -> Option<String> {
    self.redirect.lock().ok().and_then(|r| r.clone())
  }

  fn record(&self, url: &str) {
    tracing::debug!(url, "navigation requested during server render");
    if let Ok(mut slot) = self.redirect.lock() {
      *slot = Some(url.to_string());
    }
  }
}

impl History for StaticHistory {
  fn location(&self) -> Location {
    self.location.clone()
  }

  fn push(&self, url: &str) {
    self.record(url);
  }

  fn replace(&self, url: &str) {
    self.record(url);
  }
}
