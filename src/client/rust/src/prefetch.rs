/* src/client/rust/src/prefetch.rs */

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

/// Pathname to prefetched data. Entries are never evicted.
#[derive(Default)]
pub struct PrefetchCache {
  entries: Mutex<HashMap<String, Value>>,
}

impl PrefetchCache {
  pub fn get(&self, pathname: &str) -> Option<Value> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(pathname).cloned()
  }

  pub fn contains(&self, pathname: &str) -> bool {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).contains_key(pathname)
  }

  pub fn insert(&self, pathname: impl Into<String>, data: Value) {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).insert(pathname.into(), data);
  }

  pub fn len(&self) -> usize {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
