/* src/client/rust/src/history.rs */

use std::sync::{Mutex, MutexGuard, PoisonError};

use stitch_core::{History, Location};

/// In-memory session history: a stack of entries and a cursor.
pub struct MemoryHistory {
  inner: Mutex<Entries>,
}

struct Entries {
  stack: Vec<Location>,
  index: usize,
}

impl MemoryHistory {
  pub fn new(initial: &str) -> Self {
    Self { inner: Mutex::new(Entries { stack: vec![Location::parse(initial)], index: 0 }) }
  }

  fn entries(&self) -> MutexGuard<'_, Entries> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Snapshot of every entry, oldest first.
  pub fn stack(&self) -> Vec<Location> {
    self.entries().stack.clone()
  }

  pub fn len(&self) -> usize {
    self.entries().stack.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries().stack.is_empty()
  }

  /// Step back one entry. Returns false at the start of the stack.
  pub fn back(&self) -> bool {
    let mut entries = self.entries();
    if entries.index == 0 {
      return false;
    }
    entries.index -= 1;
    true
  }
}

impl History for MemoryHistory {
  fn location(&self) -> Location {
    let entries = self.entries();
    entries.stack[entries.index].clone()
  }

  fn push(&self, url: &str) {
    let mut entries = self.entries();
    let next = entries.index + 1;
    entries.stack.truncate(next);
    entries.stack.push(Location::parse(url));
    entries.index = next;
  }

  fn replace(&self, url: &str) {
    let mut entries = self.entries();
    let index = entries.index;
    entries.stack[index] = Location::parse(url);
  }
}
