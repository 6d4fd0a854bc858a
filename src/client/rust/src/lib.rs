/* src/client/rust/src/lib.rs */

pub mod history;
pub mod navigator;
pub mod prefetch;
pub mod ready;

pub use history::MemoryHistory;
pub use navigator::{
  NavigationOutcome, NavigationPhase, NavigationState, Navigator, NavigatorOptions, NoopViewport,
  Viewport,
};
pub use prefetch::PrefetchCache;
pub use ready::{HtmlDocument, HydrationSource, bootstrap, ensure_ready};
