/* src/server/engine/rust/src/lib.rs */

pub mod assets;
pub mod document;
pub mod page;
pub mod render;

// Public API re-exports
pub use assets::{AssetEntry, Assets};
pub use document::{
  CLIENT_ENTRY, DefaultDocument, Document, DocumentCtx, DocumentProps, PLACEHOLDER, assemble,
};
pub use page::{CustomRenderer, PageWrapFn, RenderPage, RenderTree, RenderedPage};
pub use render::{RenderContext, RenderOptions, RenderOutcome, render};
