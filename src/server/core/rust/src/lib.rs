/* src/server/core/rust/src/lib.rs */

pub mod config;
pub mod errors;
pub mod escape;
pub mod history;
pub mod hydration;
pub mod loader;
pub mod location;
pub mod matcher;
pub mod route;
pub mod view;

// Re-exports for ergonomic use
pub use config::StitchConfig;
pub use errors::StitchError;
pub use history::{History, StaticHistory};
pub use hydration::{HYDRATION_ELEMENT_ID, decode_payload, encode_payload, payload_script};
pub use loader::{InitialPropsCtx, LoadContext, LoadResult, RequestInfo, load_initial_props};
pub use location::{Location, has_basename, normalize_path, strip_basename};
pub use matcher::{CATCH_ALL, MatchResult, fill_pattern};
pub use route::{
  BoxFuture, Capabilities, ComponentFn, InitialPropsFn, LoadFn, RouteDescriptor, RouteTable,
  ViewRef,
};
pub use view::{Head, PrefetchFn, RenderedView, SwitchProps, ViewProps, render_switch};
