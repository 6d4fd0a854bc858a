/* src/server/adapter/axum/src/lib.rs */

mod error;
mod handler;

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use stitch_core::{RouteTable, StitchConfig, StitchError};
use stitch_engine::{Assets, CustomRenderer, DefaultDocument, Document};

/// Re-export the renderer crates for convenience
pub use stitch_core;
pub use stitch_engine;

/// Everything the server needs to render pages for one app.
pub struct StitchApp {
  routes: Arc<RouteTable>,
  assets: Arc<Assets>,
  basename: Option<String>,
  document: Option<Arc<dyn Document>>,
  custom_renderer: Option<CustomRenderer>,
  extra: Map<String, Value>,
}

impl StitchApp {
  pub fn new(routes: RouteTable) -> Self {
    Self {
      routes: Arc::new(routes),
      assets: Arc::new(Assets::default()),
      basename: None,
      document: None,
      custom_renderer: None,
      extra: Map::new(),
    }
  }

  /// Apply `[server]` and `[render]` settings. The assets manifest path is
  /// resolved against `base_dir`.
  pub fn from_config(
    routes: RouteTable,
    config: &StitchConfig,
    base_dir: &Path,
  ) -> Result<Self, StitchError> {
    let mut app = Self::new(routes);
    app.basename = config.server.basename.clone();
    if let Some(ref manifest) = config.render.assets_manifest {
      app.assets = Arc::new(Assets::load(&base_dir.join(manifest))?);
    }
    if config.render.root_id != "root" {
      app.document = Some(Arc::new(DefaultDocument::new(config.render.root_id.clone())));
    }
    Ok(app)
  }

  pub fn assets(mut self, assets: Assets) -> Self {
    self.assets = Arc::new(assets);
    self
  }

  pub fn basename(mut self, basename: impl Into<String>) -> Self {
    self.basename = Some(basename.into());
    self
  }

  pub fn document(mut self, document: Arc<dyn Document>) -> Self {
    self.document = Some(document);
    self
  }

  pub fn custom_renderer(mut self, renderer: CustomRenderer) -> Self {
    self.custom_renderer = Some(renderer);
    self
  }

  /// Values forwarded to every loader and document render.
  pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
    self.extra.insert(key.into(), value);
    self
  }
}

/// Extension trait that converts a `StitchApp` into an Axum router.
pub trait IntoAxumRouter {
  fn into_axum_router(self) -> axum::Router;
  fn serve(
    self,
    addr: &str,
  ) -> impl std::future::Future<Output = Result<(), Box<dyn std::error::Error>>> + Send;
}

impl IntoAxumRouter for StitchApp {
  fn into_axum_router(self) -> axum::Router {
    tracing::debug!(routes = self.routes.len(), basename = ?self.basename, "building router");
    handler::build_router(self)
  }

  async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = self.into_axum_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("Stitch server running on http://localhost:{}", local_addr.port());
    axum::serve(listener, router).await?;
    Ok(())
  }
}
