/* demo/backend/rust/src/main.rs */

mod pages;

use std::path::Path;

use stitch_core::StitchConfig;
use stitch_core::config::CONFIG_FILE;
use stitch_server_axum::{IntoAxumRouter, StitchApp};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stitch_demo=info,stitch_engine=info,stitch_server_axum=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = StitchConfig::load_or_default(Path::new(CONFIG_FILE))?;
  tracing::info!(addr = %config.server.addr, basename = ?config.server.basename, "config loaded");

  let app = StitchApp::from_config(pages::routes()?, &config, Path::new("."))?;
  app.serve(&config.server.addr).await
}
