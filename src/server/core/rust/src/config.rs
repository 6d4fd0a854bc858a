/* src/server/core/rust/src/config.rs */

use std::path::Path;

use serde::Deserialize;

use crate::errors::StitchError;

pub const CONFIG_FILE: &str = "stitch.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StitchConfig {
  #[serde(default)]
  pub server: ServerSection,
  #[serde(default)]
  pub render: RenderSection,
  #[serde(default)]
  pub client: ClientSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
  #[serde(default = "default_addr")]
  pub addr: String,
  /// Mount prefix stripped from request paths, e.g. `/app`.
  pub basename: Option<String>,
}

impl Default for ServerSection {
  fn default() -> Self {
    Self { addr: default_addr(), basename: None }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderSection {
  /// Bundler output mapping entry names to script and style urls.
  pub assets_manifest: Option<String>,
  #[serde(default = "default_root_id")]
  pub root_id: String,
}

impl Default for RenderSection {
  fn default() -> Self {
    Self { assets_manifest: None, root_id: default_root_id() }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSection {
  /// Where the client goes when a transition's data fails to load.
  pub error_page: Option<String>,
}

fn default_addr() -> String {
  "0.0.0.0:3000".to_string()
}

fn default_root_id() -> String {
  "root".to_string()
}

impl StitchConfig {
  pub fn from_toml_str(content: &str) -> Result<Self, StitchError> {
    let config: Self = toml::from_str(content)
      .map_err(|e| StitchError::config(format!("invalid {CONFIG_FILE}: {e}")))?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: &Path) -> Result<Self, StitchError> {
    let content = std::fs::read_to_string(path)
      .map_err(|e| StitchError::config(format!("read {}: {e}", path.display())))?;
    Self::from_toml_str(&content)
  }

  /// Like [`Self::load`], but a missing file yields the defaults.
  pub fn load_or_default(path: &Path) -> Result<Self, StitchError> {
    if !path.exists() {
      tracing::info!(path = %path.display(), "no config file, using defaults");
      return Ok(Self::default());
    }
    Self::load(path)
  }

  pub fn validate(&self) -> Result<(), StitchError> {
    if let Some(ref base) = self.server.basename {
      if !base.starts_with('/') || base.ends_with('/') {
        return Err(StitchError::config(format!(
          "server.basename \"{base}\" must start with '/' and must not end with '/'"
        )));
      }
    }
    if let Some(ref page) = self.client.error_page {
      if !page.starts_with('/') {
        return Err(StitchError::config(format!(
          "client.error_page \"{page}\" must start with '/'"
        )));
      }
    }
    if self.render.root_id.is_empty() {
      return Err(StitchError::config("render.root_id must not be empty"));
    }
    Ok(())
  }
}
