/* src/server/engine/rust/src/assets.rs */

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stitch_core::StitchError;
use stitch_core::escape::escape_html;

/// Script and stylesheet urls of one bundle entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub js: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub css: Option<String>,
}

/// Bundler asset manifest: `{ "client": { "js": "...", "css": "..." } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assets {
  entries: BTreeMap<String, AssetEntry>,
}

impl Assets {
  pub fn from_json_str(content: &str) -> Result<Self, StitchError> {
    serde_json::from_str(content)
      .map_err(|e| StitchError::config(format!("invalid assets manifest: {e}")))
  }

  pub fn load(path: &Path) -> Result<Self, StitchError> {
    let content = std::fs::read_to_string(path)
      .map_err(|e| StitchError::config(format!("read {}: {e}", path.display())))?;
    Self::from_json_str(&content)
  }

  pub fn with_entry(mut self, name: impl Into<String>, entry: AssetEntry) -> Self {
    self.entries.insert(name.into(), entry);
    self
  }

  pub fn entry(&self, name: &str) -> Option<&AssetEntry> {
    self.entries.get(name)
  }

  /// `<link rel="stylesheet">` for the entry, empty when it has no css.
  pub fn style_tag(&self, name: &str) -> String {
    self
      .entry(name)
      .and_then(|e| e.css.as_deref())
      .map(|href| format!(r#"<link rel="stylesheet" href="{}">"#, escape_html(href)))
      .unwrap_or_default()
  }

  /// Deferred `<script>` for the entry, empty when it has no js.
  pub fn script_tag(&self, name: &str) -> String {
    self
      .entry(name)
      .and_then(|e| e.js.as_deref())
      .map(|src| format!(r#"<script src="{}" defer crossorigin></script>"#, escape_html(src)))
      .unwrap_or_default()
  }
}
