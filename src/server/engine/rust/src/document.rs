/* src/server/engine/rust/src/document.rs */

use std::sync::Arc;

use serde_json::{Map, Value};
use stitch_core::escape::escape_html;
use stitch_core::{BoxFuture, Head, MatchResult, RequestInfo, StitchError, payload_script};

use crate::assets::Assets;
use crate::page::RenderPage;

/// Token a document leaves where the page markup goes. Only the first
/// occurrence is replaced.
pub const PLACEHOLDER: &str = "DO_NOT_DELETE_THIS_YOU_WILL_BREAK_YOUR_APP";

/// Bundle entry the default document loads.
pub const CLIENT_ENTRY: &str = "client";

/// Inputs of a document's initial-props hook.
pub struct DocumentCtx {
  pub request: Arc<RequestInfo>,
  pub assets: Arc<Assets>,
  pub render_page: RenderPage,
  /// Page markup already rendered with the default settings.
  pub markup: String,
  pub head: Head,
  pub data: Option<Value>,
  pub route_match: MatchResult,
  pub extra: Map<String, Value>,
}

/// What a document renders from. `markup` replaces [`PLACEHOLDER`].
#[derive(Debug, Clone, Default)]
pub struct DocumentProps {
  pub markup: String,
  pub head: Head,
  pub assets: Arc<Assets>,
  pub data: Option<Value>,
  pub extra: Map<String, Value>,
}

/// The template wrapped around every server-rendered page.
pub trait Document: Send + Sync {
  fn get_initial_props(&self, ctx: DocumentCtx) -> BoxFuture<Result<DocumentProps, StitchError>>;

  /// Document markup holding [`PLACEHOLDER`] and the hydration payload.
  fn render(&self, props: &DocumentProps) -> Result<String, StitchError>;
}

/// Plain html shell: head tags, client stylesheet, root element, payload
/// and client script.
#[derive(Debug, Clone)]
pub struct DefaultDocument {
  root_id: String,
}

impl DefaultDocument {
  pub fn new(root_id: impl Into<String>) -> Self {
    Self { root_id: root_id.into() }
  }
}

impl Default for DefaultDocument {
  fn default() -> Self {
    Self::new("root")
  }
}

impl Document for DefaultDocument {
  fn get_initial_props(&self, ctx: DocumentCtx) -> BoxFuture<Result<DocumentProps, StitchError>> {
    Box::pin(async move {
      let mut extra = ctx.extra;
      let page = ctx.render_page.render().await?;
      extra.extend(page.extra);
      Ok(DocumentProps {
        markup: page.markup,
        head: page.head,
        assets: ctx.assets,
        data: ctx.data,
        extra,
      })
    })
  }

  fn render(&self, props: &DocumentProps) -> Result<String, StitchError> {
    let mut html = String::from(r#"<html lang="en"><head><meta charset="utf-8">"#);
    html.push_str(r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#);
    html.push_str(&props.head.to_html());
    html.push_str(&props.assets.style_tag(CLIENT_ENTRY));
    html.push_str("</head><body>");
    html.push_str(&format!(r#"<div id="{}">{PLACEHOLDER}</div>"#, escape_html(&self.root_id)));
    html.push_str(&payload_script(props.data.as_ref())?);
    html.push_str(&props.assets.script_tag(CLIENT_ENTRY));
    html.push_str("</body></html>");
    Ok(html)
  }
}

/// Put the page markup into the document and prepend the doctype.
pub fn assemble(document_html: &str, markup: &str) -> String {
  format!("<!doctype html>{}", document_html.replacen(PLACEHOLDER, markup, 1))
}
