/* src/server/core/rust/src/view.rs */

use std::sync::Arc;

use serde_json::Value;

use crate::escape::escape_html;
use crate::history::History;
use crate::location::Location;
use crate::matcher::MatchResult;
use crate::route::{BoxFuture, RouteTable};

/// Trigger handed to views for eager loading of another pathname.
pub type PrefetchFn = Arc<dyn Fn(String) -> BoxFuture<()> + Send + Sync>;

/// Everything a view receives when it renders.
#[derive(Clone)]
pub struct ViewProps {
  pub data: Option<Value>,
  pub location: Location,
  pub route_match: MatchResult,
  pub history: Option<Arc<dyn History>>,
  pub prefetch: Option<PrefetchFn>,
}

impl ViewProps {
  /// Look up a top-level field of the loaded data.
  pub fn prop(&self, key: &str) -> Option<&Value> {
    self.data.as_ref().and_then(|d| d.get(key))
  }

  pub fn prop_str(&self, key: &str) -> Option<&str> {
    self.prop(key).and_then(Value::as_str)
  }
}

/// Document head metadata collected out of band while views render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Head {
  pub title: Option<String>,
  pub tags: Vec<String>,
}

impl Head {
  pub fn set_title(&mut self, title: impl Into<String>) {
    self.title = Some(title.into());
  }

  pub fn meta(&mut self, name: &str, content: &str) {
    self.tags.push(format!(
      r#"<meta name="{}" content="{}">"#,
      escape_html(name),
      escape_html(content)
    ));
  }

  pub fn push_tag(&mut self, tag: impl Into<String>) {
    self.tags.push(tag.into());
  }

  pub fn merge(&mut self, other: Head) {
    if other.title.is_some() {
      self.title = other.title;
    }
    self.tags.extend(other.tags);
  }

  pub fn to_html(&self) -> String {
    let mut out = String::new();
    if let Some(ref title) = self.title {
      out.push_str(&format!("<title>{}</title>", escape_html(title)));
    }
    for tag in &self.tags {
      out.push_str(tag);
    }
    out
  }
}

#[derive(Debug, Clone)]
pub struct RenderedView {
  pub markup: String,
  pub head: Head,
  pub route_match: MatchResult,
}

/// Inputs of one route-switch render.
#[derive(Clone)]
pub struct SwitchProps<'a> {
  pub location: &'a Location,
  pub data: Option<&'a Value>,
  pub history: Option<Arc<dyn History>>,
  pub prefetch: Option<PrefetchFn>,
}

/// Render the first route matching `props.location`. Redirect-only routes and
/// unmatched locations render nothing.
pub fn render_switch(routes: &RouteTable, props: SwitchProps<'_>) -> Option<RenderedView> {
  let route_match = routes.match_path(&props.location.pathname)?;
  let view = routes.get(route_match.route_index)?.view.as_ref()?;

  let view_props = ViewProps {
    data: props.data.cloned(),
    location: props.location.clone(),
    route_match: route_match.clone(),
    history: props.history,
    prefetch: props.prefetch,
  };
  let mut head = Head::default();
  let markup = view.render(&view_props, &mut head);
  Some(RenderedView { markup, head, route_match })
}
