/* demo/backend/rust/src/pages/mod.rs */

mod user;

use stitch_core::{CATCH_ALL, Head, RouteDescriptor, RouteTable, StitchError, ViewProps, ViewRef};

fn home() -> ViewRef {
  ViewRef::new("home", |_: &ViewProps, head: &mut Head| {
    head.set_title("Stitch demo");
    let links: String =
      (1..=3).map(|id| format!(r#"<li><a href="/users/{id}">User {id}</a></li>"#)).collect();
    format!("<h1>Users</h1><ul>{links}</ul>")
  })
}

fn error_page() -> ViewRef {
  ViewRef::new("error", |_: &ViewProps, head: &mut Head| {
    head.set_title("Something went wrong");
    "<h1>Something went wrong</h1>".to_string()
  })
}

fn not_found() -> ViewRef {
  ViewRef::new("not-found", |props: &ViewProps, head: &mut Head| {
    head.set_title("Not found");
    format!("<h1>No page at {}</h1>", stitch_core::escape::escape_html(&props.location.pathname))
  })
}

pub fn routes() -> Result<RouteTable, StitchError> {
  RouteTable::new(vec![
    RouteDescriptor::new("/", home()).exact(true),
    RouteDescriptor::new("/users/:id", user::view()).exact(true),
    RouteDescriptor::redirect("/people/:id", "/users/:id"),
    RouteDescriptor::new("/error", error_page()).exact(true),
    RouteDescriptor::new(CATCH_ALL, not_found()),
  ])
}
