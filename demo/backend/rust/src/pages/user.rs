/* demo/backend/rust/src/pages/user.rs */

use serde::Serialize;
use stitch_core::escape::escape_html;
use stitch_core::{Head, InitialPropsCtx, StitchError, ViewProps, ViewRef};

#[derive(Serialize)]
pub struct UserProfile {
  pub id: u32,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avatar: Option<String>,
}

struct UserData {
  id: u32,
  name: &'static str,
  email: &'static str,
  avatar: Option<&'static str>,
}

const USERS: &[UserData] = &[
  UserData {
    id: 1,
    name: "Alice",
    email: "alice@example.com",
    avatar: Some("https://example.com/alice.png"),
  },
  UserData { id: 2, name: "Bob", email: "bob@example.com", avatar: None },
  UserData { id: 3, name: "Charlie", email: "charlie@example.com", avatar: None },
];

async fn fetch_user(ctx: InitialPropsCtx) -> Result<serde_json::Value, StitchError> {
  let raw = ctx.param("id").unwrap_or_default();
  let id: u32 =
    raw.parse().map_err(|_| StitchError::data_fetch(format!("invalid user id '{raw}'")))?;
  let user = USERS
    .iter()
    .find(|u| u.id == id)
    .ok_or_else(|| StitchError::data_fetch(format!("User {id} not found")))?;

  let profile = UserProfile {
    id: user.id,
    name: user.name.to_string(),
    email: user.email.to_string(),
    avatar: user.avatar.map(str::to_string),
  };
  serde_json::to_value(profile).map_err(|e| StitchError::internal(e.to_string()))
}

fn render(props: &ViewProps, head: &mut Head) -> String {
  let raw_name = props.prop_str("name").unwrap_or("unknown");
  head.set_title(format!("{raw_name} | Stitch demo"));
  head.meta("description", &format!("Profile of {raw_name}"));
  let name = escape_html(raw_name);
  let email = escape_html(props.prop_str("email").unwrap_or_default());
  let avatar = props
    .prop_str("avatar")
    .map(|src| format!(r#"<img src="{}" alt="">"#, escape_html(src)))
    .unwrap_or_default();
  format!("<article>{avatar}<h1>{name}</h1><a href=\"mailto:{email}\">{email}</a></article>")
}

pub fn view() -> ViewRef {
  ViewRef::new("user", render).data_fetching(fetch_user)
}
