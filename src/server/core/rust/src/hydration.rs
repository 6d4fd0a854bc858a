/* src/server/core/rust/src/hydration.rs */

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::StitchError;
use crate::escape::escape_json_for_script;

/// Id of the element carrying the server-computed data.
pub const HYDRATION_ELEMENT_ID: &str = "server-app-state";

/// Serialize route data for embedding. Absent data encodes as `null`.
pub fn encode_payload(data: Option<&Value>) -> Result<String, StitchError> {
  let json = serde_json::to_string(data.unwrap_or(&Value::Null))
    .map_err(|e| StitchError::hydration(format!("serialize payload: {e}")))?;
  Ok(escape_json_for_script(&json))
}

/// The complete hydration element, ready to drop into a document body.
pub fn payload_script(data: Option<&Value>) -> Result<String, StitchError> {
  let payload = encode_payload(data)?;
  Ok(format!(r#"<script id="{HYDRATION_ELEMENT_ID}" type="application/json">{payload}</script>"#))
}

/// Parse payload text as plain JSON. `null` decodes to `None`.
pub fn decode_payload(text: &str) -> Result<Option<Value>, StitchError> {
  let value: Value = serde_json::from_str(text.trim())
    .map_err(|e| StitchError::hydration(format!("malformed payload: {e}")))?;
  Ok(if value.is_null() { None } else { Some(value) })
}

/// Decode straight into the shape a view expects.
pub fn decode_payload_as<T: DeserializeOwned>(text: &str) -> Result<T, StitchError> {
  serde_json::from_str(text.trim())
    .map_err(|e| StitchError::hydration(format!("payload does not fit schema: {e}")))
}

/// Text content of the `<script id="...">` element in `html`, if present.
pub fn extract_element_text<'a>(html: &'a str, id: &str) -> Option<&'a str> {
  let marker = format!(r#"id="{id}""#);
  let at = html.find(&marker)?;
  let open_start = html[..at].rfind('<')?;
  let open_end = open_start + html[open_start..].find('>')?;
  let body = &html[open_end + 1..];
  let close = body.find("</script>")?;
  Some(&body[..close])
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;
  use serde_json::json;

  use super::*;

  #[test]
  fn round_trip_preserves_structure() {
    let data = json!({
      "name": "Alice",
      "bio": "</script><!-- & -->",
      "tags": ["a", "\u{1F600}"],
      "nested": {"n": 1.5, "ok": true, "none": null}
    });
    let script = payload_script(Some(&data)).unwrap();
    let text = extract_element_text(&script, HYDRATION_ELEMENT_ID).unwrap();
    assert_eq!(decode_payload(text).unwrap(), Some(data));
  }

  #[test]
  fn absent_data_round_trips_to_none() {
    let script = payload_script(None).unwrap();
    let text = extract_element_text(&script, HYDRATION_ELEMENT_ID).unwrap();
    assert_eq!(text, "null");
    assert_eq!(decode_payload(text).unwrap(), None);
  }

  #[test]
  fn expressions_are_rejected() {
    let err = decode_payload("(function(){ return 1 })()").unwrap_err();
    assert_eq!(err.code(), "HYDRATION_ERROR");
  }

  #[test]
  fn typed_decode_validates_shape() {
    #[derive(Deserialize)]
    struct User {
      name: String,
    }
    let user: User = decode_payload_as(r#"{"name":"Alice"}"#).unwrap();
    assert_eq!(user.name, "Alice");
    assert!(decode_payload_as::<User>(r#"{"id":1}"#).is_err());
  }

  #[test]
  fn extract_ignores_other_scripts() {
    let html = concat!(
      r#"<body><script src="/a.js"></script>"#,
      r#"<script id="server-app-state" type="application/json">{"a":1}</script></body>"#,
    );
    assert_eq!(extract_element_text(html, HYDRATION_ELEMENT_ID), Some(r#"{"a":1}"#));
    assert_eq!(extract_element_text(html, "missing"), None);
  }
}
