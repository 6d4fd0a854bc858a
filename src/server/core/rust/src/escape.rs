/* src/server/core/rust/src/escape.rs */

/// Make serialized JSON safe to place inside a `<script>` element.
///
/// Inside JSON strings, `<`, `>` and `&` become `\u003c`, `\u003e` and
/// `\u0026`, so the text can never close the element or open a comment.
/// Non-ASCII codepoints become `\uXXXX` (surrogate pairs outside the BMP),
/// which also covers U+2028 and U+2029. The output is still valid JSON that
/// parses to the same value.
pub fn escape_json_for_script(json: &str) -> String {
  let mut out = String::with_capacity(json.len());
  let mut in_string = false;
  let mut chars = json.chars();

  while let Some(ch) = chars.next() {
    if !in_string {
      if ch == '"' {
        in_string = true;
      }
      out.push(ch);
      continue;
    }
    match ch {
      '\\' => {
        out.push(ch);
        if let Some(next) = chars.next() {
          out.push(next);
        }
      }
      '"' => {
        in_string = false;
        out.push(ch);
      }
      '<' | '>' | '&' => push_unit(&mut out, ch as u32),
      c if c as u32 > 0x7F => {
        let code = c as u32;
        if code > 0xFFFF {
          let adjusted = code - 0x1_0000;
          push_unit(&mut out, (adjusted >> 10) + 0xD800);
          push_unit(&mut out, (adjusted & 0x3FF) + 0xDC00);
        } else {
          push_unit(&mut out, code);
        }
      }
      c => out.push(c),
    }
  }
  out
}

fn push_unit(out: &mut String, unit: u32) {
  out.push_str(&format!("\\u{unit:04x}"));
}

pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#x27;"),
      c => out.push(c),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ascii_passthrough() {
    let input = r#"{"key":"hello"}"#;
    assert_eq!(escape_json_for_script(input), input);
  }

  #[test]
  fn closing_script_tag_neutralized() {
    let input = r#"{"bio":"</script><script>alert(1)</script>"}"#;
    let out = escape_json_for_script(input);
    assert!(!out.contains("</script>"));
    assert!(out.contains(r"\u003c/script\u003e"));
  }

  #[test]
  fn ampersand_escaped() {
    assert_eq!(escape_json_for_script(r#"["a&b"]"#), r#"["a\u0026b"]"#);
  }

  #[test]
  fn escapes_cjk_in_values() {
    let input = "{\"msg\":\"\u{4f60}\u{597d}\"}";
    assert_eq!(escape_json_for_script(input), r#"{"msg":"\u4f60\u597d"}"#);
  }

  #[test]
  fn line_separators_escaped() {
    let input = "[\"a\u{2028}b\u{2029}\"]";
    assert_eq!(escape_json_for_script(input), r#"["a\u2028b\u2029"]"#);
  }

  #[test]
  fn surrogate_pair_for_emoji() {
    let input = "{\"emoji\":\"\u{1F600}\"}";
    assert_eq!(escape_json_for_script(input), r#"{"emoji":"\ud83d\ude00"}"#);
  }

  #[test]
  fn preserves_existing_escapes() {
    let input = r#"{"a":"line\nbreak","b":"say \"hi\""}"#;
    assert_eq!(escape_json_for_script(input), input);
  }

  #[test]
  fn output_parses_to_same_value() {
    let value = serde_json::json!({"html": "<b>&amp;</b>", "name": "Zo\u{eb}"});
    let escaped = escape_json_for_script(&value.to_string());
    let back: serde_json::Value = serde_json::from_str(&escaped).unwrap();
    assert_eq!(back, value);
  }

  #[test]
  fn html_escape() {
    assert_eq!(
      escape_html(r#"<a href="x">'&'</a>"#),
      "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
    );
  }
}

