//! Chat component flattening.
//!
//! Servers send chat and disconnect reasons as JSON components. The bot only
//! ever needs the visible text: trigger matching and reason classification
//! both run over the flattened form.

use serde_json::Value;

/// Extract the plain text of a chat-component document. Unparseable input is
/// returned as-is, so a bare reason string still classifies correctly.
pub fn plain_text(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            let mut out = String::new();
            collect(&value, &mut out);
            if out.is_empty() {
                raw.to_string()
            } else {
                out
            }
        }
        Err(_) => raw.to_string(),
    }
}

fn collect(value: &Value, out: &mut String) {
    match value {
        Value::String(s) => out.push_str(s),
        Value::Array(parts) => {
            for part in parts {
                collect(part, out);
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(s)) = map.get("text") {
                out.push_str(s);
            } else if let Some(Value::String(key)) = map.get("translate") {
                // No translation tables here; the key itself is still useful
                // for substring matching (e.g. "multiplayer.disconnect.kicked").
                out.push_str(key);
            }
            if let Some(Value::Array(extra)) = map.get("extra") {
                for part in extra {
                    collect(part, out);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::plain_text;

    #[test]
    fn simple_text_object() {
        assert_eq!(plain_text(r#"{"text":"Please /login first"}"#), "Please /login first");
    }

    #[test]
    fn extra_parts_are_concatenated() {
        let raw = r#"{"text":"","extra":[{"text":"Use "},{"text":"/register","color":"gold"},{"text":" <pass> <pass>"}]}"#;
        assert_eq!(plain_text(raw), "Use /register <pass> <pass>");
    }

    #[test]
    fn bare_json_string() {
        assert_eq!(plain_text(r#""Connection throttled! Please wait.""#), "Connection throttled! Please wait.");
    }

    #[test]
    fn translate_key_falls_through() {
        assert_eq!(
            plain_text(r#"{"translate":"multiplayer.disconnect.server_full"}"#),
            "multiplayer.disconnect.server_full"
        );
    }

    #[test]
    fn invalid_json_passes_through() {
        assert_eq!(plain_text("You were kicked"), "You were kicked");
    }
}
