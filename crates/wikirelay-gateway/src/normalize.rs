//! Response normalization for outbound platform calls.

use serde_json::{json, Value};

use wikirelay_core::{Error, Result};

/// Turn a raw HTTP response into parsed JSON or a typed upstream failure.
///
/// An empty body parses as `{}`; a non-JSON body is wrapped as
/// `{"rawBody": "<text>"}` rather than failing. Any status outside
/// 200–299 is an error regardless of body shape, with the parsed-or-wrapped
/// body attached as details.
pub async fn normalize(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;
    let json = parse_body(&text);

    if !status.is_success() {
        return Err(Error::Upstream {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            details: json,
        });
    }

    Ok(json)
}

/// Best-effort body parse shared by [`normalize`] and the delete path.
pub(crate) fn parse_body(text: &str) -> Value {
    if text.is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "rawBody": text }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_empty_is_empty_object() {
        assert_eq!(parse_body(""), json!({}));
    }

    #[test]
    fn test_parse_body_valid_json_passes_through() {
        assert_eq!(
            parse_body(r#"{"id": "123", "title": "T"}"#),
            json!({"id": "123", "title": "T"})
        );
    }

    #[test]
    fn test_parse_body_non_json_wrapped_under_raw_body() {
        assert_eq!(
            parse_body("<html>Service Unavailable</html>"),
            json!({"rawBody": "<html>Service Unavailable</html>"})
        );
    }
}
