//! Normalized request context
//!
//! The per-request view of headers, query parameters, decoded payload and raw
//! body that trigger rules and argument extraction read from. Multi-valued
//! headers and query parameters collapse to their first value; header keys
//! are stored lower-case.

use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Single-valued parameter map
pub type ParameterMap = Map<String, Value>;

const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Per-request data handed from the dispatcher to the execution engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    /// Headers, first value per lower-cased name
    pub headers: ParameterMap,

    /// Query parameters, first value per key
    pub query: ParameterMap,

    /// Decoded JSON or form body, when the content type is one of those
    pub payload: Option<ParameterMap>,

    /// Unparsed request body
    pub raw_body: Vec<u8>,
}

impl RequestContext {
    /// Build a fully normalized context from raw request parts
    ///
    /// Collapses headers and query, decodes the payload according to the
    /// `Content-Type` header and finally applies JSON-parameter
    /// normalization.
    pub fn from_parts<I, K, V>(headers: I, query: Option<&str>, body: Vec<u8>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers = header_map(headers);
        let query = query.map(parse_query).unwrap_or_default();
        let content_type = headers
            .get("content-type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let payload = decode_payload(&content_type, &body);

        let mut context = Self {
            headers,
            query,
            payload,
            raw_body: body,
        };
        context.parse_json_parameters();
        context
    }

    /// Decode JSON objects and arrays embedded in string values
    ///
    /// Applies to the top level of headers, query and payload.
    pub fn parse_json_parameters(&mut self) {
        parse_json_parameters(&mut self.headers);
        parse_json_parameters(&mut self.query);
        if let Some(payload) = self.payload.as_mut() {
            parse_json_parameters(payload);
        }
    }
}

/// Collapse key/value pairs into a map keeping the first value per key
pub fn values_to_map<I, K, V>(pairs: I) -> ParameterMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut map = ParameterMap::new();
    for (key, value) in pairs {
        map.entry(key.into())
            .or_insert_with(|| Value::String(value.into()));
    }
    map
}

/// Collapse header pairs, lower-casing names
pub fn header_map<I, K, V>(headers: I) -> ParameterMap
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    values_to_map(
        headers
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value)),
    )
}

/// Parse a URL-encoded query string, first value per key
pub fn parse_query(query: &str) -> ParameterMap {
    values_to_map(url::form_urlencoded::parse(query.as_bytes()).into_owned())
}

/// Decode a request body according to its content type
///
/// Returns `None` for other content types and for bodies that fail to decode;
/// decode failures are logged and never fatal.
pub fn decode_payload(content_type: &str, body: &[u8]) -> Option<ParameterMap> {
    if content_type.starts_with(JSON_CONTENT_TYPE) {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Some(map),
            Ok(other) => {
                warn!(
                    kind = json_kind(&other),
                    "JSON payload is not an object, ignoring"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "Error parsing JSON payload");
                None
            }
        }
    } else if content_type.starts_with(FORM_CONTENT_TYPE) {
        Some(values_to_map(
            url::form_urlencoded::parse(body).into_owned(),
        ))
    } else {
        debug!(content_type = %content_type, "Payload not decoded for content type");
        None
    }
}

/// Replace string values holding JSON objects or arrays with the decoded value
pub fn parse_json_parameters(map: &mut ParameterMap) {
    for (key, value) in map.iter_mut() {
        let Value::String(raw) = value else {
            continue;
        };
        let trimmed = raw.trim_start();
        if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
            continue;
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(decoded @ (Value::Object(_) | Value::Array(_))) => {
                debug!(key = %key, "Decoded JSON parameter");
                *value = decoded;
            }
            Ok(_) => {}
            Err(e) => {
                debug!(key = %key, error = %e, "Parameter is not valid JSON, keeping string");
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_query_keeps_first_value() {
        let query = parse_query("a=1&a=2&b=x%20y");
        assert_eq!(query.get("a"), Some(&json!("1")));
        assert_eq!(query.get("b"), Some(&json!("x y")));
    }

    #[test]
    fn test_headers_are_lowercased_and_collapsed() {
        let headers = header_map(vec![
            ("X-Token", "first"),
            ("x-token", "second"),
            ("Content-Type", "text/plain"),
        ]);
        assert_eq!(headers.get("x-token"), Some(&json!("first")));
        assert_eq!(headers.get("content-type"), Some(&json!("text/plain")));
    }

    #[test]
    fn test_decode_json_payload() {
        let payload = decode_payload("application/json; charset=utf-8", br#"{"ref": "main"}"#);
        assert_eq!(payload.unwrap().get("ref"), Some(&json!("main")));
    }

    #[test]
    fn test_decode_malformed_json_leaves_payload_absent() {
        assert!(decode_payload("application/json", b"{not json").is_none());
        assert!(decode_payload("application/json", b"[1, 2]").is_none());
    }

    #[test]
    fn test_decode_form_payload() {
        let payload =
            decode_payload("application/x-www-form-urlencoded", b"name=a&name=b&x=1").unwrap();
        assert_eq!(payload.get("name"), Some(&json!("a")));
        assert_eq!(payload.get("x"), Some(&json!("1")));
    }

    #[test]
    fn test_other_content_types_are_not_decoded() {
        assert!(decode_payload("text/plain", b"a=1").is_none());
        assert!(decode_payload("", b"{}").is_none());
    }

    #[test]
    fn test_header_json_string_is_decoded() {
        let mut context = RequestContext {
            headers: header_map(vec![("X-Data", r#"{"x":1}"#)]),
            ..Default::default()
        };
        context.parse_json_parameters();
        assert_eq!(context.headers.get("x-data"), Some(&json!({"x": 1})));
    }

    #[test]
    fn test_scalar_and_invalid_json_strings_are_kept() {
        let mut map = values_to_map(vec![("n", "42"), ("bad", "{oops"), ("list", "[1,2]")]);
        parse_json_parameters(&mut map);
        assert_eq!(map.get("n"), Some(&json!("42")));
        assert_eq!(map.get("bad"), Some(&json!("{oops")));
        assert_eq!(map.get("list"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_from_parts_normalizes_everything() {
        let context = RequestContext::from_parts(
            vec![("Content-Type", "application/json")],
            Some("meta=%7B%22a%22%3A%5B1%5D%7D&msg=hi&msg=ho"),
            br#"{"commit": "{\"id\": \"abc\"}"}"#.to_vec(),
        );

        assert_eq!(context.query.get("msg"), Some(&json!("hi")));
        assert_eq!(context.query.get("meta"), Some(&json!({"a": [1]})));
        let payload = context.payload.as_ref().unwrap();
        assert_eq!(payload.get("commit"), Some(&json!({"id": "abc"})));
        assert_eq!(context.raw_body, br#"{"commit": "{\"id\": \"abc\"}"}"#.to_vec());
    }
}
