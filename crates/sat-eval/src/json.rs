//! Response body decoding.

use sat_types::ast::{Expression, Primitive};
use sat_types::Location;
use serde_json::Value;

/// Turn a response body into a primitive.
///
/// Bodies starting with `{` or `[` (after whitespace) are decoded as JSON;
/// everything else, including JSON that fails to decode, stays a String.
pub fn decode_body(body: &str, location: &Location) -> Primitive {
    let trimmed = body.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Primitive::String(body.to_string());
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => json_to_primitive(value, location),
        Err(err) => {
            log::debug!(target: "sat", "response body is not valid JSON, keeping text: {err}");
            Primitive::String(body.to_string())
        }
    }
}

/// Convert decoded JSON. Nested values become literal expressions located
/// at the request that produced them.
pub fn json_to_primitive(value: Value, location: &Location) -> Primitive {
    let literal = |value: Value| {
        Expression::primitive(json_to_primitive(value, location), location.clone())
    };
    match value {
        Value::Null => Primitive::Void,
        Value::Bool(b) => Primitive::Boolean(b),
        Value::Number(n) => Primitive::Number(n.as_f64().unwrap_or(f64::NAN) as f32),
        Value::String(s) => Primitive::String(s),
        Value::Array(items) => Primitive::Array(items.into_iter().map(literal).collect()),
        Value::Object(props) => Primitive::Object(
            props
                .into_iter()
                .map(|(key, value)| (key, literal(value)))
                .collect(),
        ),
    }
}
