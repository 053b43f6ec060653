use serde_json::Value;

use crate::error::PollError;

/// Checks the shape of a decoded API response and returns its homework list,
/// newest first, exactly as the API sent it.
pub fn check_response(response: &Value) -> Result<&[Value], PollError> {
    let body = response.as_object().ok_or(PollError::Shape {
        what: "response",
        expected: "object",
        found: json_type(response),
    })?;
    let homeworks = body
        .get("homeworks")
        .ok_or(PollError::MissingField("homeworks"))?;
    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(PollError::Shape {
            what: "homeworks",
            expected: "array",
            found: json_type(homeworks),
        })
}

/// Server time of the response. Zero, negative or missing values are ignored.
pub fn current_date(response: &Value) -> Option<i64> {
    response
        .get("current_date")
        .and_then(Value::as_i64)
        .filter(|date| *date > 0)
}

/// Soft failure reported inside an otherwise successful response body.
pub fn service_error(response: &Value) -> Option<PollError> {
    let body = response.as_object()?;
    let field = |key: &str| body.get(key).filter(|value| !value.is_null());
    if field("code").is_none() && field("error").is_none() {
        return None;
    }

    let code = field("code")
        .map(text_of)
        .unwrap_or_else(|| "error".to_string());
    let message = field("message")
        .or_else(|| field("error"))
        .map(text_of)
        .unwrap_or_default();
    Some(PollError::Service { code, message })
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        // {"error": {"error": "Wrong from_date format"}}
        Value::Object(map) => match map.get("error") {
            Some(Value::String(text)) => text.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}
