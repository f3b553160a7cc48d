use serde_json::Value;

use crate::{errors::Error, Result};

/// Check the shape of a homework-statuses payload and return its records.
///
/// The payload must be an object whose `homeworks` field is a non-empty array.
/// An empty list is rejected like any other shape problem: the loop only knows
/// how to react to at least one record.
pub fn check_response(response: &Value) -> Result<&[Value]> {
    let Some(obj) = response.as_object() else {
        return Err(reject("response is not a JSON object"));
    };
    let Some(homeworks) = obj.get("homeworks") else {
        return Err(reject("response has no \"homeworks\" field"));
    };
    let Some(homeworks) = homeworks.as_array() else {
        return Err(reject("\"homeworks\" is not a list"));
    };
    if homeworks.is_empty() {
        return Err(reject("\"homeworks\" is empty"));
    }

    tracing::info!("API response checked: {} homework(s)", homeworks.len());
    Ok(homeworks)
}

/// Server-side timestamp to use as the next `from_date`, if the payload carries one.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

fn reject(reason: &str) -> Error {
    tracing::error!("malformed API response: {reason}");
    Error::MalformedResponse(reason.to_string())
}
