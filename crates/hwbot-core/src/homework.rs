use serde::Deserialize;
use serde_json::Value;

use crate::{domain::HomeworkStatus, errors::Error, Result};

/// The fields of a homework record the bot cares about.
///
/// Non-string values are treated the same as absent ones.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Homework {
    #[serde(default, deserialize_with = "string_or_none")]
    pub homework_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub status: Option<String>,
}

impl Homework {
    pub fn from_value(record: &Value) -> Result<Self> {
        if !record.is_object() {
            tracing::error!("homework record is not a JSON object");
            return Err(Error::MalformedResponse(
                "homework record is not a JSON object".to_string(),
            ));
        }
        Homework::deserialize(record).map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}

/// Build the status-change message for one homework record.
pub fn parse_status(record: &Value) -> Result<String> {
    let homework = Homework::from_value(record)?;

    let Some(name) = homework.homework_name else {
        tracing::error!("homework record has no \"homework_name\"");
        return Err(Error::MissingField("homework_name"));
    };
    let Some(code) = homework.status else {
        tracing::error!("homework record has no \"status\"");
        return Err(Error::MissingField("status"));
    };
    let Some(status) = HomeworkStatus::from_code(&code) else {
        tracing::error!("unknown homework status \"{code}\"");
        return Err(Error::UnknownStatus(code));
    };

    tracing::info!("homework \"{name}\" has status {status}");
    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}
