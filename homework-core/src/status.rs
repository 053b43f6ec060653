use serde_json::Value;

use crate::error::PollError;
use crate::response::json_type;

/// Review status reported for a homework, with its fixed verdict sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    /// Looks up the status code used by the API.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Verdict::Approved),
            "reviewing" => Some(Verdict::Reviewing),
            "rejected" => Some(Verdict::Rejected),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Reviewing => "reviewing",
            Verdict::Rejected => "rejected",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Reviewing => "Работа взята на проверку ревьюером.",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Builds the notification text for one homework record.
pub fn parse_status(homework: &Value) -> Result<String, PollError> {
    let record = homework.as_object().ok_or(PollError::Shape {
        what: "homework",
        expected: "object",
        found: json_type(homework),
    })?;

    let name = match record.get("homework_name") {
        Some(Value::String(name)) => name,
        Some(other) => {
            return Err(PollError::Shape {
                what: "homework_name",
                expected: "string",
                found: json_type(other),
            })
        }
        None => return Err(PollError::MissingField("homework_name")),
    };

    let status = record
        .get("status")
        .ok_or(PollError::MissingField("status"))?;
    let verdict = status
        .as_str()
        .and_then(Verdict::from_code)
        .ok_or_else(|| PollError::UnknownStatus(status_label(status)))?;

    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        verdict.text()
    ))
}

fn status_label(status: &Value) -> String {
    match status {
        Value::String(code) => code.clone(),
        other => other.to_string(),
    }
}
