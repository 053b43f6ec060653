use reqwest::StatusCode;
use thiserror::Error;

/// Fatal startup failures. The poller is never started when one of these occurs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Отсутствуют переменные окружения: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),
}

/// Failures of a single polling cycle. None of them stop the poller.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Ошибка соединения: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Эндпоинт {endpoint} недоступен, код ответа: {status}")]
    Endpoint { endpoint: String, status: StatusCode },
    #[error("Ответ API не является JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Сервис отклонил запрос: {code} ({message})")]
    Service { code: String, message: String },
    #[error("Неверный тип данных {what}: ожидался {expected}, получен {found}")]
    Shape {
        what: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Отсутствует ключ \"{0}\"")]
    MissingField(&'static str),
    #[error("Некорректный статус проверки: {0}")]
    UnknownStatus(String),
    #[error("Ошибка при отправке сообщения: {0}")]
    Delivery(String),
}

impl PollError {
    /// Short stable label, used as the `kind` field of log records.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Transport(_) => "transport",
            PollError::Endpoint { .. } => "endpoint",
            PollError::Decode(_) => "decode",
            PollError::Service { .. } => "service",
            PollError::Shape { .. } => "shape",
            PollError::MissingField(_) => "missing_field",
            PollError::UnknownStatus(_) => "unknown_status",
            PollError::Delivery(_) => "delivery",
        }
    }
}
