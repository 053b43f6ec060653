use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::PollError;
use crate::response::service_error;

/// Source of homework statuses changed since a given Unix timestamp.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<Value, PollError>;
}

/// Client for the Practicum `homework_statuses` endpoint.
#[derive(Debug, Clone)]
pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// `client` should carry the request timeout.
    pub fn new(client: Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, PollError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(PollError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PollError::Endpoint {
                endpoint: self.endpoint.clone(),
                status,
            });
        }

        let bytes = response.bytes().await.map_err(PollError::Transport)?;
        let body: Value = serde_json::from_slice(&bytes)?;
        if let Some(err) = service_error(&body) {
            return Err(err);
        }
        debug!(from_date, "homework statuses fetched");
        Ok(body)
    }
}
