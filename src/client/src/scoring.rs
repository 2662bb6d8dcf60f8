use std::time::Duration;

use async_trait::async_trait;
use common::model::{
    game::Move,
    messages::{PlayRequest, PlayResponse},
};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Scoring service returned status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn play(&self, choice: Move) -> Result<PlayResponse, ScoringError>;
}

pub struct HttpScoringClient {
    client: Client,
    play_url: String,
}

impl HttpScoringClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoringError::Network(e.to_string()))?;
        let base_url = base_url.into();
        Ok(HttpScoringClient {
            client,
            play_url: format!("{}/play", base_url.trim_end_matches('/')),
        })
    }

    pub fn play_url(&self) -> &str {
        &self.play_url
    }
}

#[async_trait]
impl ScoringService for HttpScoringClient {
    async fn play(&self, choice: Move) -> Result<PlayResponse, ScoringError> {
        debug!("POSTing {:?} to {:?}", choice, self.play_url);
        let response = self
            .client
            .post(&self.play_url)
            .json(&PlayRequest { choice })
            .send()
            .await
            .map_err(|e| ScoringError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Status: {:?}", status);
        if !status.is_success() {
            return Err(ScoringError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScoringError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ScoringError::Decode(e.to_string()))
    }
}
