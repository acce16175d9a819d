//! HTTP gateway adapter.
//!
//! Talks to a gateway exposing `POST /question` and `POST /evaluate` with JSON
//! bodies. The same service backs both capabilities.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use mockprep_core::error::ServiceError;
use mockprep_core::traits::{
    EvaluateRequest, EvaluationPayload, EvaluationService, QuestionPayload, QuestionRequest,
    QuestionService,
};

use crate::error::{decode, send_error};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the question/evaluate gateway.
pub struct ApiGatewayService {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl ApiGatewayService {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, route: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let mut req = self
            .client
            .post(format!("{}/{route}", self.base_url))
            .header("content-type", "application/json")
            .json(body);
        if let Some(key) = &self.api_key {
            req = req.header("x-api-key", key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| send_error(e, self.timeout_secs, &self.base_url))?;
        decode(response).await
    }
}

#[async_trait]
impl QuestionService for ApiGatewayService {
    fn name(&self) -> &str {
        "api"
    }

    #[instrument(
        skip(self, request),
        fields(difficulty = %request.difficulty, round = %request.round)
    )]
    async fn generate_question(&self, request: &QuestionRequest) -> Result<String, ServiceError> {
        let payload: QuestionPayload = self.post("question", request).await?;
        Ok(payload.question)
    }
}

#[async_trait]
impl EvaluationService for ApiGatewayService {
    fn name(&self) -> &str {
        "api"
    }

    #[instrument(skip(self, request), fields(role = %request.role, round = %request.round))]
    async fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluationPayload, ServiceError> {
        self.post("evaluate", request).await
    }
}
