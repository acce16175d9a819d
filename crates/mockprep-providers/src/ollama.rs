//! Ollama (local LLM) adapter.
//!
//! Prompts a local chat model for questions and evaluations and pulls the
//! JSON object out of its reply.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mockprep_core::error::ServiceError;
use mockprep_core::traits::{
    extract_json_object, EvaluateRequest, EvaluationPayload, EvaluationService, QuestionRequest,
    QuestionService,
};

use crate::error::{decode, send_error};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1";
const DEFAULT_TIMEOUT_SECS: u64 = 60; // local models are slower

/// Local Ollama chat model.
pub struct OllamaService {
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaService {
    pub fn new(base_url: &str, model: &str) -> Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };
        let model = if model.is_empty() { DEFAULT_MODEL } else { model };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(
        &self,
        prompt: String,
        options: OllamaOptions,
        json: bool,
    ) -> Result<String, ServiceError> {
        let body = OllamaRequest {
            model: &self.model,
            messages: vec![OllamaMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            format: json.then_some("json"),
            options,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ServiceError::Network(format!(
                        "Ollama not reachable at {}. Is it running? Start with: ollama serve",
                        self.base_url
                    ))
                } else {
                    send_error(e, DEFAULT_TIMEOUT_SECS, &self.base_url)
                }
            })?;

        if response.status().as_u16() == 404 {
            return Err(ServiceError::Api {
                status: 404,
                message: format!(
                    "model '{}' not found locally. Pull it with: ollama pull {}",
                    self.model, self.model
                ),
            });
        }

        let reply: OllamaResponse = decode(response).await?;
        Ok(reply.message.content)
    }
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaResponseMessage,
}

#[derive(Deserialize)]
struct OllamaResponseMessage {
    content: String,
}

fn question_prompt(request: &QuestionRequest) -> String {
    format!(
        "Generate a {difficulty} level {round} interview question for a {role} candidate.\n\
         {tone}.\n\n\
         Categories:\n\
         - Technical: Programming, system design, algorithms\n\
         - HR: Experience, teamwork, goals, challenges\n\
         - Managerial: Situational, problem-solving, leadership\n\n\
         Return only the question, no extra text.",
        difficulty = request.difficulty,
        round = request.round,
        role = request.role.label(),
        tone = request.personality.tone(),
    )
}

fn evaluation_prompt(request: &EvaluateRequest) -> String {
    format!(
        "Question: {question}\n\
         Answer: {answer}\n\n\
         Evaluate this interview answer on 5 criteria (1-10 each):\n\
         1. Technical Accuracy - correctness of information\n\
         2. Clarity - how clear and understandable\n\
         3. Confidence - demonstrates self-assurance\n\
         4. Communication - articulation and structure\n\
         5. Relevance - directly addresses the question\n\n\
         Also provide:\n\
         - Overall score (average of 5 scores)\n\
         - Constructive feedback (2-3 sentences)\n\
         - Improved answer suggestion\n\n\
         Return JSON format:\n\
         {{\n  \"technical_accuracy\": X,\n  \"clarity\": X,\n  \"confidence\": X,\n  \
         \"communication\": X,\n  \"relevance\": X,\n  \"overall_score\": X,\n  \
         \"feedback\": \"...\",\n  \"improved_answer\": \"...\"\n}}",
        question = request.question,
        answer = request.answer,
    )
}

/// Strip wrapping quotes and a leading "Question:" label models like to add.
fn clean_question(raw: &str) -> &str {
    let text = raw.trim();
    let text = text
        .strip_prefix("Question:")
        .map(str::trim_start)
        .unwrap_or(text);
    text.trim_matches('"').trim()
}

#[async_trait]
impl QuestionService for OllamaService {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate_question(&self, request: &QuestionRequest) -> Result<String, ServiceError> {
        let options = OllamaOptions {
            temperature: 0.7,
            num_predict: 200,
        };
        let content = self.chat(question_prompt(request), options, false).await?;
        Ok(clean_question(&content).to_string())
    }
}

#[async_trait]
impl EvaluationService for OllamaService {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluationPayload, ServiceError> {
        let options = OllamaOptions {
            temperature: 0.3,
            num_predict: 500,
        };
        let content = self.chat(evaluation_prompt(request), options, true).await?;
        let json = extract_json_object(&content)
            .ok_or_else(|| ServiceError::MalformedPayload("no JSON object in reply".into()))?;
        serde_json::from_str(json)
            .map_err(|e| ServiceError::MalformedPayload(format!("invalid evaluation JSON: {e}")))
    }
}
