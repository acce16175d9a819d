//! Mock service for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use mockprep_core::error::ServiceError;
use mockprep_core::traits::{
    EvaluateRequest, EvaluationPayload, EvaluationService, QuestionRequest, QuestionService,
};

/// A scripted question/evaluation service that never touches the network.
///
/// By default every evaluation scores 7 on each core criterion and every
/// generated question is the same fixed text.
pub struct MockService {
    question: String,
    evaluation: EvaluationPayload,
    failure: Option<ServiceError>,
    delay: Option<Duration>,
    question_calls: AtomicU32,
    evaluation_calls: AtomicU32,
    last_question: Mutex<Option<QuestionRequest>>,
    last_evaluation: Mutex<Option<EvaluateRequest>>,
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockService {
    pub fn new() -> Self {
        Self {
            question: "Tell me about a system you designed end to end.".to_string(),
            evaluation: uniform_payload(7.0),
            failure: None,
            delay: None,
            question_calls: AtomicU32::new(0),
            evaluation_calls: AtomicU32::new(0),
            last_question: Mutex::new(None),
            last_evaluation: Mutex::new(None),
        }
    }

    /// Return `question` from every generation call.
    pub fn with_question(mut self, question: &str) -> Self {
        self.question = question.to_string();
        self
    }

    /// Return `payload` from every evaluation call.
    pub fn with_evaluation(mut self, payload: EvaluationPayload) -> Self {
        self.evaluation = payload;
        self
    }

    /// Score every criterion `score`.
    pub fn with_uniform_score(self, score: f64) -> Self {
        self.with_evaluation(uniform_payload(score))
    }

    /// Fail every call with `error`.
    pub fn failing(mut self, error: ServiceError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn question_calls(&self) -> u32 {
        self.question_calls.load(Ordering::Relaxed)
    }

    pub fn evaluation_calls(&self) -> u32 {
        self.evaluation_calls.load(Ordering::Relaxed)
    }

    pub fn last_question_request(&self) -> Option<QuestionRequest> {
        self.last_question.lock().ok().and_then(|g| g.clone())
    }

    pub fn last_evaluate_request(&self) -> Option<EvaluateRequest> {
        self.last_evaluation.lock().ok().and_then(|g| g.clone())
    }

    async fn respond<T: Clone>(&self, value: &T) -> Result<T, ServiceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(value.clone()),
        }
    }
}

fn uniform_payload(score: f64) -> EvaluationPayload {
    let v = Some(score);
    EvaluationPayload {
        technical_accuracy: v,
        clarity: v,
        confidence: v,
        communication: v,
        relevance: v,
        completeness: None,
        structure: None,
        feedback: Some("Clear and well structured.".to_string()),
        improved_answer: Some("Add a concrete example with numbers.".to_string()),
    }
}

#[async_trait]
impl QuestionService for MockService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_question(&self, request: &QuestionRequest) -> Result<String, ServiceError> {
        self.question_calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_question.lock() {
            *last = Some(request.clone());
        }
        self.respond(&self.question).await
    }
}

#[async_trait]
impl EvaluationService for MockService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluationPayload, ServiceError> {
        self.evaluation_calls.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_evaluation.lock() {
            *last = Some(request.clone());
        }
        self.respond(&self.evaluation).await
    }
}
