//! Capability traits for the external question-generation and
//! answer-evaluation services.
//!
//! These async traits are implemented by the `mockprep-providers` crate. The
//! engine only ever reaches them through [`crate::guard::guarded`], which
//! bounds every call with a timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::model::{Difficulty, Personality, Role, Round, ScoreVector, MAX_SCORE, MIN_SCORE};

// ---------------------------------------------------------------------------
// Answer evaluation
// ---------------------------------------------------------------------------

/// A backend that scores an answer against a question.
#[async_trait]
pub trait EvaluationService: Send + Sync {
    /// Human-readable service name (e.g. "api").
    fn name(&self) -> &str;

    /// Score one answer.
    async fn evaluate(&self, request: &EvaluateRequest) -> Result<EvaluationPayload, ServiceError>;
}

/// Request sent to the evaluation capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub question: String,
    pub answer: String,
    pub role: Role,
    #[serde(rename = "category")]
    pub round: Round,
    #[serde(default)]
    pub personality: Personality,
}

/// Raw evaluation response. Every field is optional on the wire; use
/// [`EvaluationPayload::scores`] to validate it into a [`ScoreVector`].
///
/// A reported `overall_score` is ignored. The overall is always the mean of
/// the criteria.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationPayload {
    #[serde(default)]
    pub technical_accuracy: Option<f64>,
    #[serde(default)]
    pub clarity: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub communication: Option<f64>,
    #[serde(default)]
    pub relevance: Option<f64>,
    #[serde(default)]
    pub completeness: Option<f64>,
    #[serde(default)]
    pub structure: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub improved_answer: Option<String>,
}

/// Feedback used when the service omits it.
pub const DEFAULT_SERVICE_FEEDBACK: &str = "Good response";

impl EvaluationPayload {
    /// Validate the payload into a full score vector.
    ///
    /// The five core criteria are required. `completeness` and `structure`
    /// default to `technical_accuracy` and `clarity` when the service does
    /// not score them.
    pub fn scores(&self) -> Result<ScoreVector, ServiceError> {
        let required = |name: &str, value: Option<f64>| -> Result<f64, ServiceError> {
            let v = value
                .ok_or_else(|| ServiceError::MalformedPayload(format!("missing {name}")))?;
            if !v.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&v) {
                return Err(ServiceError::MalformedPayload(format!(
                    "{name} score {v} is out of range"
                )));
            }
            Ok(v)
        };

        let technical_accuracy = required("technical_accuracy", self.technical_accuracy)?;
        let clarity = required("clarity", self.clarity)?;
        let confidence = required("confidence", self.confidence)?;
        let communication = required("communication", self.communication)?;
        let relevance = required("relevance", self.relevance)?;
        let completeness = required(
            "completeness",
            Some(self.completeness.unwrap_or(technical_accuracy)),
        )?;
        let structure = required("structure", Some(self.structure.unwrap_or(clarity)))?;

        Ok(ScoreVector {
            technical_accuracy,
            clarity,
            confidence,
            communication,
            relevance,
            completeness,
            structure,
        })
    }

    pub fn feedback(&self) -> String {
        self.feedback
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_SERVICE_FEEDBACK)
            .to_string()
    }

    pub fn improved_answer(&self) -> String {
        self.improved_answer
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }
}

// ---------------------------------------------------------------------------
// Question generation
// ---------------------------------------------------------------------------

/// A backend that writes a fresh interview question.
#[async_trait]
pub trait QuestionService: Send + Sync {
    fn name(&self) -> &str;

    /// Generate one question. Implementations return the bare question text.
    async fn generate_question(&self, request: &QuestionRequest) -> Result<String, ServiceError>;
}

/// Request sent to the question-generation capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub difficulty: Difficulty,
    #[serde(rename = "category")]
    pub round: Round,
    pub role: Role,
    #[serde(default)]
    pub personality: Personality,
}

/// Response body of the question-generation capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub question: String,
}

// ---------------------------------------------------------------------------
// JSON extraction
// ---------------------------------------------------------------------------

/// Extract a JSON object from free-form model output.
///
/// Handles:
/// - ```json fenced blocks (preferred)
/// - generic ``` blocks
/// - prose around a bare `{ ... }` object
///
/// Returns `None` if no braces are found.
pub fn extract_json_object(response: &str) -> Option<&str> {
    let mut fenced = None;
    let mut generic = None;
    let mut rest = response;
    while let Some(start) = rest.find("```") {
        let after = &rest[start + 3..];
        let Some(end) = after.find("```") else {
            break;
        };
        let block = &after[..end];
        let (lang, body) = block.split_once('\n').unwrap_or(("", block));
        match lang.trim().to_lowercase().as_str() {
            "json" if fenced.is_none() => fenced = Some(body),
            "" if generic.is_none() => generic = Some(body),
            _ => {}
        }
        rest = &after[end + 3..];
    }

    let candidate = fenced.or(generic).unwrap_or(response);
    let open = candidate.find('{')?;
    let close = candidate.rfind('}')?;
    (close > open).then(|| &candidate[open..=close])
}
