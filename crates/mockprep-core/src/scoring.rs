//! Rubric scoring: turns (question, answer) into a [`ScoreVector`] plus
//! feedback, delegating to the evaluation capability with a fallback.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{InterviewError, ServiceError};
use crate::guard::{guarded, EVALUATION_TIMEOUT};
use crate::model::{Criterion, Personality, Question, ScoreVector};
use crate::traits::{EvaluateRequest, EvaluationService};

/// Inclusive integer range each criterion is drawn from when the service
/// cannot be used. Listed in canonical criterion order.
pub const FALLBACK_RANGES: [(Criterion, u8, u8); 7] = [
    (Criterion::TechnicalAccuracy, 6, 9),
    (Criterion::Clarity, 6, 9),
    (Criterion::Confidence, 5, 8),
    (Criterion::Communication, 6, 9),
    (Criterion::Relevance, 6, 9),
    (Criterion::Completeness, 6, 8),
    (Criterion::Structure, 6, 8),
];

/// Feedback attached to every fallback evaluation.
pub const FALLBACK_FEEDBACK: &str = "Good technical understanding. Consider adding more examples.";

/// How much of the question [`ideal_answer`] quotes.
const IDEAL_QUOTE_CHARS: usize = 50;

/// A templated outline of what a strong answer to `question` covers.
pub fn ideal_answer(question: &str) -> String {
    let quoted: String = question.trim().chars().take(IDEAL_QUOTE_CHARS).collect();
    format!(
        "Ideal answer for '{quoted}...': A comprehensive response would include specific \
         examples, technical details, step-by-step approach, and practical implementation \
         considerations."
    )
}

/// Result of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub scores: ScoreVector,
    pub feedback: String,
    /// Suggested rewrite of the answer; empty when none was produced.
    pub improved_answer: String,
    /// `true` when the scores come from [`fallback_evaluation`].
    pub fallback: bool,
}

/// Build a fallback evaluation with each criterion sampled independently from
/// [`FALLBACK_RANGES`].
pub fn fallback_evaluation<R: Rng + ?Sized>(rng: &mut R) -> Evaluation {
    let mut values = [0.0; 7];
    for (slot, (_, min, max)) in values.iter_mut().zip(FALLBACK_RANGES) {
        *slot = f64::from(rng.random_range(min..=max));
    }
    Evaluation {
        scores: ScoreVector::from_values(values),
        feedback: FALLBACK_FEEDBACK.to_string(),
        improved_answer: String::new(),
        fallback: true,
    }
}

/// Scores answers through an optional [`EvaluationService`].
pub struct RubricScorer {
    service: Option<Arc<dyn EvaluationService>>,
    timeout: Duration,
    personality: Personality,
}

impl RubricScorer {
    pub fn new(service: Arc<dyn EvaluationService>) -> Self {
        Self {
            service: Some(service),
            timeout: EVALUATION_TIMEOUT,
            personality: Personality::default(),
        }
    }

    /// A scorer with no service; every evaluation uses the fallback.
    pub fn offline() -> Self {
        Self {
            service: None,
            timeout: EVALUATION_TIMEOUT,
            personality: Personality::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn is_offline(&self) -> bool {
        self.service.is_none()
    }

    /// Score `answer` to `question`.
    ///
    /// Only an empty answer is rejected. Every service failure resolves to
    /// [`fallback_evaluation`].
    pub async fn evaluate<R: Rng + ?Sized>(
        &self,
        question: &Question,
        answer: &str,
        rng: &mut R,
    ) -> Result<Evaluation, InterviewError> {
        if answer.trim().is_empty() {
            return Err(InterviewError::InvalidInput("answer is empty".into()));
        }

        let outcome = match &self.service {
            Some(service) => {
                let request = EvaluateRequest {
                    question: question.text.clone(),
                    answer: answer.to_string(),
                    role: question.role,
                    round: question.round,
                    personality: self.personality,
                };
                tracing::debug!(service = service.name(), "evaluating answer");
                guarded("evaluate", self.timeout, async {
                    let payload = service.evaluate(&request).await?;
                    Ok::<_, ServiceError>(Evaluation {
                        scores: payload.scores()?,
                        feedback: payload.feedback(),
                        improved_answer: payload.improved_answer(),
                        fallback: false,
                    })
                })
                .await
            }
            None => {
                guarded("evaluate", self.timeout, async {
                    Err::<Evaluation, _>(ServiceError::NotConfigured)
                })
                .await
            }
        };

        Ok(outcome.unwrap_or_else(|_| fallback_evaluation(rng)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, Origin, Role, Round};
    use crate::traits::EvaluationPayload;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    enum Behaviour {
        Respond(EvaluationPayload),
        Fail(ServiceError),
        Hang,
    }

    struct StubEvaluator(Behaviour);

    #[async_trait]
    impl EvaluationService for StubEvaluator {
        fn name(&self) -> &str {
            "stub"
        }

        async fn evaluate(
            &self,
            _request: &EvaluateRequest,
        ) -> Result<EvaluationPayload, ServiceError> {
            match &self.0 {
                Behaviour::Respond(payload) => Ok(payload.clone()),
                Behaviour::Fail(e) => Err(e.clone()),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(ServiceError::Network("unreachable".into()))
                }
            }
        }
    }

    fn question() -> Question {
        Question::new(
            "How do you handle imbalanced datasets?",
            Role::Ml,
            Round::Technical,
            Difficulty::Easy,
            Origin::Catalog,
        )
    }

    fn assert_fallback_bounds(evaluation: &Evaluation) {
        assert!(evaluation.fallback);
        assert!(!evaluation.feedback.is_empty());
        assert!(evaluation.improved_answer.is_empty());
        for ((criterion, value), (expected, min, max)) in
            evaluation.scores.iter().zip(FALLBACK_RANGES)
        {
            assert_eq!(criterion, expected);
            assert!(
                (f64::from(min)..=f64::from(max)).contains(&value),
                "{criterion} = {value} outside [{min}, {max}]"
            );
            assert_eq!(value.fract(), 0.0);
        }
    }

    #[test]
    fn fallback_stays_within_documented_ranges() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_fallback_bounds(&fallback_evaluation(&mut rng));
        }
    }

    #[test]
    fn ideal_answer_quotes_the_question_prefix() {
        let short = ideal_answer("  Explain CAP theorem ");
        assert!(short.starts_with("Ideal answer for 'Explain CAP theorem...': "));
        assert!(short.ends_with("practical implementation considerations."));

        let long = ideal_answer("Design a URL shortener like bit.ly with high availability");
        assert!(long.contains("'Design a URL shortener like bit.ly with high avail...'"));

        let accented = ideal_answer(&"é".repeat(80));
        assert!(accented.contains(&format!("'{}...'", "é".repeat(50))));
    }

    #[test]
    fn fallback_is_deterministic_for_a_seed() {
        let a = fallback_evaluation(&mut StdRng::seed_from_u64(7));
        let b = fallback_evaluation(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn empty_answer_is_rejected() {
        let scorer = RubricScorer::offline();
        let mut rng = StdRng::seed_from_u64(1);
        let err = scorer
            .evaluate(&question(), "   \n", &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(err, InterviewError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn offline_scorer_uses_fallback() {
        let scorer = RubricScorer::offline();
        assert!(scorer.is_offline());
        let mut rng = StdRng::seed_from_u64(1);
        let evaluation = scorer
            .evaluate(&question(), "I would resample the minority class", &mut rng)
            .await
            .unwrap();
        assert_fallback_bounds(&evaluation);
    }

    #[tokio::test]
    async fn service_scores_are_used() {
        let payload: EvaluationPayload = serde_json::from_value(serde_json::json!({
            "technical_accuracy": 9, "clarity": 8, "confidence": 7,
            "communication": 8, "relevance": 9,
            "feedback": "Great use of SMOTE.", "improved_answer": "Also mention class weights."
        }))
        .unwrap();
        let scorer = RubricScorer::new(Arc::new(StubEvaluator(Behaviour::Respond(payload))));
        let mut rng = StdRng::seed_from_u64(1);
        let evaluation = scorer
            .evaluate(&question(), "SMOTE and class weights", &mut rng)
            .await
            .unwrap();
        assert!(!evaluation.fallback);
        assert_eq!(evaluation.scores.technical_accuracy, 9.0);
        assert_eq!(evaluation.scores.completeness, 9.0);
        assert_eq!(evaluation.scores.structure, 8.0);
        assert_eq!(evaluation.feedback, "Great use of SMOTE.");
        assert_eq!(evaluation.improved_answer, "Also mention class weights.");
    }

    #[tokio::test]
    async fn service_error_falls_back() {
        let scorer = RubricScorer::new(Arc::new(StubEvaluator(Behaviour::Fail(
            ServiceError::Api {
                status: 500,
                message: "boom".into(),
            },
        ))));
        let mut rng = StdRng::seed_from_u64(3);
        let evaluation = scorer.evaluate(&question(), "an answer", &mut rng).await.unwrap();
        assert_fallback_bounds(&evaluation);
    }

    #[tokio::test]
    async fn malformed_payload_falls_back() {
        let scorer = RubricScorer::new(Arc::new(StubEvaluator(Behaviour::Respond(
            EvaluationPayload::default(),
        ))));
        let mut rng = StdRng::seed_from_u64(3);
        let evaluation = scorer.evaluate(&question(), "an answer", &mut rng).await.unwrap();
        assert_fallback_bounds(&evaluation);
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_service_times_out_to_fallback() {
        let scorer = RubricScorer::new(Arc::new(StubEvaluator(Behaviour::Hang)))
            .with_timeout(Duration::from_secs(15));
        let mut rng = StdRng::seed_from_u64(3);
        let evaluation = scorer.evaluate(&question(), "an answer", &mut rng).await.unwrap();
        assert_fallback_bounds(&evaluation);
    }
}
