//! Interview orchestrator.
//!
//! Ties the question source, the rubric scorer, and the session state
//! together: pick a question, score the answer, record progress, suggest a
//! follow-up.

use rand::Rng;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::InterviewError;
use crate::model::{Difficulty, InterviewRecord, Question, Role, Round};
use crate::scoring::{Evaluation, RubricScorer};
use crate::selector::{
    follow_up_for, QuestionSelector, QuestionSource, SelectionContext, GENERIC_FOLLOW_UP,
};
use crate::session::SessionState;

/// What the caller wants asked next.
#[derive(Debug, Clone)]
pub struct QuestionPlan {
    pub role: Role,
    pub round: Round,
    /// Pin a difficulty instead of using the session's current one.
    pub difficulty: Option<Difficulty>,
    pub context: SelectionContext,
}

impl QuestionPlan {
    pub fn new(role: Role, round: Round) -> Self {
        Self {
            role,
            round,
            difficulty: None,
            context: SelectionContext::default(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_context(mut self, context: SelectionContext) -> Self {
        self.context = context;
        self
    }
}

/// Outcome of one submitted answer.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub record: InterviewRecord,
    pub evaluation: Evaluation,
    /// Difficulty after this answer was recorded.
    pub difficulty: Difficulty,
    pub difficulty_changed: bool,
    /// Suggested follow-up question on this answer.
    pub follow_up: String,
}

/// The interview engine.
pub struct Interviewer {
    source: QuestionSource,
    scorer: RubricScorer,
}

impl Interviewer {
    pub fn new(source: QuestionSource, scorer: RubricScorer) -> Self {
        Self { source, scorer }
    }

    /// Catalog-only selection and fallback scoring.
    pub fn offline(catalog: Catalog) -> Self {
        Self::new(
            QuestionSource::new(QuestionSelector::new(catalog)),
            RubricScorer::offline(),
        )
    }

    pub fn catalog(&self) -> &Catalog {
        self.source.selector().catalog()
    }

    /// Select the next question for `plan`.
    pub async fn next_question<R: Rng + ?Sized>(
        &self,
        state: &SessionState,
        plan: &QuestionPlan,
        rng: &mut R,
    ) -> Question {
        let difficulty = plan
            .difficulty
            .unwrap_or_else(|| state.progress.state().difficulty());
        self.source
            .next(plan.role, plan.round, difficulty, &plan.context, rng)
            .await
    }

    /// Score `answer`, record it, and suggest a follow-up.
    ///
    /// An empty answer is rejected before anything is recorded.
    pub async fn submit<R: Rng + ?Sized>(
        &self,
        state: &mut SessionState,
        question: &Question,
        answer: &str,
        company: Option<&str>,
        rng: &mut R,
    ) -> Result<Submission, InterviewError> {
        let evaluation = self.scorer.evaluate(question, answer, rng).await?;

        let company = company
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);
        let record = InterviewRecord::new(question, answer, evaluation.scores, company);

        let previous = state.progress.state().difficulty();
        let difficulty = state
            .progress
            .record(record.overall_score, &record.scores, record.round)?
            .difficulty();
        state.store.append(record.clone());

        tracing::info!(
            round = %record.round,
            overall = record.overall_score,
            fallback = evaluation.fallback,
            answers = state.store.len(),
            "answer recorded"
        );

        let follow_up = follow_up_for(answer).unwrap_or(GENERIC_FOLLOW_UP).to_string();

        Ok(Submission {
            record,
            evaluation,
            difficulty,
            difficulty_changed: difficulty != previous,
            follow_up,
        })
    }
}
