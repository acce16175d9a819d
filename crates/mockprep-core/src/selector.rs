//! Question selection.
//!
//! [`QuestionSelector`] applies a strict precedence over the local sources:
//!
//! 1. follow-up on the previous answer
//! 2. job-description keywords
//! 3. company catalog
//! 4. coding challenge for the current difficulty
//! 5. role/round catalog
//!
//! [`QuestionSource`] adds the optional question-generation capability in
//! front of step 5 only.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::catalog::Catalog;
use crate::error::ServiceError;
use crate::guard::{guarded, QUESTION_TIMEOUT};
use crate::model::{Difficulty, Origin, Personality, Question, Role, Round};
use crate::traits::{QuestionRequest, QuestionService};

/// Returned for a follow-up when no trigger matches and the generic prompt
/// is allowed.
pub const GENERIC_FOLLOW_UP: &str =
    "Can you elaborate on that with a specific example from your experience?";

/// Returned when a role/round cell has no questions.
pub const DEFAULT_QUESTION: &str = "Tell me about yourself.";

/// Returned for a job description that mentions none of the known keywords.
pub const GENERIC_JOB_DESCRIPTION_QUESTION: &str =
    "Based on this job description, how would your experience align with the key requirements mentioned?";

/// Checked in order against the lowercased previous answer.
const FOLLOW_UP_TRIGGERS: &[(&[&str], &str)] = &[
    (
        &["database", "sql"],
        "You mentioned databases - how would you handle database performance optimization at scale?",
    ),
    (
        &["api"],
        "Regarding APIs - how would you ensure API security and rate limiting?",
    ),
    (
        &["microservices"],
        "You brought up microservices - how do you handle inter-service communication and data consistency?",
    ),
    (
        &["testing"],
        "Since you mentioned testing - what's your approach to test-driven development?",
    ),
    (
        &["performance"],
        "You talked about performance - how do you identify and resolve bottlenecks?",
    ),
    (
        &["team"],
        "You mentioned teamwork - can you describe a time when you had to resolve a team conflict?",
    ),
    (
        &["challenge", "difficult"],
        "You described challenges - how do you typically approach problem-solving under pressure?",
    ),
    (
        &["project"],
        "Regarding that project - what would you do differently if you had to start over?",
    ),
];

/// Technology keywords first, then seniority keywords.
const JOB_DESCRIPTION_TRIGGERS: &[(&[&str], &str)] = &[
    (
        &["python"],
        "Based on the job requirement for Python, how would you optimize Python code for performance?",
    ),
    (
        &["react"],
        "The role mentions React - how would you handle state management in a large React application?",
    ),
    (
        &["aws"],
        "Given the AWS requirement, how would you design a scalable cloud architecture?",
    ),
    (
        &["machine learning", "ml"],
        "The position requires ML expertise - how would you approach model deployment in production?",
    ),
    (
        &["kubernetes"],
        "Based on the Kubernetes requirement, how would you handle container orchestration at scale?",
    ),
    (
        &["senior"],
        "As a senior role, how would you mentor junior team members while delivering on technical goals?",
    ),
    (
        &["lead"],
        "This leadership position requires balance - how would you balance technical decisions with team management?",
    ),
];

fn first_trigger(text: &str, triggers: &[(&[&str], &'static str)]) -> Option<&'static str> {
    let lower = text.to_lowercase();
    triggers
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, question)| *question)
}

/// The trigger-table follow-up for `previous_answer`, if any keyword matches.
pub fn follow_up_for(previous_answer: &str) -> Option<&'static str> {
    first_trigger(previous_answer, FOLLOW_UP_TRIGGERS)
}

/// The question derived from a job description. `None` for a blank
/// description; the generic acknowledgement when no keyword matches.
pub fn job_description_question(job_description: &str) -> Option<&'static str> {
    if job_description.trim().is_empty() {
        return None;
    }
    Some(
        first_trigger(job_description, JOB_DESCRIPTION_TRIGGERS)
            .unwrap_or(GENERIC_JOB_DESCRIPTION_QUESTION),
    )
}

/// The question asked about a company the catalog does not know.
pub fn generic_company_question(company: &str) -> String {
    format!(
        "How would you contribute to {}'s mission and values?",
        title_case(company.trim())
    )
}

/// Uppercase every letter that follows a non-letter, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_word_start = !c.is_alphabetic();
    }
    out
}

/// Follow-up request on the previous answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub previous_answer: String,
    /// When no trigger matches, ask [`GENERIC_FOLLOW_UP`] instead of
    /// falling through to the next step.
    pub generic_fallback: bool,
}

/// Inputs that steer selection. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionContext {
    pub follow_up: Option<FollowUp>,
    pub job_description: Option<String>,
    pub company: Option<String>,
    pub coding_challenge: bool,
}

impl SelectionContext {
    pub fn with_follow_up(
        mut self,
        previous_answer: impl Into<String>,
        generic_fallback: bool,
    ) -> Self {
        self.follow_up = Some(FollowUp {
            previous_answer: previous_answer.into(),
            generic_fallback,
        });
        self
    }

    pub fn with_job_description(mut self, job_description: impl Into<String>) -> Self {
        self.job_description = Some(job_description.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_coding_challenge(mut self, enabled: bool) -> Self {
        self.coding_challenge = enabled;
        self
    }
}

/// Picks the next question from the catalog.
#[derive(Debug, Clone, Default)]
pub struct QuestionSelector {
    catalog: Catalog,
}

impl QuestionSelector {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run the full precedence and always produce a question.
    pub fn next<R: Rng + ?Sized>(
        &self,
        role: Role,
        round: Round,
        difficulty: Difficulty,
        ctx: &SelectionContext,
        rng: &mut R,
    ) -> Question {
        self.directed(role, round, difficulty, ctx, rng)
            .unwrap_or_else(|| self.from_catalog(role, round, difficulty, rng))
    }

    /// Steps 1 to 4. `None` means only the catalog default applies.
    pub fn directed<R: Rng + ?Sized>(
        &self,
        role: Role,
        round: Round,
        difficulty: Difficulty,
        ctx: &SelectionContext,
        rng: &mut R,
    ) -> Option<Question> {
        let issue = |text: String, origin: Origin| {
            tracing::debug!(%origin, %role, %round, %difficulty, "question selected");
            Question::new(text, role, round, difficulty, origin)
        };

        if let Some(follow_up) = &ctx.follow_up {
            let text = follow_up_for(&follow_up.previous_answer)
                .or(follow_up.generic_fallback.then_some(GENERIC_FOLLOW_UP));
            if let Some(text) = text {
                return Some(issue(text.to_string(), Origin::FollowUp));
            }
            // untriggered follow-up without the generic prompt skips to step 4
            return self
                .coding_challenge(difficulty, ctx, rng)
                .map(|text| issue(text, Origin::CodingChallenge));
        }

        if let Some(text) = ctx
            .job_description
            .as_deref()
            .and_then(job_description_question)
        {
            return Some(issue(text.to_string(), Origin::JobDescriptionDerived));
        }

        if let Some(company) = ctx.company.as_deref().filter(|c| !c.trim().is_empty()) {
            let text = match self.catalog.company_questions(company) {
                Ok(items) => items
                    .choose(rng)
                    .cloned()
                    .unwrap_or_else(|| generic_company_question(company)),
                Err(_) => generic_company_question(company),
            };
            return Some(issue(text, Origin::CompanyDerived));
        }

        self.coding_challenge(difficulty, ctx, rng)
            .map(|text| issue(text, Origin::CodingChallenge))
    }

    fn coding_challenge<R: Rng + ?Sized>(
        &self,
        difficulty: Difficulty,
        ctx: &SelectionContext,
        rng: &mut R,
    ) -> Option<String> {
        if !ctx.coding_challenge {
            return None;
        }
        let items = self.catalog.coding_challenges(difficulty).ok()?;
        items
            .choose(rng)
            .map(|entry| format!("Coding Challenge: {entry}"))
    }

    /// Step 5: a uniform draw from the role/round cell.
    pub fn from_catalog<R: Rng + ?Sized>(
        &self,
        role: Role,
        round: Round,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Question {
        let text = match self.catalog.questions(role, round) {
            Ok(items) => items.choose(rng).cloned(),
            Err(e) => {
                tracing::debug!(error = %e, "using default question");
                None
            }
        };
        Question::new(
            text.unwrap_or_else(|| DEFAULT_QUESTION.to_string()),
            role,
            round,
            difficulty,
            Origin::Catalog,
        )
    }
}

/// The selector plus an optional generation capability for step 5.
pub struct QuestionSource {
    selector: QuestionSelector,
    service: Option<Arc<dyn QuestionService>>,
    timeout: Duration,
    personality: Personality,
}

impl QuestionSource {
    pub fn new(selector: QuestionSelector) -> Self {
        Self {
            selector,
            service: None,
            timeout: QUESTION_TIMEOUT,
            personality: Personality::default(),
        }
    }

    pub fn with_service(mut self, service: Arc<dyn QuestionService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn selector(&self) -> &QuestionSelector {
        &self.selector
    }

    /// Select the next question, asking the service only when none of the
    /// directed steps apply. A failed generation draws from the catalog.
    pub async fn next<R: Rng + ?Sized>(
        &self,
        role: Role,
        round: Round,
        difficulty: Difficulty,
        ctx: &SelectionContext,
        rng: &mut R,
    ) -> Question {
        if let Some(question) = self.selector.directed(role, round, difficulty, ctx, rng) {
            return question;
        }

        let Some(service) = &self.service else {
            return self.selector.from_catalog(role, round, difficulty, rng);
        };

        let request = QuestionRequest {
            difficulty,
            round,
            role,
            personality: self.personality,
        };
        tracing::debug!(service = service.name(), "requesting generated question");
        let generated = guarded("generate_question", self.timeout, async {
            let text = service.generate_question(&request).await?;
            let text = text.trim();
            if text.is_empty() {
                return Err(ServiceError::MalformedPayload("empty question".into()));
            }
            Ok::<_, ServiceError>(text.to_string())
        })
        .await;

        match generated {
            Ok(text) => Question::new(text, role, round, difficulty, Origin::Generated),
            Err(_) => self.selector.from_catalog(role, round, difficulty, rng),
        }
    }
}
