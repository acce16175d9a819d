//! Core data model types for mockprep.
//!
//! These are the fundamental types the engine passes around: catalog keys,
//! rubric criteria, score vectors, issued questions, and interview records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::InterviewError;

/// Lowest and highest value a single criterion may take.
pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

/// Target role of the practice interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Sde,
    Ml,
    Cloud,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Sde, Role::Ml, Role::Cloud];

    /// Human-readable name, e.g. for table headers.
    pub fn label(self) -> &'static str {
        match self {
            Role::Sde => "SDE (Software Engineer)",
            Role::Ml => "ML (Machine Learning)",
            Role::Cloud => "Cloud (Cloud Engineer)",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Sde => write!(f, "sde"),
            Role::Ml => write!(f, "ml"),
            Role::Cloud => write!(f, "cloud"),
        }
    }
}

impl FromStr for Role {
    type Err = InterviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sde" | "software" => Ok(Role::Sde),
            "ml" | "machine-learning" => Ok(Role::Ml),
            "cloud" => Ok(Role::Cloud),
            other => Err(InterviewError::unknown("role", other)),
        }
    }
}

/// Interview phase category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Round {
    Technical,
    Hr,
    Managerial,
}

impl Round {
    pub const ALL: [Round; 3] = [Round::Technical, Round::Hr, Round::Managerial];

    pub fn label(self) -> &'static str {
        match self {
            Round::Technical => "Technical",
            Round::Hr => "HR",
            Round::Managerial => "Managerial",
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Round::Technical => write!(f, "technical"),
            Round::Hr => write!(f, "hr"),
            Round::Managerial => write!(f, "managerial"),
        }
    }
}

impl FromStr for Round {
    type Err = InterviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" | "tech" => Ok(Round::Technical),
            "hr" => Ok(Round::Hr),
            "managerial" | "manager" => Ok(Round::Managerial),
            other => Err(InterviewError::unknown("round", other)),
        }
    }
}

/// Discrete difficulty tier. Ordered `Easy < Medium < Hard`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Threshold function over a running mean of overall scores.
    ///
    /// `mean >= 8` is hard, `6 <= mean < 8` is medium, anything lower is easy.
    pub fn from_mean(mean: f64) -> Self {
        if mean >= 8.0 {
            Difficulty::Hard
        } else if mean >= 6.0 {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = InterviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(InterviewError::unknown("difficulty", other)),
        }
    }
}

/// Interviewer style forwarded to the external capabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Friendly,
    Strict,
    Expert,
}

impl Personality {
    /// Tone instruction used when prompting a model directly.
    pub fn tone(self) -> &'static str {
        match self {
            Personality::Friendly => "Ask in a warm, encouraging tone",
            Personality::Strict => "Ask in a direct, no-nonsense professional manner",
            Personality::Expert => "Ask with deep technical expertise and precision",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Personality::Friendly => write!(f, "friendly"),
            Personality::Strict => write!(f, "strict"),
            Personality::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for Personality {
    type Err = InterviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "friendly" => Ok(Personality::Friendly),
            "strict" => Ok(Personality::Strict),
            "expert" => Ok(Personality::Expert),
            other => Err(InterviewError::unknown("personality", other)),
        }
    }
}

/// Which selection branch produced a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    Catalog,
    JobDescriptionDerived,
    CompanyDerived,
    FollowUp,
    CodingChallenge,
    /// Produced by the external question-generation capability.
    Generated,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Origin::Catalog => "catalog",
            Origin::JobDescriptionDerived => "job-description-derived",
            Origin::CompanyDerived => "company-derived",
            Origin::FollowUp => "follow-up",
            Origin::CodingChallenge => "coding-challenge",
            Origin::Generated => "generated",
        };
        f.write_str(s)
    }
}

/// One scored rubric dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    TechnicalAccuracy,
    Clarity,
    Confidence,
    Communication,
    Relevance,
    Completeness,
    Structure,
}

impl Criterion {
    /// Canonical ordering. Tie-breaks always favour the earlier entry.
    pub const ALL: [Criterion; 7] = [
        Criterion::TechnicalAccuracy,
        Criterion::Clarity,
        Criterion::Confidence,
        Criterion::Communication,
        Criterion::Relevance,
        Criterion::Completeness,
        Criterion::Structure,
    ];

    /// Wire name, e.g. `technical_accuracy`.
    pub fn name(self) -> &'static str {
        match self {
            Criterion::TechnicalAccuracy => "technical_accuracy",
            Criterion::Clarity => "clarity",
            Criterion::Confidence => "confidence",
            Criterion::Communication => "communication",
            Criterion::Relevance => "relevance",
            Criterion::Completeness => "completeness",
            Criterion::Structure => "structure",
        }
    }

    /// Display name, e.g. `Technical Accuracy`.
    pub fn label(self) -> &'static str {
        match self {
            Criterion::TechnicalAccuracy => "Technical Accuracy",
            Criterion::Clarity => "Clarity",
            Criterion::Confidence => "Confidence",
            Criterion::Communication => "Communication",
            Criterion::Relevance => "Relevance",
            Criterion::Completeness => "Completeness",
            Criterion::Structure => "Structure",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Criterion {
    type Err = InterviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Criterion::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| InterviewError::unknown("criterion", s.trim()))
    }
}

/// Per-criterion scores for one answer. Every criterion is always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreVector {
    pub technical_accuracy: f64,
    pub clarity: f64,
    pub confidence: f64,
    pub communication: f64,
    pub relevance: f64,
    pub completeness: f64,
    pub structure: f64,
}

impl ScoreVector {
    /// Build from values listed in canonical criterion order.
    pub fn from_values(values: [f64; 7]) -> Self {
        let [
            technical_accuracy,
            clarity,
            confidence,
            communication,
            relevance,
            completeness,
            structure,
        ] = values;
        Self {
            technical_accuracy,
            clarity,
            confidence,
            communication,
            relevance,
            completeness,
            structure,
        }
    }

    /// Build from an untyped name → score map, rejecting unknown names,
    /// missing criteria, and out-of-range values.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Result<Self, InterviewError> {
        for key in map.keys() {
            key.parse::<Criterion>()
                .map_err(|_| InterviewError::InvalidInput(format!("unknown criterion: {key}")))?;
        }

        let mut values = [0.0; 7];
        for (slot, criterion) in values.iter_mut().zip(Criterion::ALL) {
            *slot = *map.get(criterion.name()).ok_or_else(|| {
                InterviewError::InvalidInput(format!("missing criterion: {}", criterion.name()))
            })?;
        }

        let scores = Self::from_values(values);
        scores.validate()?;
        Ok(scores)
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::TechnicalAccuracy => self.technical_accuracy,
            Criterion::Clarity => self.clarity,
            Criterion::Confidence => self.confidence,
            Criterion::Communication => self.communication,
            Criterion::Relevance => self.relevance,
            Criterion::Completeness => self.completeness,
            Criterion::Structure => self.structure,
        }
    }

    /// Iterate `(criterion, score)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        Criterion::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Arithmetic mean of all criteria.
    pub fn overall(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum::<f64>() / Criterion::ALL.len() as f64
    }

    /// Check every value is finite and within `[0, 10]`.
    pub fn validate(&self) -> Result<(), InterviewError> {
        for (criterion, value) in self.iter() {
            if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                return Err(InterviewError::InvalidInput(format!(
                    "{} score {value} is outside [{MIN_SCORE}, {MAX_SCORE}]",
                    criterion.name()
                )));
            }
        }
        Ok(())
    }

    /// Highest-scoring criterion; the first in canonical order wins ties.
    pub fn strongest(&self) -> Criterion {
        let mut best = (Criterion::ALL[0], self.get(Criterion::ALL[0]));
        for (criterion, value) in self.iter().skip(1) {
            if value > best.1 {
                best = (criterion, value);
            }
        }
        best.0
    }

    /// Lowest-scoring criterion; the first in canonical order wins ties.
    pub fn weakest(&self) -> Criterion {
        let mut worst = (Criterion::ALL[0], self.get(Criterion::ALL[0]));
        for (criterion, value) in self.iter().skip(1) {
            if value < worst.1 {
                worst = (criterion, value);
            }
        }
        worst.0
    }
}

/// A question issued to the candidate. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub role: Role,
    pub round: Round,
    pub difficulty: Difficulty,
    pub origin: Origin,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        role: Role,
        round: Round,
        difficulty: Difficulty,
        origin: Origin,
    ) -> Self {
        Self {
            text: text.into(),
            role,
            round,
            difficulty,
            origin,
        }
    }
}

/// One submitted answer with its evaluation. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub role: Role,
    pub round: Round,
    pub question: String,
    pub answer: String,
    pub scores: ScoreVector,
    pub overall_score: f64,
    pub word_count: usize,
    pub origin: Origin,
    #[serde(default)]
    pub company: Option<String>,
}

impl InterviewRecord {
    /// Assemble a record for `answer` to `question`, stamping it now.
    pub fn new(
        question: &Question,
        answer: &str,
        scores: ScoreVector,
        company: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            role: question.role,
            round: question.round,
            question: question.text.clone(),
            answer: answer.to_string(),
            overall_score: scores.overall(),
            scores,
            word_count: answer.split_whitespace().count(),
            origin: question.origin,
            company,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_display_and_parse() {
        assert_eq!(Role::Sde.to_string(), "sde");
        assert_eq!("ML".parse::<Role>().unwrap(), Role::Ml);
        assert_eq!("hr".parse::<Round>().unwrap(), Round::Hr);
        assert_eq!(" Hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(
            "strict".parse::<Personality>().unwrap(),
            Personality::Strict
        );
        assert!(matches!(
            "devops".parse::<Role>(),
            Err(InterviewError::UnknownCatalogKey { kind: "role", .. })
        ));
    }

    #[test]
    fn difficulty_order_and_thresholds() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
        assert_eq!(Difficulty::from_mean(9.0), Difficulty::Hard);
        assert_eq!(Difficulty::from_mean(8.0), Difficulty::Hard);
        assert_eq!(Difficulty::from_mean(7.99), Difficulty::Medium);
        assert_eq!(Difficulty::from_mean(6.0), Difficulty::Medium);
        assert_eq!(Difficulty::from_mean(5.99), Difficulty::Easy);
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn overall_is_mean_of_criteria() {
        let scores = ScoreVector::from_values([7.0, 7.0, 7.0, 7.0, 7.0, 7.0, 0.0]);
        assert!((scores.overall() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn strongest_and_weakest_break_ties_canonically() {
        let scores = ScoreVector::from_values([6.0, 9.0, 4.0, 9.0, 4.0, 5.0, 6.0]);
        assert_eq!(scores.strongest(), Criterion::Clarity);
        assert_eq!(scores.weakest(), Criterion::Confidence);

        let flat = ScoreVector::from_values([5.0; 7]);
        assert_eq!(flat.strongest(), Criterion::TechnicalAccuracy);
        assert_eq!(flat.weakest(), Criterion::TechnicalAccuracy);
    }

    #[test]
    fn from_map_rejects_missing_and_unknown() {
        let mut map: BTreeMap<String, f64> = Criterion::ALL
            .iter()
            .map(|c| (c.name().to_string(), 7.0))
            .collect();
        assert!(ScoreVector::from_map(&map).is_ok());

        map.remove("structure");
        let err = ScoreVector::from_map(&map).unwrap_err();
        assert!(err.to_string().contains("missing criterion: structure"));

        map.insert("structure".into(), 7.0);
        map.insert("charisma".into(), 7.0);
        let err = ScoreVector::from_map(&map).unwrap_err();
        assert!(err.to_string().contains("unknown criterion"));
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let scores = ScoreVector::from_values([7.0, 7.0, 11.0, 7.0, 7.0, 7.0, 7.0]);
        assert!(matches!(
            scores.validate(),
            Err(InterviewError::InvalidInput(_))
        ));
        let nan = ScoreVector::from_values([f64::NAN, 7.0, 7.0, 7.0, 7.0, 7.0, 7.0]);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn score_vector_rejects_unknown_json_fields() {
        let json = r#"{"technical_accuracy":7,"clarity":7,"confidence":7,"communication":7,
            "relevance":7,"completeness":7,"structure":7,"charisma":9}"#;
        assert!(serde_json::from_str::<ScoreVector>(json).is_err());
    }

    #[test]
    fn record_counts_words() {
        let question = Question::new(
            "Implement rate limiting for an API",
            Role::Sde,
            Round::Technical,
            Difficulty::Easy,
            Origin::Catalog,
        );
        let record = InterviewRecord::new(
            &question,
            "  use a token   bucket\nper client ",
            ScoreVector::from_values([8.0; 7]),
            None,
        );
        assert_eq!(record.word_count, 6);
        assert_eq!(record.role, Role::Sde);
        assert!((record.overall_score - 8.0).abs() < 1e-9);
    }
}
