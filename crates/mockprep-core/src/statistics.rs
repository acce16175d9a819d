//! Session analytics: summaries, benchmark gaps, and percentile estimates.
//!
//! Everything here is computed from the recorded history for display only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::Benchmark;
use crate::model::{Criterion, InterviewRecord, Round, ScoreVector, MAX_SCORE};

/// Aggregates over one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total: usize,
    pub average: f64,
    pub best: f64,
    pub latest: f64,
    /// Latest score relative to the first, in percent.
    pub improvement_pct: Option<f64>,
    pub per_round: BTreeMap<Round, RoundStats>,
    /// Average overall score per company, keyed by lowercase name.
    pub per_company: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundStats {
    pub count: usize,
    pub average: f64,
}

/// Summarize a session. `None` when nothing has been recorded.
pub fn summarize(records: &[InterviewRecord]) -> Option<SessionSummary> {
    let first = records.first()?;
    let latest = records.last()?;

    let scores: Vec<f64> = records.iter().map(|r| r.overall_score).collect();
    let average = mean(&scores);
    let best = scores.iter().copied().fold(f64::MIN, f64::max);

    let improvement_pct = (records.len() >= 2 && first.overall_score != 0.0).then(|| {
        (latest.overall_score - first.overall_score) / first.overall_score * 100.0
    });

    let mut by_round: BTreeMap<Round, Vec<f64>> = BTreeMap::new();
    let mut by_company: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in records {
        by_round.entry(r.round).or_default().push(r.overall_score);
        if let Some(company) = &r.company {
            by_company
                .entry(company.clone())
                .or_default()
                .push(r.overall_score);
        }
    }

    let per_round = by_round
        .into_iter()
        .map(|(round, s)| {
            (
                round,
                RoundStats {
                    count: s.len(),
                    average: mean(&s),
                },
            )
        })
        .collect();
    let per_company = by_company
        .into_iter()
        .map(|(company, s)| (company, mean(&s)))
        .collect();

    Some(SessionSummary {
        total: records.len(),
        average,
        best,
        latest: latest.overall_score,
        improvement_pct,
        per_round,
        per_company,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Position of a criterion score relative to its benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GapStatus {
    Above,
    AtLevel,
    Below,
}

impl GapStatus {
    /// Above for any positive gap, below only past half a point.
    pub fn from_gap(gap: f64) -> Self {
        if gap > 0.0 {
            GapStatus::Above
        } else if gap < -0.5 {
            GapStatus::Below
        } else {
            GapStatus::AtLevel
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GapStatus::Above => "Above",
            GapStatus::AtLevel => "At Level",
            GapStatus::Below => "Below",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionGap {
    pub criterion: Criterion,
    pub score: f64,
    pub benchmark: f64,
    pub gap: f64,
    pub status: GapStatus,
}

/// Compare each criterion against the role benchmark, in canonical order.
pub fn benchmark_comparison(scores: &ScoreVector, benchmark: &Benchmark) -> Vec<CriterionGap> {
    scores
        .iter()
        .map(|(criterion, score)| {
            let reference = benchmark.get(criterion);
            let gap = score - reference;
            CriterionGap {
                criterion,
                score,
                benchmark: reference,
                gap,
                status: GapStatus::from_gap(gap),
            }
        })
        .collect()
}

/// Coarse display band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Close,
    Low,
}

impl ScoreBand {
    pub fn classify(score: f64, benchmark: f64) -> Self {
        if score >= benchmark {
            ScoreBand::Good
        } else if score >= benchmark - 1.0 {
            ScoreBand::Close
        } else {
            ScoreBand::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Good => "good",
            ScoreBand::Close => "close",
            ScoreBand::Low => "low",
        }
    }
}

/// Rough percentile of `average` against a benchmark overall score.
///
/// Scores above the benchmark map linearly onto 50..90, scores at or below
/// it onto 0..50.
pub fn performance_percentile(average: f64, benchmark_overall: f64) -> f64 {
    let percentile = if average > benchmark_overall {
        let headroom = MAX_SCORE - benchmark_overall;
        if headroom <= 0.0 {
            90.0
        } else {
            50.0 + (average - benchmark_overall) / headroom * 40.0
        }
    } else if benchmark_overall > 0.0 {
        50.0 * average / benchmark_overall
    } else {
        50.0
    };
    percentile.clamp(0.0, 100.0)
}
