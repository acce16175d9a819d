//! Progress tracking: rolling score aggregates, difficulty adaptation, and
//! strength/weakness detection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InterviewError;
use crate::model::{Criterion, Difficulty, Round, ScoreVector, MAX_SCORE, MIN_SCORE};

/// An answer scoring at least this overall contributes a strength.
pub const STRENGTH_THRESHOLD: f64 = 8.0;
/// An answer scoring at most this overall contributes a weakness.
pub const WEAKNESS_THRESHOLD: f64 = 5.0;

/// Everything derived from the recorded history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    scores: Vec<f64>,
    round_scores: BTreeMap<Round, Vec<f64>>,
    total: f64,
    difficulty: Difficulty,
    strengths: Vec<Criterion>,
    weaknesses: Vec<Criterion>,
}

impl ProgressState {
    /// Overall scores in the order they were recorded.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Overall scores recorded for one round.
    pub fn round_scores(&self, round: Round) -> &[f64] {
        self.round_scores
            .get(&round)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Mean of every recorded overall score, `None` before the first record.
    pub fn running_mean(&self) -> Option<f64> {
        (!self.scores.is_empty()).then(|| self.total / self.scores.len() as f64)
    }

    pub fn round_mean(&self, round: Round) -> Option<f64> {
        let scores = self.round_scores(round);
        (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Distinct strengths in first-seen order.
    pub fn strengths(&self) -> &[Criterion] {
        &self.strengths
    }

    /// Distinct weaknesses in first-seen order.
    pub fn weaknesses(&self) -> &[Criterion] {
        &self.weaknesses
    }

    /// The `n` most recently added strengths.
    pub fn recent_strengths(&self, n: usize) -> &[Criterion] {
        &self.strengths[self.strengths.len().saturating_sub(n)..]
    }

    /// The `n` most recently added weaknesses.
    pub fn recent_weaknesses(&self, n: usize) -> &[Criterion] {
        &self.weaknesses[self.weaknesses.len().saturating_sub(n)..]
    }
}

/// Owns the [`ProgressState`] and updates it one record at a time.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    state: ProgressState,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Ingest one answer's scores.
    ///
    /// Rejects non-finite or out-of-range values without touching the state.
    pub fn record(
        &mut self,
        overall: f64,
        scores: &ScoreVector,
        round: Round,
    ) -> Result<&ProgressState, InterviewError> {
        if !overall.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&overall) {
            return Err(InterviewError::InvalidInput(format!(
                "overall score {overall} is outside [{MIN_SCORE}, {MAX_SCORE}]"
            )));
        }
        scores.validate()?;

        let state = &mut self.state;
        state.scores.push(overall);
        state.round_scores.entry(round).or_default().push(overall);
        state.total += overall;

        let mean = state.total / state.scores.len() as f64;
        let previous = state.difficulty;
        state.difficulty = Difficulty::from_mean(mean);
        if state.difficulty != previous {
            tracing::info!(
                from = %previous,
                to = %state.difficulty,
                mean,
                "difficulty adjusted"
            );
        }

        if overall >= STRENGTH_THRESHOLD {
            insert_once(&mut state.strengths, scores.strongest());
        }
        if overall <= WEAKNESS_THRESHOLD {
            insert_once(&mut state.weaknesses, scores.weakest());
        }

        Ok(&self.state)
    }

    /// Forget all history. Difficulty reverts to easy.
    pub fn reset(&mut self) {
        self.state = ProgressState::default();
    }
}

fn insert_once(set: &mut Vec<Criterion>, criterion: Criterion) {
    if !set.contains(&criterion) {
        set.push(criterion);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(v: f64) -> ScoreVector {
        ScoreVector::from_values([v; 7])
    }

    fn record_all(tracker: &mut ProgressTracker, overalls: &[f64]) {
        for &o in overalls {
            tracker.record(o, &uniform(o), Round::Technical).unwrap();
        }
    }

    #[test]
    fn initial_state_is_easy_and_empty() {
        let tracker = ProgressTracker::new();
        assert!(tracker.state().is_empty());
        assert_eq!(tracker.state().difficulty(), Difficulty::Easy);
        assert_eq!(tracker.state().running_mean(), None);
    }

    #[test]
    fn difficulty_follows_running_mean() {
        let cases: [(&[f64], Difficulty); 3] = [
            (&[9.0, 9.0], Difficulty::Hard),
            (&[4.0, 5.0], Difficulty::Easy),
            (&[7.0, 7.0], Difficulty::Medium),
        ];
        for (scores, expected) in cases {
            let mut tracker = ProgressTracker::new();
            record_all(&mut tracker, scores);
            assert_eq!(tracker.state().difficulty(), expected, "scores {scores:?}");
        }
    }

    #[test]
    fn difficulty_can_move_down() {
        let mut tracker = ProgressTracker::new();
        record_all(&mut tracker, &[9.0]);
        assert_eq!(tracker.state().difficulty(), Difficulty::Hard);
        record_all(&mut tracker, &[5.0]);
        assert_eq!(tracker.state().difficulty(), Difficulty::Medium);
        record_all(&mut tracker, &[2.0]);
        assert_eq!(tracker.state().difficulty(), Difficulty::Easy);
    }

    #[test]
    fn difficulty_matches_threshold_after_every_record() {
        let sequence = [6.5, 9.0, 3.0, 10.0, 8.5, 1.0, 7.0, 7.5];
        let mut tracker = ProgressTracker::new();
        let mut sum = 0.0;
        for (i, &score) in sequence.iter().enumerate() {
            let state = tracker.record(score, &uniform(score), Round::Hr).unwrap();
            sum += score;
            let mean = sum / (i + 1) as f64;
            assert_eq!(state.difficulty(), Difficulty::from_mean(mean));
            assert!((state.running_mean().unwrap() - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn per_round_sequences() {
        let mut tracker = ProgressTracker::new();
        tracker.record(8.0, &uniform(8.0), Round::Technical).unwrap();
        tracker.record(6.0, &uniform(6.0), Round::Hr).unwrap();
        tracker.record(7.0, &uniform(7.0), Round::Technical).unwrap();

        let state = tracker.state();
        assert_eq!(state.scores(), [8.0, 6.0, 7.0]);
        assert_eq!(state.round_scores(Round::Technical), [8.0, 7.0]);
        assert_eq!(state.round_scores(Round::Hr), [6.0]);
        assert!(state.round_scores(Round::Managerial).is_empty());
        assert_eq!(state.round_mean(Round::Technical), Some(7.5));
        assert_eq!(state.round_mean(Round::Managerial), None);
    }

    #[test]
    fn strengths_take_the_maximum_criterion() {
        let mut tracker = ProgressTracker::new();
        let scores = ScoreVector::from_values([8.0, 9.5, 8.0, 9.5, 8.0, 8.0, 8.0]);
        tracker.record(8.4, &scores, Round::Technical).unwrap();
        assert_eq!(tracker.state().strengths(), [Criterion::Clarity]);
        assert!(tracker.state().weaknesses().is_empty());
    }

    #[test]
    fn weaknesses_are_deduplicated() {
        let mut tracker = ProgressTracker::new();
        let scores = ScoreVector::from_values([5.0, 5.0, 2.0, 5.0, 5.0, 5.0, 5.0]);
        tracker.record(4.0, &scores, Round::Hr).unwrap();
        tracker.record(3.5, &scores, Round::Managerial).unwrap();
        assert_eq!(tracker.state().weaknesses(), [Criterion::Confidence]);
    }

    #[test]
    fn strengths_are_deduplicated() {
        let mut tracker = ProgressTracker::new();
        let scores = ScoreVector::from_values([8.0, 8.0, 8.0, 10.0, 8.0, 8.0, 8.0]);
        tracker.record(9.0, &scores, Round::Technical).unwrap();
        tracker.record(8.5, &scores, Round::Hr).unwrap();
        tracker.record(8.0, &scores, Round::Technical).unwrap();
        assert_eq!(tracker.state().strengths(), [Criterion::Communication]);
        assert_eq!(tracker.state().recent_strengths(3), [Criterion::Communication]);
        assert!(tracker.state().weaknesses().is_empty());
    }

    #[test]
    fn middling_scores_add_nothing() {
        let mut tracker = ProgressTracker::new();
        record_all(&mut tracker, &[6.0, 7.0, 7.9, 5.1]);
        assert!(tracker.state().strengths().is_empty());
        assert!(tracker.state().weaknesses().is_empty());
    }

    #[test]
    fn recent_entries_keep_insertion_order() {
        let mut tracker = ProgressTracker::new();
        for strongest in 0..5 {
            let mut values = [8.0; 7];
            values[strongest] = 10.0;
            tracker
                .record(9.0, &ScoreVector::from_values(values), Round::Technical)
                .unwrap();
        }
        assert_eq!(
            tracker.state().recent_strengths(3),
            [
                Criterion::Confidence,
                Criterion::Communication,
                Criterion::Relevance
            ]
        );
        assert_eq!(tracker.state().recent_strengths(10).len(), 5);
        assert!(tracker.state().recent_weaknesses(3).is_empty());
    }

    #[test]
    fn invalid_input_leaves_state_untouched() {
        let mut tracker = ProgressTracker::new();
        record_all(&mut tracker, &[7.0]);
        let before = tracker.state().clone();

        let bad = ScoreVector::from_values([7.0, 7.0, -1.0, 7.0, 7.0, 7.0, 7.0]);
        assert!(matches!(
            tracker.record(7.0, &bad, Round::Technical),
            Err(InterviewError::InvalidInput(_))
        ));
        assert!(tracker.record(f64::NAN, &uniform(7.0), Round::Technical).is_err());
        assert!(tracker.record(10.5, &uniform(7.0), Round::Technical).is_err());
        assert_eq!(tracker.state(), &before);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut tracker = ProgressTracker::new();
        record_all(&mut tracker, &[9.0, 9.0, 2.0]);
        tracker.reset();
        assert_eq!(tracker.state(), &ProgressState::default());
        assert_eq!(tracker.state().difficulty(), Difficulty::Easy);
    }
}
