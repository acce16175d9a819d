//! End-to-end session tests driving the interviewer through the mock service.
//!
//! These cover the whole question, score, record and summarize loop with a
//! healthy service, a failing one, and one that never answers in time.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use mockprep_core::catalog::Catalog;
use mockprep_core::engine::{Interviewer, QuestionPlan};
use mockprep_core::error::ServiceError;
use mockprep_core::model::{Criterion, Difficulty, Origin, Personality, Role, Round};
use mockprep_core::scoring::{RubricScorer, FALLBACK_FEEDBACK};
use mockprep_core::selector::{QuestionSelector, QuestionSource, SelectionContext};
use mockprep_core::session::{SessionState, SessionStore};
use mockprep_core::statistics::{benchmark_comparison, summarize, GapStatus};
use mockprep_providers::mock::MockService;

fn interviewer_with(service: Arc<MockService>, timeout: Duration) -> Interviewer {
    let source = QuestionSource::new(QuestionSelector::new(Catalog::builtin()))
        .with_service(service.clone())
        .with_timeout(timeout)
        .with_personality(Personality::Strict);
    let scorer = RubricScorer::new(service)
        .with_timeout(timeout)
        .with_personality(Personality::Strict);
    Interviewer::new(source, scorer)
}

#[tokio::test]
async fn e2e_strong_session_climbs_to_hard() {
    let service = Arc::new(
        MockService::new()
            .with_question("How would you shard a write-heavy table?")
            .with_uniform_score(9.0),
    );
    let engine = interviewer_with(service.clone(), Duration::from_secs(5));
    let mut state = SessionState::new();
    let mut rng = StdRng::seed_from_u64(1);
    let plan = QuestionPlan::new(Role::Sde, Round::Technical);

    let first = engine.next_question(&state, &plan, &mut rng).await;
    assert_eq!(first.origin, Origin::Generated);
    assert_eq!(first.difficulty, Difficulty::Easy);
    assert_eq!(first.text, "How would you shard a write-heavy table?");

    let submission = engine
        .submit(
            &mut state,
            &first,
            "Hash the tenant id and keep a database per shard",
            None,
            &mut rng,
        )
        .await
        .unwrap();
    assert!(!submission.evaluation.fallback);
    assert_eq!(submission.record.overall_score, 9.0);
    assert_eq!(submission.difficulty, Difficulty::Hard);
    assert!(submission.difficulty_changed);
    assert!(submission.follow_up.starts_with("You mentioned databases"));

    let request = service.last_evaluate_request().unwrap();
    assert_eq!(request.personality, Personality::Strict);
    assert_eq!(request.role, Role::Sde);

    let second = engine.next_question(&state, &plan, &mut rng).await;
    assert_eq!(second.difficulty, Difficulty::Hard);
    assert_eq!(
        service.last_question_request().unwrap().difficulty,
        Difficulty::Hard
    );

    engine
        .submit(&mut state, &second, "Range partitioning with rebalancing", None, &mut rng)
        .await
        .unwrap();

    let summary = summarize(state.store.records()).unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.average, 9.0);
    assert_eq!(summary.improvement_pct, Some(0.0));
    // uniform scores tie, so the first canonical criterion is strongest every time
    assert_eq!(
        state.progress.state().strengths(),
        [Criterion::TechnicalAccuracy]
    );
    assert!(state.progress.state().weaknesses().is_empty());

    let benchmark = engine.catalog().benchmark(Role::Sde);
    let gaps = benchmark_comparison(&submission.record.scores, &benchmark);
    assert_eq!(gaps.len(), 7);
    assert!(gaps.iter().all(|g| g.status == GapStatus::Above));
}

#[tokio::test]
async fn e2e_directed_questions_skip_generation() {
    let service = Arc::new(MockService::new());
    let engine = interviewer_with(service.clone(), Duration::from_secs(5));
    let state = SessionState::new();
    let mut rng = StdRng::seed_from_u64(9);

    let plan = QuestionPlan::new(Role::Cloud, Round::Hr).with_context(
        SelectionContext::default()
            .with_job_description("Lead a team running our AWS footprint")
            .with_company("Amazon"),
    );
    let question = engine.next_question(&state, &plan, &mut rng).await;

    assert_eq!(question.origin, Origin::JobDescriptionDerived);
    assert!(question.text.contains("AWS requirement"));
    assert_eq!(service.question_calls(), 0);
}

#[tokio::test]
async fn e2e_failing_service_falls_back() {
    let service = Arc::new(
        MockService::new().failing(ServiceError::Api {
            status: 503,
            message: "unavailable".into(),
        }),
    );
    let engine = interviewer_with(service.clone(), Duration::from_secs(5));
    let mut state = SessionState::new();
    let mut rng = StdRng::seed_from_u64(4);
    let plan = QuestionPlan::new(Role::Ml, Round::Managerial);

    let question = engine.next_question(&state, &plan, &mut rng).await;
    assert_eq!(question.origin, Origin::Catalog);
    assert!(engine
        .catalog()
        .questions(Role::Ml, Round::Managerial)
        .unwrap()
        .contains(&question.text));

    let submission = engine
        .submit(&mut state, &question, "I would run an A/B test first", None, &mut rng)
        .await
        .unwrap();
    assert!(submission.evaluation.fallback);
    assert_eq!(submission.evaluation.feedback, FALLBACK_FEEDBACK);
    assert!(submission.evaluation.improved_answer.is_empty());
    assert_eq!(service.question_calls(), 1);
    assert_eq!(service.evaluation_calls(), 1);
    assert_eq!(state.store.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn e2e_slow_service_times_out_to_fallback() {
    let service = Arc::new(MockService::new().with_delay(Duration::from_secs(120)));
    let engine = interviewer_with(service, Duration::from_secs(2));
    let mut state = SessionState::new();
    let mut rng = StdRng::seed_from_u64(8);
    let plan = QuestionPlan::new(Role::Sde, Round::Hr);

    let question = engine.next_question(&state, &plan, &mut rng).await;
    assert_eq!(question.origin, Origin::Catalog);

    let submission = engine
        .submit(&mut state, &question, "I led the migration project", None, &mut rng)
        .await
        .unwrap();
    assert!(submission.evaluation.fallback);
    for (_, score) in submission.record.scores.iter() {
        assert!((5.0..=9.0).contains(&score));
    }
}

#[tokio::test]
async fn e2e_history_survives_serialization_and_reset() {
    let service = Arc::new(MockService::new().with_uniform_score(4.0));
    let engine = interviewer_with(service, Duration::from_secs(5));
    let mut state = SessionState::new();
    let mut rng = StdRng::seed_from_u64(6);
    let plan = QuestionPlan::new(Role::Cloud, Round::Technical);

    for answer in ["It depends", "I am not sure", "Maybe use a cache"] {
        let question = engine.next_question(&state, &plan, &mut rng).await;
        engine
            .submit(&mut state, &question, answer, Some("Netflix"), &mut rng)
            .await
            .unwrap();
    }
    assert_eq!(state.progress.state().difficulty(), Difficulty::Easy);
    assert!(!state.progress.state().weaknesses().is_empty());

    let summary = summarize(state.store.records()).unwrap();
    assert_eq!(summary.per_company.get("netflix"), Some(&4.0));

    let json = serde_json::to_string(&state.store).unwrap();
    let restored: SessionStore = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state.store);

    state.reset();
    assert!(state.store.is_empty());
    assert!(state.progress.state().is_empty());
    assert!(summarize(state.store.records()).is_none());
}
