use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mockprep_core::model::{Difficulty, Role, Round};
use mockprep_core::selector::{QuestionSelector, SelectionContext};
use rand::rngs::StdRng;
use rand::SeedableRng;

const JOB_DESCRIPTION: &str = "We are hiring a senior backend engineer to own our \
    Kubernetes platform, build internal tooling, and mentor a growing team.";

fn bench_selection(c: &mut Criterion) {
    let selector = QuestionSelector::default();
    let mut rng = StdRng::seed_from_u64(0);
    let mut group = c.benchmark_group("select_question");

    let contexts = [
        ("catalog", SelectionContext::default()),
        (
            "follow_up",
            SelectionContext::default()
                .with_follow_up("We sharded the database and added caching", true),
        ),
        (
            "job_description",
            SelectionContext::default().with_job_description(JOB_DESCRIPTION),
        ),
        ("company", SelectionContext::default().with_company("Amazon")),
        (
            "coding",
            SelectionContext::default().with_coding_challenge(true),
        ),
    ];

    for (name, ctx) in &contexts {
        group.bench_function(*name, |b| {
            b.iter(|| {
                selector.next(
                    Role::Sde,
                    Round::Technical,
                    Difficulty::Medium,
                    black_box(ctx),
                    &mut rng,
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
