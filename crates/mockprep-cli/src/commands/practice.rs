//! The `mockprep practice` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use rand::Rng;

use mockprep_core::catalog::Benchmark;
use mockprep_core::engine::{Interviewer, QuestionPlan, Submission};
use mockprep_core::error::InterviewError;
use mockprep_core::model::{Criterion, Origin, Personality, Role, Round};
use mockprep_core::scoring::ideal_answer;
use mockprep_core::selector::SelectionContext;
use mockprep_core::session::SessionState;
use mockprep_core::statistics::{benchmark_comparison, performance_percentile, summarize, ScoreBand};
use mockprep_providers::load_config_from;

use super::{build_interviewer, load_catalog, make_rng, read_job_description};

/// Typed on its own line, ends the session.
const QUIT: &str = ":quit";

#[derive(Debug, Args)]
pub struct PracticeArgs {
    /// Target role: sde, ml, cloud
    #[arg(long)]
    pub role: Role,

    /// Interview round: technical, hr, managerial
    #[arg(long)]
    pub round: Round,

    /// Ask company-specific questions
    #[arg(long)]
    pub company: Option<String>,

    /// Job description file used to steer the opening question
    #[arg(long)]
    pub job_description: Option<PathBuf>,

    /// Ask coding challenges at the current difficulty
    #[arg(long)]
    pub coding: bool,

    /// Follow up on each answer before moving on
    #[arg(long)]
    pub follow_ups: bool,

    /// Show an ideal-answer outline after each answer
    #[arg(long)]
    pub show_ideal: bool,

    /// Interviewer style: friendly, strict, expert
    #[arg(long)]
    pub personality: Option<Personality>,

    /// Seed for reproducible question draws and fallback scores
    #[arg(long)]
    pub seed: Option<u64>,

    /// Never call the configured service
    #[arg(long)]
    pub offline: bool,

    /// Catalog file overriding the configured one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: PracticeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let personality = args.personality.unwrap_or(config.personality);
    let catalog = load_catalog(&config, args.catalog.as_deref())?;
    let job_description = read_job_description(args.job_description.as_deref())?;
    let interviewer = build_interviewer(&config, catalog, personality, args.offline)?;
    let mut rng = make_rng(args.seed);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(
        &interviewer,
        &args,
        personality,
        job_description,
        &mut stdin.lock(),
        &mut stdout.lock(),
        &mut rng,
    )
    .await
}

async fn run_session<I, O, R>(
    interviewer: &Interviewer,
    args: &PracticeArgs,
    personality: Personality,
    mut job_description: Option<String>,
    input: &mut I,
    out: &mut O,
    rng: &mut R,
) -> Result<()>
where
    I: BufRead,
    O: Write,
    R: Rng,
{
    let benchmark = interviewer.catalog().benchmark(args.role);
    let mut state = SessionState::new();
    let mut follow_up_on: Option<String> = None;

    writeln!(
        out,
        "mockprep: {} {} interview, {personality} interviewer. Type {QUIT} to finish.",
        args.role.label(),
        args.round.label(),
    )?;

    loop {
        let coding = args.coding;
        let mut context = SelectionContext::default().with_coding_challenge(coding);
        if let Some(company) = &args.company {
            context = context.with_company(company.clone());
        }
        if let Some(jd) = job_description.take() {
            context = context.with_job_description(jd);
        }
        if let Some(previous) = follow_up_on.take() {
            context = context.with_follow_up(previous, true);
        }

        let plan = QuestionPlan::new(args.role, args.round).with_context(context);
        let question = interviewer.next_question(&state, &plan, rng).await;

        writeln!(
            out,
            "\nQuestion {} [{} | {}]",
            state.store.len() + 1,
            question.difficulty,
            question.origin
        )?;
        writeln!(out, "{}", question.text)?;

        let Some(answer) = read_answer(input, out)? else {
            break;
        };

        let submission = match interviewer
            .submit(&mut state, &question, &answer, args.company.as_deref(), rng)
            .await
        {
            Ok(submission) => submission,
            Err(InterviewError::InvalidInput(msg)) => {
                writeln!(out, "Answer rejected: {msg}")?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        print_submission(out, &submission, &benchmark)?;
        if args.show_ideal {
            writeln!(out, "{}", ideal_answer(&question.text))?;
        }

        if args.follow_ups && question.origin != Origin::FollowUp {
            follow_up_on = Some(answer);
        }
    }

    print_summary(out, &state, &benchmark)
}

/// Next non-blank line. `None` on EOF or the quit command.
fn read_answer<I: BufRead, O: Write>(input: &mut I, out: &mut O) -> Result<Option<String>> {
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim();
        if answer == QUIT {
            return Ok(None);
        }
        if answer.is_empty() {
            writeln!(out, "Please type an answer, or {QUIT} to finish.")?;
            continue;
        }
        return Ok(Some(answer.to_string()));
    }
}

fn print_submission<O: Write>(
    out: &mut O,
    submission: &Submission,
    benchmark: &Benchmark,
) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Criterion", "Score", "Benchmark", "Gap", "Status"]);

    for gap in benchmark_comparison(&submission.record.scores, benchmark) {
        let band = ScoreBand::classify(gap.score, gap.benchmark);
        table.add_row(vec![
            Cell::new(gap.criterion.label()),
            Cell::new(format!("{:.1}", gap.score)),
            Cell::new(format!("{:.1}", gap.benchmark)),
            Cell::new(format!("{:+.1}", gap.gap)),
            Cell::new(format!("{} ({})", gap.status.label(), band.label())),
        ]);
    }
    writeln!(out, "\n{table}")?;

    let evaluation = &submission.evaluation;
    let overall = submission.record.overall_score;
    let band = ScoreBand::classify(overall, benchmark.overall);
    let estimate = if evaluation.fallback {
        " (offline estimate)"
    } else {
        ""
    };
    writeln!(
        out,
        "Overall: {overall:.1}/10{estimate}, {} against a benchmark of {:.1}",
        band.label(),
        benchmark.overall
    )?;
    writeln!(out, "Feedback: {}", evaluation.feedback)?;
    if !evaluation.improved_answer.is_empty() {
        writeln!(out, "Improved answer: {}", evaluation.improved_answer)?;
    }
    if submission.difficulty_changed {
        writeln!(out, "Difficulty is now {}.", submission.difficulty)?;
    }
    writeln!(out, "Suggested follow-up: {}", submission.follow_up)?;
    Ok(())
}

fn print_summary<O: Write>(
    out: &mut O,
    state: &SessionState,
    benchmark: &Benchmark,
) -> Result<()> {
    let Some(summary) = summarize(state.store.records()) else {
        writeln!(out, "\nNo answers recorded.")?;
        return Ok(());
    };
    let progress = state.progress.state();

    let improvement = summary
        .improvement_pct
        .map_or_else(|| "n/a".to_string(), |p| format!("{p:+.1}%"));
    let percentile = performance_percentile(summary.average, benchmark.overall);
    let rows = [
        ("Answers", summary.total.to_string()),
        ("Average", format!("{:.1}", summary.average)),
        ("Best", format!("{:.1}", summary.best)),
        ("Latest", format!("{:.1}", summary.latest)),
        ("Improvement", improvement),
        ("Percentile", format!("{percentile:.0}")),
        ("Difficulty", progress.difficulty().label().to_string()),
    ];

    let mut table = Table::new();
    table.set_header(vec!["Session", "Value"]);
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value]);
    }
    writeln!(out, "\n{table}")?;

    for (company, average) in &summary.per_company {
        writeln!(out, "Company {company}: average {average:.1}")?;
    }

    let list = |items: &[Criterion]| {
        let labels: Vec<_> = items.iter().map(|c| c.label()).collect();
        labels.join(", ")
    };
    if !progress.strengths().is_empty() {
        writeln!(out, "Strengths: {}", list(progress.recent_strengths(3)))?;
    }
    if !progress.weaknesses().is_empty() {
        writeln!(out, "Work on: {}", list(progress.recent_weaknesses(3)))?;
    }
    Ok(())
}
