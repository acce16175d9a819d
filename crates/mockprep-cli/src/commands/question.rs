//! The `mockprep question` command: draw one question without answering it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use mockprep_core::model::{Difficulty, Role, Round};
use mockprep_core::scoring::ideal_answer;
use mockprep_core::selector::{QuestionSelector, SelectionContext};
use mockprep_providers::load_config_from;

use super::{load_catalog, make_rng, read_job_description};

#[derive(Debug, Args)]
pub struct QuestionArgs {
    /// Target role: sde, ml, cloud
    #[arg(long)]
    pub role: Role,

    /// Interview round: technical, hr, managerial
    #[arg(long)]
    pub round: Round,

    /// Difficulty tier: easy, medium, hard
    #[arg(long, default_value = "easy")]
    pub difficulty: Difficulty,

    /// Ask a company-specific question
    #[arg(long)]
    pub company: Option<String>,

    /// Job description file to derive the question from
    #[arg(long)]
    pub job_description: Option<PathBuf>,

    /// Ask a coding challenge at the given difficulty
    #[arg(long)]
    pub coding: bool,

    /// Previous answer to follow up on
    #[arg(long)]
    pub previous_answer: Option<String>,

    /// Also print an ideal-answer outline
    #[arg(long)]
    pub show_ideal: bool,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Catalog file overriding the configured one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: QuestionArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let selector = QuestionSelector::new(load_catalog(&config, args.catalog.as_deref())?);
    let mut rng = make_rng(args.seed);

    let mut context = SelectionContext::default().with_coding_challenge(args.coding);
    if let Some(previous) = args.previous_answer {
        context = context.with_follow_up(previous, true);
    }
    if let Some(jd) = read_job_description(args.job_description.as_deref())? {
        context = context.with_job_description(jd);
    }
    if let Some(company) = args.company {
        context = context.with_company(company);
    }

    let question = selector.next(args.role, args.round, args.difficulty, &context, &mut rng);
    println!("{}", question.text);
    println!("  origin: {}, difficulty: {}", question.origin, question.difficulty);
    if args.show_ideal {
        println!("{}", ideal_answer(&question.text));
    }
    Ok(())
}
