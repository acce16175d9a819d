//! Subcommand implementations and the setup they share.

use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use mockprep_core::catalog::Catalog;
use mockprep_core::engine::Interviewer;
use mockprep_core::model::Personality;
use mockprep_core::parser::parse_catalog;
use mockprep_core::scoring::RubricScorer;
use mockprep_core::selector::{QuestionSelector, QuestionSource};
use mockprep_providers::{create_services, MockprepConfig, Services};

pub mod benchmarks;
pub mod init;
pub mod practice;
pub mod question;
pub mod validate;

/// The catalog named on the command line, else the one in the config, else
/// the built-in data.
pub(crate) fn load_catalog(config: &MockprepConfig, explicit: Option<&Path>) -> Result<Catalog> {
    match explicit.or(config.catalog.as_deref()) {
        Some(path) => parse_catalog(path)
            .with_context(|| format!("failed to load catalog: {}", path.display())),
        None => Ok(Catalog::builtin()),
    }
}

/// Seeded when asked, otherwise from OS entropy.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Wire the configured services (or none) into an interviewer.
pub(crate) fn build_interviewer(
    config: &MockprepConfig,
    catalog: Catalog,
    personality: Personality,
    offline: bool,
) -> Result<Interviewer> {
    let services = if offline {
        Services::offline()
    } else {
        create_services(config.service.as_ref())?
    };
    if services.is_offline() {
        tracing::info!("running offline, answers get fallback scores");
    }

    let mut source = QuestionSource::new(QuestionSelector::new(catalog))
        .with_timeout(config.question_timeout())
        .with_personality(personality);
    if let Some(questions) = services.questions {
        source = source.with_service(questions);
    }

    let scorer = match services.evaluation {
        Some(evaluation) => RubricScorer::new(evaluation),
        None => RubricScorer::offline(),
    }
    .with_timeout(config.evaluation_timeout())
    .with_personality(personality);

    Ok(Interviewer::new(source, scorer))
}

/// Read a job description file, treating a blank file as absent.
pub(crate) fn read_job_description(path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read job description: {}", path.display()))?;
    Ok(Some(text).filter(|t| !t.trim().is_empty()))
}
