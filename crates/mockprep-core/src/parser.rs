//! TOML catalog parser.
//!
//! Loads reference data overrides from a TOML file and validates them.
//! Sections that the file leaves out keep their built-in contents.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::{Benchmark, Catalog};
use crate::model::{Criterion, Difficulty, Role, Round, ScoreVector, MAX_SCORE, MIN_SCORE};

/// Intermediate TOML structure for catalog files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlCatalogFile {
    #[serde(default)]
    questions: BTreeMap<String, TomlRoundQuestions>,
    #[serde(default)]
    companies: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    coding_challenges: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    benchmarks: BTreeMap<String, BTreeMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRoundQuestions {
    #[serde(default)]
    technical: Option<Vec<String>>,
    #[serde(default)]
    hr: Option<Vec<String>>,
    #[serde(default)]
    managerial: Option<Vec<String>>,
}

/// Parse a catalog file, layering it over the built-in data.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut catalog = Catalog::builtin();

    for (role_key, rounds) in parsed.questions {
        let role: Role = role_key.parse()?;
        let cells = [
            (Round::Technical, rounds.technical),
            (Round::Hr, rounds.hr),
            (Round::Managerial, rounds.managerial),
        ];
        for (round, items) in cells {
            if let Some(items) = items {
                catalog.set_questions(role, round, clean(items));
            }
        }
    }

    for (company, items) in parsed.companies {
        catalog.set_company(&company, clean(items));
    }

    for (tier, items) in parsed.coding_challenges {
        let difficulty: Difficulty = tier.parse()?;
        catalog.set_coding_challenges(difficulty, clean(items));
    }

    for (role_key, mut values) in parsed.benchmarks {
        let role: Role = role_key.parse()?;
        let overall = values
            .remove("overall")
            .with_context(|| format!("benchmark for {role} is missing `overall`"))?;
        let scores = ScoreVector::from_map(&values)
            .with_context(|| format!("invalid benchmark for {role}"))?;
        catalog.set_benchmark(role, Benchmark { scores, overall });
    }

    tracing::debug!(path = %source_path.display(), "loaded catalog overrides");
    Ok(catalog)
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The catalog section the warning refers to (e.g. "questions.sde.hr").
    pub section: String,
    /// Warning message.
    pub message: String,
}

/// Minimum coding challenges per tier for a varied session.
const MIN_CHALLENGES_PER_TIER: usize = 4;

/// Validate a catalog for common issues.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |section: String, message: String| {
        warnings.push(ValidationWarning { section, message });
    };

    for role in Role::ALL {
        for round in Round::ALL {
            if catalog.questions(role, round).is_err() {
                warn(
                    format!("questions.{role}.{round}"),
                    "no questions; selection will use the generic default".into(),
                );
            }
        }
    }

    for ((role, round), items) in catalog.question_cells() {
        let mut seen = HashSet::new();
        for q in items {
            if !seen.insert(q.to_lowercase()) {
                warn(
                    format!("questions.{role}.{round}"),
                    format!("duplicate question: {q}"),
                );
            }
        }
    }

    for (company, items) in catalog.company_entries() {
        if items.is_empty() {
            warn(
                format!("companies.{company}"),
                "no questions; the generic company question will be used".into(),
            );
        }
    }

    for difficulty in Difficulty::ALL {
        let count = catalog
            .challenge_tiers()
            .find(|(d, _)| **d == difficulty)
            .map(|(_, items)| items.len())
            .unwrap_or(0);
        if count < MIN_CHALLENGES_PER_TIER {
            warn(
                format!("coding_challenges.{difficulty}"),
                format!("only {count} challenge(s), expected at least {MIN_CHALLENGES_PER_TIER}"),
            );
        }
    }

    for (role, benchmark) in catalog.benchmark_entries() {
        for criterion in Criterion::ALL {
            let v = benchmark.get(criterion);
            if !(MIN_SCORE..=MAX_SCORE).contains(&v) {
                warn(
                    format!("benchmarks.{role}"),
                    format!("{} = {v} is outside [0, 10]", criterion.name()),
                );
            }
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&benchmark.overall) {
            warn(
                format!("benchmarks.{role}"),
                format!("overall = {} is outside [0, 10]", benchmark.overall),
            );
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const OVERRIDE_TOML: &str = r#"
[questions.sde]
technical = ["Design a distributed job scheduler", "  ", "Explain consistent hashing"]

[companies]
Initech = ["How would you fix the TPS report pipeline?"]

[coding_challenges]
easy = ["Sum an array", "Count vowels", "Reverse a list", "Find duplicates"]

[benchmarks.cloud]
technical_accuracy = 8.1
clarity = 7.3
confidence = 7.0
communication = 7.2
relevance = 7.7
completeness = 7.4
structure = 7.0
overall = 7.5
"#;

    fn parse(content: &str) -> Result<Catalog> {
        parse_catalog_str(content, &PathBuf::from("catalog.toml"))
    }

    #[test]
    fn parse_overrides_layer_over_builtin() {
        let catalog = parse(OVERRIDE_TOML).unwrap();
        assert_eq!(
            catalog.questions(Role::Sde, Round::Technical).unwrap(),
            ["Design a distributed job scheduler", "Explain consistent hashing"]
        );
        // untouched cells keep built-in data
        assert_eq!(catalog.questions(Role::Sde, Round::Hr).unwrap().len(), 5);
        assert_eq!(catalog.company_questions("initech").unwrap().len(), 1);
        assert_eq!(catalog.company_questions("google").unwrap().len(), 3);
        assert_eq!(
            catalog.coding_challenges(Difficulty::Easy).unwrap()[0],
            "Sum an array"
        );
        assert_eq!(catalog.benchmark(Role::Cloud).overall, 7.5);
        assert_eq!(
            catalog.benchmark(Role::Cloud).get(Criterion::TechnicalAccuracy),
            8.1
        );
    }

    #[test]
    fn parse_empty_file_is_builtin() {
        assert_eq!(parse("").unwrap(), Catalog::builtin());
    }

    #[test]
    fn parse_rejects_unknown_role() {
        let err = parse("[questions.devops]\ntechnical = [\"x\"]\n").unwrap_err();
        assert!(format!("{err:#}").contains("unknown role: devops"));
    }

    #[test]
    fn parse_rejects_incomplete_benchmark() {
        let err = parse("[benchmarks.sde]\nclarity = 7.0\noverall = 7.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("missing criterion"));

        let err = parse("[benchmarks.sde]\nclarity = 7.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("missing `overall`"));
    }

    #[test]
    fn parse_malformed_toml() {
        assert!(parse("this is not [valid toml }{").is_err());
    }

    #[test]
    fn builtin_catalog_has_no_warnings() {
        assert!(validate_catalog(&Catalog::builtin()).is_empty());
    }

    #[test]
    fn validate_reports_empty_cells_and_duplicates() {
        let catalog = parse(
            r#"
[questions.ml]
hr = []
technical = ["Explain dropout", "explain dropout"]

[coding_challenges]
hard = ["Design an LRU cache"]
"#,
        )
        .unwrap();
        let warnings = validate_catalog(&catalog);
        assert!(warnings
            .iter()
            .any(|w| w.section == "questions.ml.hr" && w.message.contains("no questions")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("duplicate question")));
        assert!(warnings
            .iter()
            .any(|w| w.section == "coding_challenges.hard"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, OVERRIDE_TOML).unwrap();

        let catalog = parse_catalog(&path).unwrap();
        assert_eq!(catalog.benchmark(Role::Cloud).overall, 7.5);
        assert!(parse_catalog(&dir.path().join("missing.toml")).is_err());
    }
}
