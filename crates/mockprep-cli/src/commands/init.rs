//! The `mockprep init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("mockprep.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("catalog.toml"), SAMPLE_CATALOG)?;

    println!("\nNext steps:");
    println!("  1. Uncomment a [service] section in mockprep.toml, or stay offline");
    println!("  2. Run: mockprep validate --catalog catalog.toml");
    println!("  3. Run: mockprep practice --role sde --round technical");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mockprep configuration

# friendly, strict or expert
personality = "friendly"
question_timeout_secs = 10
evaluation_timeout_secs = 15
catalog = "catalog.toml"

# Without a [service] section every answer gets an offline estimate.

# [service]
# type = "api"
# base_url = "${MOCKPREP_API_URL}"
# api_key = "${MOCKPREP_API_KEY}"

# [service]
# type = "ollama"
# base_url = "http://localhost:11434"
# model = "llama3.1"
"#;

const SAMPLE_CATALOG: &str = r#"# mockprep catalog overrides
#
# Sections left out keep the built-in questions and benchmarks.

[questions.sde]
technical = [
    "Design a URL shortener that handles a billion redirects a day",
    "How would you find a memory leak in a long-running service?",
    "Explain the trade-offs between optimistic and pessimistic locking",
    "Walk me through what happens when you type a URL into a browser",
]

[companies]
initech = [
    "How would you modernise a legacy reporting pipeline?",
    "Tell me about a time you pushed back on a process that wasted time.",
]

# [benchmarks.sde]
# technical_accuracy = 8.0
# clarity = 7.5
# confidence = 7.2
# communication = 7.8
# relevance = 8.2
# completeness = 7.5
# structure = 7.3
# overall = 7.6
"#;
