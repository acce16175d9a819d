//! The `mockprep validate` command.

use std::path::PathBuf;

use anyhow::Result;

use mockprep_core::parser::{parse_catalog, validate_catalog};

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalog = parse_catalog(&catalog_path)?;
    println!(
        "Catalog: {} ({} companies)",
        catalog_path.display(),
        catalog.companies().count()
    );

    let warnings = validate_catalog(&catalog);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.section, w.message);
    }

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
