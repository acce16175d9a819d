//! The `mockprep benchmarks` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mockprep_core::model::{Criterion, Role};
use mockprep_providers::load_config_from;

use super::load_catalog;

pub fn execute(
    role: Option<Role>,
    catalog: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let catalog = load_catalog(&config, catalog.as_deref())?;

    let roles: Vec<Role> = match role {
        Some(role) => vec![role],
        None => Role::ALL.to_vec(),
    };
    let benchmarks: Vec<_> = roles.iter().map(|r| catalog.benchmark(*r)).collect();

    let mut table = Table::new();
    let mut header = vec![Cell::new("Criterion")];
    header.extend(roles.iter().map(|r| Cell::new(r.label())));
    table.set_header(header);

    for criterion in Criterion::ALL {
        let mut row = vec![Cell::new(criterion.label())];
        row.extend(
            benchmarks
                .iter()
                .map(|b| Cell::new(format!("{:.1}", b.get(criterion)))),
        );
        table.add_row(row);
    }

    let mut overall = vec![Cell::new("Overall")];
    overall.extend(benchmarks.iter().map(|b| Cell::new(format!("{:.1}", b.overall))));
    table.add_row(overall);

    println!("{table}");
    Ok(())
}
