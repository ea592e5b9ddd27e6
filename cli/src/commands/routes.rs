use std::path::Path;

use anyhow::Context;
use colored::*;

use paramvault_common::model::topology;
use paramvault_core::route;

pub fn routes(topology_path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(topology_path)
        .with_context(|| format!("reading topology {}", topology_path.display()))?;
    let records = topology::parse_topology(&text)?;
    let classified = route::classify(&records);

    for module in &classified {
        let name = module.record.name.bold();
        match (&module.route, &module.skip_reason) {
            (Some(route), _) => {
                println!("{} {name}  {}", "[+]".green().bold(), route.cyan());
            }
            (None, Some(reason)) => {
                println!("{} {name}  {}", "[-]".red().bold(), reason.to_string().yellow());
            }
            (None, None) => unreachable!("classified module has a route or a reason"),
        }
    }

    let eligible = classified.iter().filter(|m| m.eligible()).count();
    println!(
        "\n{} of {} modules eligible for backup",
        eligible.to_string().green().bold(),
        classified.len()
    );
    Ok(())
}
