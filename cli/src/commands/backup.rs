use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use colored::*;

use paramvault_common::config::{Config, ReadFailurePolicy};
use paramvault_common::model::topology;
use paramvault_core::backup::{BackupService, Outcome};
use paramvault_core::replay::ReplayDirectory;

use crate::terminal::progress::WalkSpinner;

pub async fn backup(
    topology_path: &Path,
    replay_dir: &Path,
    out: PathBuf,
    timeout_ms: u64,
    abort_on_read_failure: bool,
    quiet: u8,
) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(topology_path)
        .with_context(|| format!("reading topology {}", topology_path.display()))?;
    let records = topology::parse_topology(&text)?;

    let cfg = Config {
        timeout: Duration::from_millis(timeout_ms),
        read_failure_policy: if abort_on_read_failure {
            ReadFailurePolicy::AbortDevice
        } else {
            ReadFailurePolicy::SkipParameter
        },
        output_dir: out,
        quiet,
    };

    let factory = ReplayDirectory::load(replay_dir)?;
    tracing::info!(
        "loaded {} capture route(s) from {}",
        factory.routes().count(),
        replay_dir.display()
    );
    let service = BackupService::new(Box::new(factory), cfg.clone());

    let spinner =
        (cfg.quiet == 0).then(|| WalkSpinner::start(&topology_path.display().to_string()));
    let outcomes = service.run(&records).await?;
    if let Some(spinner) = spinner {
        spinner.finish();
    }

    let mut backed_up = 0usize;
    for outcome in &outcomes {
        let name = outcome.module.bold();
        match &outcome.outcome {
            Outcome::BackedUp { files } => {
                backed_up += 1;
                if cfg.quiet < 2 {
                    for file in files {
                        println!("{} {name}  {}", "[+]".green().bold(), file.display());
                    }
                }
            }
            Outcome::Skipped { reason } => {
                if cfg.quiet < 2 {
                    println!("{} {name}  {}", "[*]".yellow().bold(), reason.yellow());
                }
            }
            Outcome::Failed { error } => {
                println!("{} {name}  {}", "[-]".red().bold(), error.red());
            }
        }
    }

    if cfg.quiet == 0 {
        println!(
            "\n{} of {} modules backed up",
            backed_up.to_string().green().bold(),
            outcomes.len()
        );
    }

    anyhow::ensure!(backed_up > 0, "no module could be backed up");
    Ok(())
}
