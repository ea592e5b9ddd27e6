//! The backup run itself.
//!
//! Classifies the topology, opens one session per eligible module, walks
//! its parameters and writes one snapshot file per discovered catalog.
//! Failures stay local to the module being processed; the fleet run always
//! continues.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use paramvault_common::config::Config;
use paramvault_common::model::{DeviceCatalog, IdentityObject, ModuleRecord};
use paramvault_protocols::transport::SessionFactory;

use crate::route;
use crate::walker::DiscoveryWalker;

/// Outbound notification hook for newly seen devices. The chat integration
/// lives behind this trait, outside the workspace.
pub trait DeviceNotifier: Send + Sync {
    fn device_discovered(&self, identity: &IdentityObject);
}

/// Default notifier: a log line.
pub struct LogNotifier;

impl DeviceNotifier for LogNotifier {
    fn device_discovered(&self, identity: &IdentityObject) {
        info!("new device discovered: {identity}");
    }
}

#[derive(Debug)]
pub enum Outcome {
    BackedUp { files: Vec<PathBuf> },
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug)]
pub struct ModuleOutcome {
    pub module: String,
    pub outcome: Outcome,
}

pub struct BackupService {
    factory: Box<dyn SessionFactory>,
    notifier: Box<dyn DeviceNotifier>,
    cfg: Config,
}

impl BackupService {
    pub fn new(factory: Box<dyn SessionFactory>, cfg: Config) -> Self {
        Self {
            factory,
            notifier: Box::new(LogNotifier),
            cfg,
        }
    }

    pub fn with_notifier(mut self, notifier: Box<dyn DeviceNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Runs the whole fleet backup over a topology snapshot.
    pub async fn run(&self, records: &[ModuleRecord]) -> anyhow::Result<Vec<ModuleOutcome>> {
        tokio::fs::create_dir_all(&self.cfg.output_dir)
            .await
            .with_context(|| {
                format!("creating output directory {}", self.cfg.output_dir.display())
            })?;

        let mut seen_serials: HashSet<u32> = HashSet::new();
        let mut outcomes = Vec::new();

        for module in route::classify(records) {
            let name = module.record.name.clone();
            if let Some(reason) = &module.skip_reason {
                info!("skipping '{name}': {reason}");
                outcomes.push(ModuleOutcome {
                    module: name,
                    outcome: Outcome::Skipped {
                        reason: reason.to_string(),
                    },
                });
                continue;
            }

            // Eligibility guarantees a route.
            let route = module.route.as_deref().expect("eligible module has a route");
            let outcome = match self.backup_module(&name, route, &mut seen_serials).await {
                Ok(files) => {
                    info!("'{name}': {} snapshot(s) written", files.len());
                    Outcome::BackedUp { files }
                }
                Err(err) => {
                    warn!("'{name}': {err:#}, continuing with next module");
                    Outcome::Failed {
                        error: format!("{err:#}"),
                    }
                }
            };
            outcomes.push(ModuleOutcome {
                module: name,
                outcome,
            });
        }

        Ok(outcomes)
    }

    async fn backup_module(
        &self,
        name: &str,
        route: &str,
        seen_serials: &mut HashSet<u32>,
    ) -> anyhow::Result<Vec<PathBuf>> {
        info!("registering session with '{name}' via route '{route}'");
        let mut session = self.factory.register_session(route).await?;

        let walked = DiscoveryWalker::new(session.as_mut(), &self.cfg).walk().await;
        // The session is torn down whether or not the walk succeeded.
        if let Err(err) = session.unregister_session().await {
            warn!("'{name}': unregister failed: {err}");
        }
        let catalogs = walked?;

        let mut files = Vec::new();
        for catalog in catalogs.values() {
            if seen_serials.insert(catalog.identity.serial_number) {
                self.notifier.device_discovered(&catalog.identity);
            }
            files.push(self.write_snapshot(name, catalog).await?);
        }
        Ok(files)
    }

    async fn write_snapshot(
        &self,
        module: &str,
        catalog: &DeviceCatalog,
    ) -> anyhow::Result<PathBuf> {
        let file_name = if catalog.port == 0 {
            format!("{}.json", sanitize(module))
        } else {
            format!("{}_port{}.json", sanitize(module), catalog.port)
        };
        let path = self.cfg.output_dir.join(file_name);
        tokio::fs::write(&path, catalog.to_snapshot().to_json())
            .await
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        Ok(path)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
