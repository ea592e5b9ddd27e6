//! Topology classification and bridging routes.
//!
//! A module that is not directly addressable from the scanning host is
//! reached by bridging: the route is the ordered `port,address` hop
//! sequence from the host down to the module. Classification and route
//! building are pure over the topology snapshot, so rebuilding is
//! idempotent.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use paramvault_common::model::ModuleRecord;

use crate::registry;

/// Why a module was excluded from the backup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Inhibited,
    Unsupported { device_type: u16, product_code: u16 },
    NoAddress,
    NoRoute,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Inhibited => write!(f, "Inhibited"),
            SkipReason::Unsupported {
                device_type,
                product_code,
            } => write!(
                f,
                "Unsupported device type {device_type} (product code {product_code})"
            ),
            SkipReason::NoAddress => write!(f, "No Ethernet address"),
            SkipReason::NoRoute => write!(f, "Unable to build route"),
        }
    }
}

/// A classified topology node: the input record plus eligibility and, when
/// eligible, its bridging route.
#[derive(Debug, Clone)]
pub struct TopologyModule {
    pub record: ModuleRecord,
    pub route: Option<String>,
    pub skip_reason: Option<SkipReason>,
}

impl TopologyModule {
    pub fn eligible(&self) -> bool {
        self.skip_reason.is_none()
    }
}

/// Classifies every module of a topology snapshot and computes routes for
/// the eligible ones.
pub fn classify(records: &[ModuleRecord]) -> Vec<TopologyModule> {
    let by_name: HashMap<&str, &ModuleRecord> =
        records.iter().map(|r| (r.name.as_str(), r)).collect();

    records
        .iter()
        .map(|record| {
            let outcome = classify_one(record, &by_name);
            let (route, skip_reason) = match outcome {
                Ok(route) => (Some(route), None),
                Err(reason) => {
                    debug!("module '{}' skipped: {}", record.name, reason);
                    (None, Some(reason))
                }
            };
            TopologyModule {
                record: record.clone(),
                route,
                skip_reason,
            }
        })
        .collect()
}

fn classify_one(
    record: &ModuleRecord,
    by_name: &HashMap<&str, &ModuleRecord>,
) -> Result<String, SkipReason> {
    if record.inhibited {
        return Err(SkipReason::Inhibited);
    }
    if !registry::is_registered(record.product_type, record.product_code) {
        return Err(SkipReason::Unsupported {
            device_type: record.product_type,
            product_code: record.product_code,
        });
    }
    if resolve_address(record).is_none() {
        return Err(SkipReason::NoAddress);
    }
    build_route(record, by_name)
}

/// Address used for a hop. A module only ever contributes its own address;
/// there is no inheritance from ancestors.
fn resolve_address(module: &ModuleRecord) -> Option<&str> {
    module.address.as_deref().filter(|a| !a.is_empty())
}

/// Walks the parent chain upward from `target`, prepending one
/// `port,address` segment per hop, so the finished string reads
/// host-to-leaf. Stops at the topology root or a self-referential parent.
/// A parent chain that revisits a module is cyclic and can never reach the
/// root, so the walk fails that module instead of spinning.
fn build_route(
    target: &ModuleRecord,
    by_name: &HashMap<&str, &ModuleRecord>,
) -> Result<String, SkipReason> {
    let mut segments: Vec<String> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = target;

    loop {
        if !visited.insert(current.name.as_str()) {
            return Err(SkipReason::NoRoute);
        }
        let address = resolve_address(current).ok_or(SkipReason::NoRoute)?;
        segments.insert(0, format!("{},{}", current.parent_mod_port_id, address));

        if current.is_root_child() || current.parent_module == current.name {
            break;
        }
        current = by_name
            .get(current.parent_module.as_str())
            .ok_or(SkipReason::NoRoute)?;
    }

    Ok(segments.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use paramvault_common::model::ROOT_MODULE;

    fn module(
        name: &str,
        parent: &str,
        port: u16,
        address: Option<&str>,
        inhibited: bool,
    ) -> ModuleRecord {
        ModuleRecord {
            name: name.to_string(),
            catalog_number: String::new(),
            vendor: 1,
            product_type: 150,
            product_code: 11,
            parent_module: parent.to_string(),
            parent_mod_port_id: port,
            inhibited,
            address: address.map(str::to_string),
        }
    }

    #[test]
    fn root_child_gets_a_single_segment_route() {
        let records = vec![module("A", ROOT_MODULE, 2, Some("10.90.1.15"), false)];
        let classified = classify(&records);
        assert!(classified[0].eligible());
        assert_eq!(classified[0].route.as_deref(), Some("2,10.90.1.15"));
    }

    #[test]
    fn two_hop_route_reads_host_to_leaf() {
        let records = vec![
            module("A", ROOT_MODULE, 1, Some("10.0.0.5"), false),
            module("B", "A", 2, Some("10.0.0.6"), false),
        ];
        let classified = classify(&records);
        let b = classified.iter().find(|m| m.record.name == "B").unwrap();
        assert_eq!(b.route.as_deref(), Some("1,10.0.0.5,2,10.0.0.6"));
    }

    #[test]
    fn inhibited_wins_over_everything_else() {
        // Even with a good address and registered identity.
        let records = vec![module("A", ROOT_MODULE, 2, Some("10.0.0.5"), true)];
        let classified = classify(&records);
        assert!(!classified[0].eligible());
        assert_eq!(classified[0].skip_reason, Some(SkipReason::Inhibited));
        assert_eq!(classified[0].skip_reason.as_ref().unwrap().to_string(), "Inhibited");
    }

    #[test]
    fn unregistered_identity_is_unsupported() {
        let mut record = module("A", ROOT_MODULE, 2, Some("10.0.0.5"), false);
        record.product_type = 77;
        let classified = classify(&[record]);
        assert_eq!(
            classified[0].skip_reason,
            Some(SkipReason::Unsupported {
                device_type: 77,
                product_code: 11
            })
        );
        assert!(classified[0]
            .skip_reason
            .as_ref()
            .unwrap()
            .to_string()
            .starts_with("Unsupported device type"));
    }

    #[test]
    fn missing_address_is_reported_as_such() {
        let records = vec![module("A", ROOT_MODULE, 2, None, false)];
        let classified = classify(&records);
        assert_eq!(classified[0].skip_reason, Some(SkipReason::NoAddress));
        assert_eq!(
            classified[0].skip_reason.as_ref().unwrap().to_string(),
            "No Ethernet address"
        );
    }

    #[test]
    fn dangling_parent_fails_the_route() {
        let records = vec![module("B", "Ghost", 2, Some("10.0.0.6"), false)];
        let classified = classify(&records);
        assert_eq!(classified[0].skip_reason, Some(SkipReason::NoRoute));
    }

    #[test]
    fn ancestor_without_its_own_address_fails_the_route() {
        // No address inheritance: the hop through A cannot be expressed.
        let records = vec![
            module("A", ROOT_MODULE, 1, None, false),
            module("B", "A", 2, Some("10.0.0.6"), false),
        ];
        let classified = classify(&records);
        let b = classified.iter().find(|m| m.record.name == "B").unwrap();
        assert_eq!(b.skip_reason, Some(SkipReason::NoRoute));
    }

    #[test]
    fn parent_cycle_fails_both_modules_instead_of_looping() {
        // A and B point at each other; neither chain can reach the root.
        let records = vec![
            module("A", "B", 1, Some("10.0.0.5"), false),
            module("B", "A", 2, Some("10.0.0.6"), false),
            module("C", ROOT_MODULE, 3, Some("10.0.0.7"), false),
        ];
        let classified = classify(&records);

        let a = classified.iter().find(|m| m.record.name == "A").unwrap();
        let b = classified.iter().find(|m| m.record.name == "B").unwrap();
        assert_eq!(a.skip_reason, Some(SkipReason::NoRoute));
        assert_eq!(b.skip_reason, Some(SkipReason::NoRoute));

        // The cycle stays local; the healthy sibling still routes.
        let c = classified.iter().find(|m| m.record.name == "C").unwrap();
        assert_eq!(c.route.as_deref(), Some("3,10.0.0.7"));
    }

    #[test]
    fn self_referential_parent_terminates_the_walk() {
        let records = vec![module("A", "A", 3, Some("10.0.0.9"), false)];
        let classified = classify(&records);
        assert_eq!(classified[0].route.as_deref(), Some("3,10.0.0.9"));
    }

    #[test]
    fn classification_is_idempotent() {
        let records = vec![
            module("A", ROOT_MODULE, 1, Some("10.0.0.5"), false),
            module("B", "A", 2, Some("10.0.0.6"), false),
            module("C", "Ghost", 1, Some("10.0.0.7"), false),
            module("D", ROOT_MODULE, 4, None, false),
        ];
        let first = classify(&records);
        let second = classify(&records);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.route, b.route);
            assert_eq!(a.skip_reason, b.skip_reason);
        }
    }
}
