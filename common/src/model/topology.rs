use std::collections::HashSet;

use serde::Deserialize;

use crate::error::TopologyError;

/// Parent name used by modules that hang directly off the scanning host.
pub const ROOT_MODULE: &str = "Local";

/// One node of the project topology graph, as exported from the controller
/// project. The document encoding is JSON here; the field set is what
/// matters, not the container format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModuleRecord {
    pub name: String,
    #[serde(default)]
    pub catalog_number: String,
    #[serde(default)]
    pub vendor: u16,
    #[serde(default)]
    pub product_type: u16,
    #[serde(default)]
    pub product_code: u16,
    #[serde(default)]
    pub parent_module: String,
    #[serde(default)]
    pub parent_mod_port_id: u16,
    #[serde(default)]
    pub inhibited: bool,
    /// Upstream Ethernet address, when the module has one of its own.
    #[serde(default)]
    pub address: Option<String>,
}

impl ModuleRecord {
    pub fn is_root_child(&self) -> bool {
        self.parent_module == ROOT_MODULE
    }
}

/// Parses the topology document and rejects duplicate module names, which
/// would make parent references ambiguous.
pub fn parse_topology(json: &str) -> Result<Vec<ModuleRecord>, TopologyError> {
    let modules: Vec<ModuleRecord> =
        serde_json::from_str(json).map_err(|e| TopologyError::Document(e.to_string()))?;

    let mut seen: HashSet<&str> = HashSet::new();
    for module in &modules {
        if !seen.insert(module.name.as_str()) {
            return Err(TopologyError::DuplicateModule(module.name.clone()));
        }
    }
    Ok(modules)
}
