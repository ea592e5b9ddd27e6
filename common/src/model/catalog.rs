use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use super::identity::IdentityObject;
use super::parameter::Parameter;

/// Everything learned about one physical device or one port-subdevice.
///
/// A backplane drive yields one catalog per occupied port; each catalog is
/// finalized into its own snapshot file. Parameter numbers are unique within
/// a catalog; a duplicate insert is dropped with a warning.
#[derive(Debug)]
pub struct DeviceCatalog {
    /// Object class the parameter reads were issued against.
    pub class_id: u16,
    pub identity: IdentityObject,
    parameters: Vec<Parameter>,
    numbers: HashMap<u16, usize>,
    /// Instance attribute name -> attribute id, as the family dialect defines them.
    pub attribute_ids: HashMap<&'static str, u8>,
    pub port: u8,
    /// Cleared when a walk was cut short; an incomplete catalog is still
    /// internally consistent, it just covers fewer parameters.
    pub complete: bool,
}

impl DeviceCatalog {
    pub fn new(class_id: u16, identity: IdentityObject, port: u8) -> Self {
        Self {
            class_id,
            identity,
            parameters: Vec::new(),
            numbers: HashMap::new(),
            attribute_ids: HashMap::new(),
            port,
            complete: true,
        }
    }

    pub fn with_attribute_ids(mut self, ids: &[(&'static str, u8)]) -> Self {
        self.attribute_ids.extend(ids.iter().copied());
        self
    }

    pub fn attribute_id(&self, name: &str) -> Option<u8> {
        self.attribute_ids.get(name).copied()
    }

    pub fn push(&mut self, parameter: Parameter) {
        if self.numbers.contains_key(&parameter.number) {
            warn!(
                "duplicate parameter {} on {}, keeping first",
                parameter.number, self.identity.product_name
            );
            return;
        }
        self.numbers.insert(parameter.number, self.parameters.len());
        self.parameters.push(parameter);
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Finalizes the catalog into the snapshot document: keeps only
    /// record-flagged parameters whose live value differs from the default.
    pub fn to_snapshot(&self) -> Snapshot {
        let parameters = self
            .parameters
            .iter()
            .filter(|p| p.record && p.is_modified())
            .map(|p| SnapshotEntry {
                number: p.number,
                name: p.name.clone(),
                value: p.current_value.clone(),
                default: p.default_value.clone(),
            })
            .collect();

        Snapshot {
            identity: self.identity.clone(),
            port: self.port,
            complete: self.complete,
            parameters,
        }
    }
}

/// The written backup artifact: identity metadata plus the filtered
/// parameter list.
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub identity: IdentityObject,
    pub port: u8,
    pub complete: bool,
    pub parameters: Vec<SnapshotEntry>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotEntry {
    pub number: u16,
    pub name: String,
    pub value: String,
    pub default: String,
}

impl Snapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("snapshot serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identity::Revision;

    fn identity() -> IdentityObject {
        IdentityObject {
            vendor_id: 1,
            device_type: 150,
            product_code: 11,
            revision: Revision { major: 5, minor: 1 },
            status: 0,
            serial_number: 0xDEAD_BEEF,
            product_name: "PowerFlex 525".into(),
        }
    }

    fn param(number: u16, value: &str, default: &str, record: bool) -> Parameter {
        Parameter {
            number,
            name: format!("P{number:03}"),
            current_value: value.into(),
            default_value: default.into(),
            raw_type_tag: 0x03,
            raw_size: 2,
            writable: true,
            record,
            port: None,
        }
    }

    #[test]
    fn finalization_keeps_modified_record_parameters_only() {
        let mut catalog = DeviceCatalog::new(0x0F, identity(), 0);
        catalog.push(param(41, "20", "10", true)); // modified, kept
        catalog.push(param(42, "10", "10", true)); // at default, dropped
        catalog.push(param(43, "99", "10", false)); // not record-flagged, dropped

        let snapshot = catalog.to_snapshot();
        assert_eq!(snapshot.parameters.len(), 1);
        assert_eq!(snapshot.parameters[0].number, 41);
        assert_eq!(snapshot.parameters[0].value, "20");
    }

    #[test]
    fn duplicate_parameter_numbers_keep_first() {
        let mut catalog = DeviceCatalog::new(0x0F, identity(), 0);
        catalog.push(param(41, "20", "10", true));
        catalog.push(param(41, "30", "10", true));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.parameters()[0].current_value, "20");
    }

    #[test]
    fn attribute_ids_resolve_by_dialect_name() {
        let catalog = DeviceCatalog::new(0x0F, identity(), 0)
            .with_attribute_ids(&[("Parameter Value", 1), ("Data Type", 5)]);
        assert_eq!(catalog.attribute_id("Parameter Value"), Some(1));
        assert_eq!(catalog.attribute_id("Data Type"), Some(5));
        assert_eq!(catalog.attribute_id("Descriptor"), None);
    }

    #[test]
    fn snapshot_serializes_identity_and_entries() {
        let mut catalog = DeviceCatalog::new(0x0F, identity(), 0);
        catalog.push(param(41, "20", "10", true));

        let json = catalog.to_snapshot().to_json();
        let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(doc["identity"]["product_name"], "PowerFlex 525");
        assert_eq!(doc["parameters"][0]["number"], 41);
    }
}
