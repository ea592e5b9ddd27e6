//! Parameter discovery.
//!
//! One walker per registered session. The walker probes the device
//! identity, resolves its family, then runs that family's discovery
//! strategy: per-attribute reads over a generated table, or the linked
//! 72-byte record chain with backplane port enumeration. Requests on the
//! session are strictly sequential.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, error, info, warn};

use paramvault_common::config::{Config, ReadFailurePolicy};
use paramvault_common::model::{DeviceCatalog, IdentityObject, Parameter};
use paramvault_protocols::descriptor::{self, DescriptorType};
use paramvault_protocols::identity::parse_identity;
use paramvault_protocols::record::parse_record;
use paramvault_protocols::transport::{ExplicitSession, TransportError};
use paramvault_protocols::{
    ATTR_DATA_SIZE, ATTR_DATA_TYPE, ATTR_DESCRIPTOR, ATTR_VALUE, HOST_DPI_PARAMETER_CLASS,
    IDENTITY_CLASS,
};

use crate::codec;
use crate::registry::{self, DeviceFamily, DiscoveryStrategy};
use crate::tables::ParamSpec;

/// Chain start offset per backplane slot. Slot 0 is the drive host itself;
/// slots 1..=14 hold port peripherals.
pub const PORT_OFFSETS: [u16; 15] = [
    0x0000, 0x4400, 0x4800, 0x4C00, 0x5000, 0x5400, 0x5800, 0x5C00, 0x6000, 0x6400, 0x6800,
    0x6C00, 0x7000, 0x7400, 0x7800,
];

pub fn port_offset(slot: u8) -> Option<u16> {
    PORT_OFFSETS.get(slot as usize).copied()
}

/// Product code reported by HIM keypads and empty backplane slots.
const HIM_PRODUCT_CODE: u16 = 0x00C2;

/// Identity instances probed for port peripherals.
const PORT_INSTANCES: std::ops::RangeInclusive<u16> = 2..=15;

const PER_ATTRIBUTE_IDS: &[(&str, u8)] = &[
    ("Parameter Value", ATTR_VALUE),
    ("Descriptor", ATTR_DESCRIPTOR),
    ("Data Type", ATTR_DATA_TYPE),
    ("Data Size", ATTR_DATA_SIZE),
];

pub struct DiscoveryWalker<'a> {
    session: &'a mut dyn ExplicitSession,
    cfg: &'a Config,
}

impl<'a> DiscoveryWalker<'a> {
    pub fn new(session: &'a mut dyn ExplicitSession, cfg: &'a Config) -> Self {
        Self { session, cfg }
    }

    /// Discovers everything reachable on this session: the device itself
    /// and, for backplane families, one catalog per occupied port, keyed
    /// by port number. The map makes the port explicit instead of relying
    /// on discovery order.
    pub async fn walk(&mut self) -> anyhow::Result<BTreeMap<u8, DeviceCatalog>> {
        let timeout = self.cfg.timeout;
        let bytes = bounded(timeout, self.session.get_attribute_all(IDENTITY_CLASS, 1))
            .await
            .context("reading device identity")?;
        let identity = parse_identity(&bytes).context("parsing device identity")?;
        let family = registry::resolve(identity.device_type, identity.product_code);
        info!("identified {identity} as {family:?}");

        match family.strategy() {
            DiscoveryStrategy::IdentityOnly => {
                info!(
                    "no parameter dialect registered for type {} code {}, keeping identity only",
                    identity.device_type, identity.product_code
                );
                Ok(BTreeMap::from([(
                    0,
                    DeviceCatalog::new(family.parameter_class(), identity, 0),
                )]))
            }
            DiscoveryStrategy::PerAttribute => Ok(BTreeMap::from([(
                0,
                self.walk_per_attribute(family, identity).await,
            )])),
            DiscoveryStrategy::LinkedRecord => self.walk_linked(family, identity).await,
        }
    }

    /// Strategy (a): read Data Type and Parameter Value per table entry.
    async fn walk_per_attribute(
        &mut self,
        family: DeviceFamily,
        identity: IdentityObject,
    ) -> DeviceCatalog {
        let class = family.parameter_class();
        let mut catalog =
            DeviceCatalog::new(class, identity, 0).with_attribute_ids(PER_ATTRIBUTE_IDS);
        let mut tag_cache: HashMap<u16, u8> = HashMap::new();

        for spec in family.parameter_table() {
            if !spec.record {
                continue;
            }
            match self.read_parameter(class, family, spec, &mut tag_cache).await {
                Ok(parameter) => catalog.push(parameter),
                Err(err) => match self.cfg.read_failure_policy {
                    ReadFailurePolicy::SkipParameter => {
                        warn!(
                            "parameter {} ({}): {err}, skipping",
                            spec.number, spec.name
                        );
                    }
                    ReadFailurePolicy::AbortDevice => {
                        warn!(
                            "parameter {} ({}): {err}, aborting device",
                            spec.number, spec.name
                        );
                        catalog.complete = false;
                        break;
                    }
                },
            }
        }
        catalog
    }

    async fn read_parameter(
        &mut self,
        class: u16,
        family: DeviceFamily,
        spec: &ParamSpec,
        tag_cache: &mut HashMap<u16, u8>,
    ) -> Result<Parameter, TransportError> {
        let timeout = self.cfg.timeout;

        let tag = match tag_cache.get(&spec.number) {
            Some(tag) => *tag,
            None => {
                let bytes = bounded(
                    timeout,
                    self.session
                        .get_attribute_single(class, spec.number, ATTR_DATA_TYPE),
                )
                .await?;
                let tag = bytes.first().copied().unwrap_or(0xFF);
                tag_cache.insert(spec.number, tag);
                tag
            }
        };

        let value_bytes = bounded(
            timeout,
            self.session
                .get_attribute_single(class, spec.number, ATTR_VALUE),
        )
        .await?;

        let semantic = family.semantic_of(tag);
        let parameter = Parameter {
            number: spec.number,
            name: spec.name.to_string(),
            current_value: codec::decode_value(&value_bytes, semantic),
            default_value: spec.default.to_string(),
            raw_type_tag: tag,
            raw_size: semantic.size() as u8,
            writable: true,
            record: spec.record,
            port: None,
        };
        if parameter.is_unknown() {
            debug!(
                "parameter {} ({}): tag {tag:#04x} with {} value byte(s) did not decode",
                spec.number,
                spec.name,
                value_bytes.len()
            );
        }
        Ok(parameter)
    }

    /// Strategy (b): the linked record chain, plus port enumeration.
    async fn walk_linked(
        &mut self,
        family: DeviceFamily,
        identity: IdentityObject,
    ) -> anyhow::Result<BTreeMap<u8, DeviceCatalog>> {
        let mut catalogs = BTreeMap::new();
        catalogs.insert(
            0,
            self.walk_chain(family.parameter_class(), family, identity, 0)
                .await,
        );

        for instance in PORT_INSTANCES {
            let slot = (instance - 1) as u8;
            let peer = match self.probe_port(instance).await {
                Ok(peer) => peer,
                Err(err) => {
                    debug!("no usable identity at instance {instance}: {err:#}");
                    continue;
                }
            };

            if peer.product_code == HIM_PRODUCT_CODE
                || peer.product_name.contains("HIM")
                || peer.product_name.contains("Not")
            {
                debug!("slot {slot}: skipping '{}'", peer.product_name);
                continue;
            }
            if peer.product_name.contains("Safe Torque Off") {
                info!("slot {slot}: Safe Torque Off module has no supported decode, skipping");
                continue;
            }

            // Network adapters expose their chain on the host-side class.
            let class = if peer.product_name.contains("20-COMM-E") {
                HOST_DPI_PARAMETER_CLASS
            } else {
                family.parameter_class()
            };

            info!("slot {slot}: walking '{}'", peer.product_name);
            catalogs.insert(slot, self.walk_chain(class, family, peer, slot).await);
        }

        Ok(catalogs)
    }

    async fn probe_port(
        &mut self,
        instance: u16,
    ) -> anyhow::Result<IdentityObject> {
        let bytes = bounded(
            self.cfg.timeout,
            self.session.get_attribute_all(IDENTITY_CLASS, instance),
        )
        .await?;
        Ok(parse_identity(&bytes)?)
    }

    /// Follows the record chain from `1 + port offset`. The chain only ever
    /// moves forward: a next-index at or below the current one terminates
    /// the walk, which also defuses malformed or terminal records that
    /// would otherwise loop forever.
    async fn walk_chain(
        &mut self,
        class: u16,
        family: DeviceFamily,
        identity: IdentityObject,
        slot: u8,
    ) -> DeviceCatalog {
        let mut catalog = DeviceCatalog::new(class, identity, slot);
        let Some(offset) = port_offset(slot) else {
            error!("slot {slot} has no chain offset");
            catalog.complete = false;
            return catalog;
        };

        let mut index = offset + 1;
        loop {
            let bytes = match bounded(
                self.cfg.timeout,
                self.session.get_attribute_all(class, index),
            )
            .await
            {
                Ok(bytes) => bytes,
                Err(err) => {
                    warn!("record {index:#06x}: {err}, stopping chain");
                    catalog.complete = false;
                    break;
                }
            };

            let record = match parse_record(&bytes) {
                Ok(record) => record,
                Err(err) => {
                    // A truncated record corrupts every following link, so
                    // this is surfaced as an error, not skipped over.
                    error!("record {index:#06x}: {err}");
                    catalog.complete = false;
                    break;
                }
            };

            let desc = descriptor::decode(record.descriptor);
            let tag = desc.data_type.tag();
            let semantic = family.semantic_of(tag);
            if desc.data_type == DescriptorType::Text {
                debug!("record {index:#06x} ({}) is text, value not decoded", record.name);
            }

            catalog.push(Parameter {
                number: index - offset,
                name: record.name.clone(),
                current_value: codec::decode_value(&record.value, semantic),
                default_value: codec::decode_value(&record.default, semantic),
                raw_type_tag: tag,
                raw_size: semantic.size() as u8,
                writable: desc.writable,
                record: desc.writable,
                port: (slot != 0).then_some(slot),
            });

            if record.next <= index {
                break;
            }
            index = record.next;
        }

        catalog
    }
}

async fn bounded<T>(
    timeout: Duration,
    request: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    match tokio::time::timeout(timeout, request).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(timeout)),
    }
}
