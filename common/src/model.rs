pub mod catalog;
pub mod identity;
pub mod parameter;
pub mod topology;

pub use catalog::{DeviceCatalog, Snapshot, SnapshotEntry};
pub use identity::IdentityObject;
pub use parameter::{Parameter, UNKNOWN_VALUE};
pub use topology::{ModuleRecord, ROOT_MODULE};
