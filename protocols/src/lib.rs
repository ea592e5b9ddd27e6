pub mod descriptor;
pub mod identity;
pub mod record;
pub mod transport;

/// Identity object class, present on every device and port peripheral.
pub const IDENTITY_CLASS: u16 = 0x01;
/// Parameter object class used by the compact-drive dialect.
pub const PARAMETER_CLASS: u16 = 0x0F;
/// Drive-peripheral parameter class used by the linked full-record dialect.
pub const DPI_PARAMETER_CLASS: u16 = 0x93;
/// Alternate parameter class spoken by 20-COMM-E network adapters.
pub const HOST_DPI_PARAMETER_CLASS: u16 = 0x9F;

/// Instance attribute ids of the parameter object.
pub const ATTR_VALUE: u8 = 1;
pub const ATTR_DESCRIPTOR: u8 = 4;
pub const ATTR_DATA_TYPE: u8 = 5;
pub const ATTR_DATA_SIZE: u8 = 6;
