pub mod backup;
pub mod codec;
pub mod registry;
pub mod replay;
pub mod route;
pub mod tables;
pub mod walker;
