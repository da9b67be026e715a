//! Registered type sets, one serialized task per repository name.

mod process;
mod protocol;
mod table;

pub use process::RegistryHandle;
pub use table::Registries;
