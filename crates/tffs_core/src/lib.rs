pub mod consts;
pub mod errors;
pub mod utils;
pub mod registry;
pub mod decoder;
pub mod snapshot;
#[cfg(any(test, feature = "builder"))]
pub mod builder;

pub use decoder::{decode, decode_with, DecodeOptions, Decoded, Match, ScanEnd};
pub use errors::{Result, TffsError};
pub use registry::{KeyRegistry, RegistryEntry};
pub use snapshot::{parse_size, read_snapshot};
