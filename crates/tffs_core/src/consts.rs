// crates/tffs_core/src/consts.rs

/// Record header: `id` (u16 BE) + `len` (u16 BE).
pub const HEADER_SIZE: usize = 4;

/// Every header starts on a multiple of this, relative to buffer start.
pub const ALIGN: usize = 4;

/// Logical end of data; nothing after it is interpreted.
pub const SENTINEL_ID: u16 = 0xFFFF;

/// Partition size of the reference deployment.
pub const DEFAULT_TFFS_SIZE: usize = 256 * 1024;

/// Upper bound for a single payload (the `len` field is 16 bits wide).
pub const MAX_RECORD_LEN: usize = u16::MAX as usize;

const _: () = { assert!(HEADER_SIZE % ALIGN == 0); };
