//! Reading a TFFS partition image (file or block device) into memory.

use crate::errors::{Result, TffsError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Read exactly `size` bytes from the start of `path`.
///
/// Partitions are fixed size, so a short read means the wrong file or a
/// wrong `size`; that is an error, not a partial snapshot.
pub fn read_snapshot(path: impl AsRef<Path>, size: usize) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let f = File::open(path)?;
    // grows with what the file actually holds; `size` is only an upper bound here
    let mut buf = Vec::new();
    f.take(size as u64).read_to_end(&mut buf)?;
    if buf.len() != size {
        return Err(TffsError::ShortRead { expected: size, actual: buf.len() });
    }
    debug!(path = %path.display(), size, "tffs snapshot read");
    Ok(buf)
}

/// Integer with C `strtoul(s, NULL, 0)` base rules: `0x` hex, leading `0` octal, else decimal.
pub fn parse_size(s: &str) -> std::result::Result<usize, String> {
    let t = s.trim();
    let (digits, radix) = if let Some(h) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        (h, 16)
    } else if t.len() > 1 && t.starts_with('0') {
        (&t[1..], 8)
    } else {
        (t, 10)
    };
    usize::from_str_radix(digits, radix).map_err(|e| format!("invalid size '{s}': {e}"))
}
