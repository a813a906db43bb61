use byteorder::{BigEndian as BE, ByteOrder};

use crate::consts::ALIGN;

/// Big-endian u16 at `pos`, or None if the two bytes are not in `buf`.
#[inline]
pub fn read_u16_be(buf: &[u8], pos: usize) -> Option<u16> {
    let end = pos.checked_add(2)?;
    buf.get(pos..end).map(BE::read_u16)
}

/// Zero bytes that follow a payload of `len` bytes.
#[inline]
pub fn padding_for(len: usize) -> usize { (ALIGN - len % ALIGN) % ALIGN }

#[inline]
pub fn align_up(pos: usize) -> usize { pos + padding_for(pos) }

/// Bytes up to the first NUL, as lossy UTF-8 (values are C strings on the device).
pub fn c_str_lossy(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
