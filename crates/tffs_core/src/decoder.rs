//! TFFS record scanner.
//!
//! Layout (BE, no checksums):
//!   id[2]   = record id (0xFFFF = end of data)
//!   len[2]  = payload length
//!   payload[len]
//!   pad[0..3] so the next header starts on a 4-byte boundary (relative to buffer start)
//!
//! A single forward pass; every way the scan can stop (sentinel, no room for a
//! header, payload past the end, payload over the cap) is a normal end and the
//! records seen before it are kept. Results are built fresh per call and own
//! their bytes, the input buffer is not referenced afterwards.

use crate::consts::{HEADER_SIZE, MAX_RECORD_LEN, SENTINEL_ID};
use crate::errors::{Result, TffsError};
use crate::registry::{KeyRegistry, RegistryEntry};
use crate::utils::{align_up, c_str_lossy, read_u16_be};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Records with a longer payload end the scan before anything is copied.
    pub max_record_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { max_record_len: MAX_RECORD_LEN }
    }
}

/// Why the scan stopped. Offsets are header offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    Sentinel { offset: usize },
    Exhausted { offset: usize },
    Truncated { offset: usize, id: u16, len: usize },
    Oversized { offset: usize, id: u16, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'r> {
    pub entry: &'r RegistryEntry,
    pub value: Vec<u8>,
}

impl<'r> Match<'r> {
    pub fn name(&self) -> &'r str { &self.entry.name }
    pub fn id(&self) -> u32 { self.entry.id }
    pub fn value(&self) -> &[u8] { &self.value }
    pub fn len(&self) -> usize { self.value.len() }
    pub fn is_empty(&self) -> bool { self.value.is_empty() }

    /// Value as the device firmware reads it: a C string.
    pub fn as_str_lossy(&self) -> String { c_str_lossy(&self.value) }
}

#[derive(Debug, Clone)]
pub struct Decoded<'r> {
    matches: Vec<Match<'r>>,
    count_matched: usize,
    records_seen: usize,
    end: ScanEnd,
}

impl<'r> Decoded<'r> {
    /// Matched entries in registry declaration order.
    pub fn matches(&self) -> &[Match<'r>] { &self.matches }
    pub fn into_matches(self) -> Vec<Match<'r>> { self.matches }

    /// Records that hit at least one registry entry (a repeated id counts each time).
    pub fn count_matched(&self) -> usize { self.count_matched }

    /// Complete records consumed, sentinel excluded.
    pub fn records_seen(&self) -> usize { self.records_seen }

    pub fn end(&self) -> ScanEnd { self.end }

    pub fn is_empty(&self) -> bool { self.count_matched == 0 }

    /// First match for `name` (registry order).
    pub fn get(&self, name: &str) -> Option<&Match<'r>> {
        self.matches.iter().find(|m| m.entry.name == name)
    }

    /// No known key at all is the caller-level failure case.
    pub fn into_non_empty(self) -> Result<Self> {
        if self.is_empty() { Err(TffsError::NoValues) } else { Ok(self) }
    }
}

pub fn decode<'r>(buf: &[u8], registry: &'r KeyRegistry) -> Decoded<'r> {
    decode_with(buf, registry, &DecodeOptions::default())
}

pub fn decode_with<'r>(buf: &[u8], registry: &'r KeyRegistry, opts: &DecodeOptions) -> Decoded<'r> {
    // one slot per registry entry; last occurrence of an id wins
    let mut values: Vec<Option<Vec<u8>>> = vec![None; registry.len()];
    let mut count_matched = 0usize;
    let mut records_seen = 0usize;
    let mut pos = 0usize;

    let end = loop {
        if pos + HEADER_SIZE > buf.len() {
            break ScanEnd::Exhausted { offset: pos };
        }
        let (Some(id), Some(len)) = (read_u16_be(buf, pos), read_u16_be(buf, pos + 2)) else {
            break ScanEnd::Exhausted { offset: pos };
        };
        if id == SENTINEL_ID {
            break ScanEnd::Sentinel { offset: pos };
        }

        let start = pos + HEADER_SIZE;
        let len = len as usize;
        if len > opts.max_record_len {
            break ScanEnd::Oversized { offset: pos, id, len };
        }
        if start + len > buf.len() {
            break ScanEnd::Truncated { offset: pos, id, len };
        }
        records_seen += 1;

        let slots = registry.positions(u32::from(id));
        if !slots.is_empty() {
            let payload = &buf[start..start + len];
            for &slot in slots {
                values[slot] = Some(payload.to_vec());
            }
            count_matched += 1;
        }
        trace!(offset = pos, id, len, known = !slots.is_empty(), "tffs record");

        pos = align_up(start + len);
    };

    let matches: Vec<Match<'r>> = registry
        .entries()
        .iter()
        .zip(values)
        .filter_map(|(entry, v)| v.map(|value| Match { entry, value }))
        .collect();

    debug!(?end, records_seen, count_matched, entries = matches.len(), "tffs scan done");
    Decoded { matches, count_matched, records_seen, end }
}
