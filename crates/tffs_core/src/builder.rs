//! Synthetic TFFS images for tests and fixtures.
//!
//! Records are laid out exactly as the scanner expects them; the rest of the
//! image is filled with 0xFF like erased flash.

use crate::consts::{MAX_RECORD_LEN, SENTINEL_ID};
use crate::utils::padding_for;

#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    size: usize,
    buf: Vec<u8>,
}

impl SnapshotBuilder {
    /// `size` is the final image length; 0 means "just the written bytes".
    pub fn new(size: usize) -> Self {
        Self { size, buf: Vec::new() }
    }

    /// Append a record plus its alignment padding. Panics on payloads over 0xFFFF.
    pub fn record(mut self, id: u16, payload: &[u8]) -> Self {
        assert!(payload.len() <= MAX_RECORD_LEN, "tffs payload too long: {}", payload.len());
        self.buf.extend_from_slice(&id.to_be_bytes());
        self.buf.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        self.buf.extend_from_slice(payload);
        self.buf.resize(self.buf.len() + padding_for(payload.len()), 0);
        self
    }

    /// Raw bytes, for malformed input.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn sentinel(mut self) -> Self {
        self.buf.extend_from_slice(&SENTINEL_ID.to_be_bytes());
        self.buf.extend_from_slice(&[0, 0]);
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        if self.buf.len() < self.size {
            self.buf.resize(self.size, 0xFF);
        }
        self.buf
    }
}
