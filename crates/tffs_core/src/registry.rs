//! Key registry: numeric record id → key name.
//!
//! The registry is read-only once built. Declaration order matters: it is the
//! order in which matches are reported and key names are listed.
//!
//! Several entries may share one id (the built-in table maps 0x01A3 to both
//! `usb_device_id` and `usb_revision_id`, which looks like a transcription slip
//! in the firmware table but is kept as is). `lookup` returns the canonical
//! (first declared) entry, `lookup_all` returns every one of them.

use crate::errors::{Result, TffsError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const BUILTIN_KEYS: &[(u32, &str)] = &[
    (0x0100, "hw_revision"),
    (0x0101, "productid"),
    (0x0102, "serialnumber"),
    (0x0103, "dmc"),
    (0x0104, "hw_subrevision"),
    (0x0182, "bootloader_version"),
    (0x0184, "macbluetooth"),
    (0x0188, "maca"),
    (0x0189, "macb"),
    (0x018A, "macwlan"),
    (0x018B, "macdsl"),
    (0x018F, "my_ipaddress"),
    (0x0195, "macwlan2"),
    (0x01A3, "usb_device_id"),
    (0x01A3, "usb_revision_id"),
    (0x01A4, "usb_device_name"),
    (0x01A5, "usb_manufacturer_name"),
    (0x01A6, "firmware_version"),
    (0x01A7, "language"),
    (0x01A8, "country"),
    (0x01A9, "annex"),
    (0x01AB, "wlan_key"),
    (0x01AD, "http_key"),
    (0x01B8, "wlan_cal"),
    (0x01FD, "urlader_version"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub id: u32,
    pub name: String,
}

impl RegistryEntry {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

#[derive(Debug, Clone)]
pub struct KeyRegistry {
    entries: Vec<RegistryEntry>,
    by_id: HashMap<u32, Vec<usize>>, // id -> positions in `entries`, ascending
}

impl KeyRegistry {
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        let mut by_id: HashMap<u32, Vec<usize>> = HashMap::new();
        for (pos, e) in entries.iter().enumerate() {
            by_id.entry(e.id).or_default().push(pos);
        }
        Self { entries, by_id }
    }

    /// Process-wide table of keys known from AVM firmware.
    pub fn builtin() -> &'static KeyRegistry {
        static BUILTIN: OnceLock<KeyRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            KeyRegistry::new(
                BUILTIN_KEYS
                    .iter()
                    .map(|&(id, name)| RegistryEntry::new(id, name))
                    .collect(),
            )
        })
    }

    /// Load-time table: JSON array of `{ "id": .., "name": .. }`.
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let entries: Vec<RegistryEntry> = serde_json::from_str(&s)?;
        if entries.is_empty() {
            return Err(TffsError::InvalidRegistry("no entries".into()));
        }
        if let Some(e) = entries.iter().find(|e| e.name.trim().is_empty()) {
            return Err(TffsError::InvalidRegistry(format!("empty name for id {:#06x}", e.id)));
        }
        Ok(Self::new(entries))
    }

    /// Canonical entry for `id`: the first one declared.
    pub fn lookup(&self, id: u32) -> Option<&RegistryEntry> {
        self.positions(id).first().map(|&p| &self.entries[p])
    }

    /// Every entry whose id is `id`, in declaration order.
    pub fn lookup_all(&self, id: u32) -> impl Iterator<Item = &RegistryEntry> + '_ {
        self.positions(id).iter().map(move |&p| &self.entries[p])
    }

    pub fn by_name(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[RegistryEntry] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub(crate) fn positions(&self, id: u32) -> &[usize] {
        self.by_id.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}
