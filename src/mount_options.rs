//! Mount option lookup for fstab entries.
//!
//! The table maps a mount point (`/tmp`, `/var/log`, ...) or the swap
//! sentinel to the option string written into the fourth fstab column.
//! Unknown mount points fall back to the table's default option string.

use std::collections::BTreeMap;

/// Sentinel used both as a mount point and as a filesystem type to select swap.
pub const SWAP_KEY: &str = "swap";

/// Immutable mount-point → options table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOptionsTable {
    entries: BTreeMap<String, String>,
    default_options: String,
}

impl MountOptionsTable {
    pub fn new(entries: BTreeMap<String, String>, default_options: String) -> Self {
        Self {
            entries,
            default_options,
        }
    }

    /// Options for a data partition mounted at `mount_point`.
    ///
    /// `tmp`, `/tmp` and `/tmp/` all resolve to the `/tmp` row.
    pub fn options_for(&self, mount_point: &str) -> &str {
        let key = normalize_mount_point(mount_point);
        self.entries
            .get(&key)
            .map(String::as_str)
            .unwrap_or(&self.default_options)
    }

    /// Options for a swap entry.
    pub fn swap_options(&self) -> &str {
        self.entries
            .get(SWAP_KEY)
            .map(String::as_str)
            .unwrap_or(&self.default_options)
    }
}

/// Surrounding whitespace and slashes trimmed, e.g. ` /var/log/ ` -> `var/log`.
pub fn trim_mount_point(mount_point: &str) -> &str {
    mount_point.trim().trim_matches('/')
}

/// Absolute form of a mount point, e.g. `var/log` -> `/var/log`.
pub fn normalize_mount_point(mount_point: &str) -> String {
    format!("/{}", trim_mount_point(mount_point))
}
