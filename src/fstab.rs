//! fstab entry construction.
//!
//! Entries are only ever appended. Nothing here rewrites or deduplicates
//! existing lines; `contains_uuid` exists so callers can warn about a repeat.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Result;

/// One line of the persistent mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FstabEntry {
    /// Filesystem UUID as reported by `blkid`.
    pub uuid: String,
    /// Absolute mount point, or `None` for swap (rendered as `none`).
    pub mount_point: Option<String>,
    /// Filesystem type column (`xfs`, `ext4`, `swap`, ...).
    pub fs_type: String,
    /// Comma-separated mount options.
    pub options: String,
    pub dump: u8,
    pub pass: u8,
}

impl FstabEntry {
    /// `UUID=<uuid> none swap <options> 0 2`
    pub fn swap(uuid: impl Into<String>, options: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            mount_point: None,
            fs_type: "swap".to_string(),
            options: options.into(),
            dump: 0,
            pass: 2,
        }
    }

    /// `UUID=<uuid> <mount_point> <fs_type> <options> 1 2`
    pub fn partition(
        uuid: impl Into<String>,
        mount_point: impl Into<String>,
        fs_type: impl Into<String>,
        options: impl Into<String>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            mount_point: Some(mount_point.into()),
            fs_type: fs_type.into(),
            options: options.into(),
            dump: 1,
            pass: 2,
        }
    }

    /// Line as appended to fstab, including the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for FstabEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UUID={} {} {} {} {} {}",
            self.uuid,
            self.mount_point.as_deref().unwrap_or("none"),
            self.fs_type,
            self.options,
            self.dump,
            self.pass
        )
    }
}

/// True if any non-comment line of the fstab at `path` references `UUID=<uuid>`.
///
/// A missing file counts as "no entries".
pub fn contains_uuid(path: &Path, uuid: &str) -> Result<bool> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    let needle = format!("UUID={}", uuid);
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .any(|line| line.split_whitespace().next() == Some(needle.as_str())))
}
