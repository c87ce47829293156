//! Partition and swap configuration.
//!
//! Given a device short-name, a mount point and a filesystem type, this
//! module formats the device and makes the mount persistent:
//!
//! | Target    | Sequence |
//! |-----------|----------|
//! | Swap      | mkswap → swapon → blkid → (fstab) → sysctl vm.swappiness |
//! | Partition | mkdir staging → mkfs → mount staging → rsync → umount → mount target → blkid → (fstab) |
//!
//! Any command failure aborts the sequence immediately; nothing is rolled
//! back and a staging mount may be left in place. A failed UUID lookup is
//! the only tolerated failure: the fstab append is skipped and the mount
//! stays active for the current boot only.

pub mod session;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::command_executor::{CommandExecutor, SystemCommand};
use crate::config_file::HardeningConfig;
use crate::error::Result;
use crate::fstab::{self, FstabEntry};
use crate::mount_options::{MountOptionsTable, SWAP_KEY, normalize_mount_point, trim_mount_point};

/// Operator answers for one configuration round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskRequest {
    /// Short device name, e.g. `xvdd` (a `/dev/` prefix is tolerated).
    pub device: String,
    /// Mount point as typed, or the swap sentinel.
    pub mount_point: String,
    /// Filesystem type as typed, or the swap sentinel.
    pub fs_type: String,
}

impl DiskRequest {
    pub fn new(
        device: impl Into<String>,
        mount_point: impl Into<String>,
        fs_type: impl Into<String>,
    ) -> Self {
        Self {
            device: device.into(),
            mount_point: mount_point.into(),
            fs_type: fs_type.into(),
        }
    }

    /// Swap if either the mount point or the filesystem type is the sentinel.
    pub fn target(&self) -> DiskTarget {
        let fs_type = self.fs_type.trim().to_lowercase();
        if self.mount_point.trim() == SWAP_KEY || fs_type == SWAP_KEY {
            DiskTarget::Swap
        } else {
            DiskTarget::Partition {
                mount_point: normalize_mount_point(&self.mount_point),
                fs_type,
            }
        }
    }

    /// `/dev/<short-name>`
    pub fn device_path(&self) -> PathBuf {
        device_path(&self.device)
    }
}

/// Which workflow a request dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiskTarget {
    Swap,
    Partition { mount_point: String, fs_type: String },
}

impl fmt::Display for DiskTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Swap => write!(f, "swap"),
            Self::Partition { mount_point, fs_type } => write!(f, "{} ({})", mount_point, fs_type),
        }
    }
}

/// Result of a completed configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureOutcome {
    pub target: DiskTarget,
    pub device: PathBuf,
    pub uuid: Option<String>,
    /// The line appended to fstab, if one was written.
    pub fstab_entry: Option<FstabEntry>,
}

impl ConfigureOutcome {
    pub fn is_persistent(&self) -> bool {
        self.fstab_entry.is_some()
    }
}

/// `xvdd` or `/dev/xvdd` → `/dev/xvdd`
pub fn device_path(device: &str) -> PathBuf {
    let name = device.trim();
    let name = name.strip_prefix("/dev/").unwrap_or(name);
    PathBuf::from(format!("/dev/{}", name))
}

/// Temporary mount location: prefix + mount point without surrounding slashes.
pub fn staging_dir(prefix: &str, mount_point: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", prefix, trim_mount_point(mount_point)))
}

/// Look up a filesystem UUID with blkid.
///
/// Spawn failures, non-zero exits and empty output all yield `None`.
pub fn lookup_uuid<E: CommandExecutor>(executor: &mut E, device: &Path) -> Option<String> {
    match executor.capture(&SystemCommand::BlkidUuid(device.to_path_buf())) {
        Ok(stdout) => {
            let uuid = stdout.trim();
            if uuid.is_empty() {
                debug!("blkid reported no UUID for {}", device.display());
                None
            } else {
                Some(uuid.to_string())
            }
        }
        Err(e) => {
            debug!("UUID lookup for {} failed: {}", device.display(), e);
            None
        }
    }
}

/// Runs the swap and partition workflows against an executor.
pub struct DiskConfigurator<'a, E: CommandExecutor> {
    config: &'a HardeningConfig,
    options: MountOptionsTable,
    executor: &'a mut E,
}

impl<'a, E: CommandExecutor> DiskConfigurator<'a, E> {
    pub fn new(config: &'a HardeningConfig, executor: &'a mut E) -> Self {
        Self {
            config,
            options: config.mount_options_table(),
            executor,
        }
    }

    /// Dispatch a request to the swap or partition workflow.
    pub fn configure(&mut self, request: &DiskRequest) -> Result<ConfigureOutcome> {
        let device = request.device_path();
        match request.target() {
            DiskTarget::Swap => self.configure_swap(&device),
            DiskTarget::Partition { mount_point, fs_type } => {
                self.configure_partition(&device, &mount_point, &fs_type)
            }
        }
    }

    /// Show current disk usage and block devices.
    pub fn show_disks(&mut self) -> Result<()> {
        println!("Current Disk Usage:\n");
        self.executor.run(&SystemCommand::DiskUsage)?;
        println!("\nBlock Devices:\n");
        self.executor.run(&SystemCommand::ListBlockDevices)
    }

    /// Initialise and activate swap on `device`.
    pub fn configure_swap(&mut self, device: &Path) -> Result<ConfigureOutcome> {
        info!("Configuring swap on {}", device.display());

        self.executor.run(&SystemCommand::MakeSwap(device.to_path_buf()))?;
        self.executor.run(&SystemCommand::SwapOn(device.to_path_buf()))?;

        let uuid = lookup_uuid(&mut *self.executor, device);
        let fstab_entry = match &uuid {
            Some(uuid) => {
                let entry = FstabEntry::swap(uuid.clone(), self.options.swap_options());
                self.persist(&entry)?;
                Some(entry)
            }
            None => {
                warn!("No UUID for {}, swap will not persist across reboots", device.display());
                None
            }
        };

        self.executor
            .run(&SystemCommand::SetSwappiness(self.config.swappiness))?;

        Ok(ConfigureOutcome {
            target: DiskTarget::Swap,
            device: device.to_path_buf(),
            uuid,
            fstab_entry,
        })
    }

    /// Format `device`, migrate the existing contents of `mount_point` onto
    /// it and mount it in place.
    pub fn configure_partition(
        &mut self,
        device: &Path,
        mount_point: &str,
        fs_type: &str,
    ) -> Result<ConfigureOutcome> {
        let target = PathBuf::from(normalize_mount_point(mount_point));
        let staging = staging_dir(&self.config.staging_prefix, mount_point);
        info!(
            "Configuring {} as {} on {} (staging {})",
            device.display(),
            fs_type,
            target.display(),
            staging.display()
        );

        self.executor.ensure_dir(&staging)?;

        self.executor.run(&SystemCommand::MakeFilesystem {
            fs_type: fs_type.to_string(),
            device: device.to_path_buf(),
        })?;

        self.executor.run(&SystemCommand::Mount {
            device: device.to_path_buf(),
            target: staging.clone(),
        })?;

        self.executor.run(&SystemCommand::Rsync {
            source: target.clone(),
            dest: staging.clone(),
        })?;

        self.executor.run(&SystemCommand::Unmount(staging))?;

        self.executor.run(&SystemCommand::Mount {
            device: device.to_path_buf(),
            target: target.clone(),
        })?;

        let uuid = lookup_uuid(&mut *self.executor, device);
        let fstab_entry = match &uuid {
            Some(uuid) => {
                let entry = FstabEntry::partition(
                    uuid.clone(),
                    target.display().to_string(),
                    fs_type,
                    self.options.options_for(mount_point),
                );
                self.persist(&entry)?;
                Some(entry)
            }
            None => {
                warn!(
                    "No UUID for {}, {} will not be mounted at boot",
                    device.display(),
                    target.display()
                );
                None
            }
        };

        Ok(ConfigureOutcome {
            target: DiskTarget::Partition {
                mount_point: target.display().to_string(),
                fs_type: fs_type.to_string(),
            },
            device: device.to_path_buf(),
            uuid,
            fstab_entry,
        })
    }

    /// Append-only: an existing line for the same UUID is reported, not replaced.
    fn persist(&mut self, entry: &FstabEntry) -> Result<()> {
        let fstab_path = &self.config.fstab_path;
        match fstab::contains_uuid(fstab_path, &entry.uuid) {
            Ok(true) => warn!(
                "{} already has an entry for UUID={}, appending another",
                fstab_path.display(),
                entry.uuid
            ),
            Ok(false) => {}
            Err(e) => debug!("Could not scan {} for duplicates: {}", fstab_path.display(), e),
        }

        self.executor.append_line(fstab_path, &entry.to_line())?;
        info!("Added to {}: {}", fstab_path.display(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_sentinel_on_either_field() {
        assert_eq!(DiskRequest::new("xvdf", "swap", "ext4").target(), DiskTarget::Swap);
        assert_eq!(DiskRequest::new("xvdf", "/tmp", "swap").target(), DiskTarget::Swap);
        assert_eq!(DiskRequest::new("xvdf", "/tmp", "SWAP").target(), DiskTarget::Swap);
    }

    #[test]
    fn test_partition_target_normalizes() {
        let target = DiskRequest::new("xvdd", "var/log/", "XFS").target();
        assert_eq!(
            target,
            DiskTarget::Partition {
                mount_point: "/var/log".to_string(),
                fs_type: "xfs".to_string(),
            }
        );
        assert_eq!(target.to_string(), "/var/log (xfs)");
    }

    #[test]
    fn test_device_path() {
        assert_eq!(device_path("xvdd"), PathBuf::from("/dev/xvdd"));
        assert_eq!(device_path(" /dev/nvme1n1 "), PathBuf::from("/dev/nvme1n1"));
    }

    #[test]
    fn test_staging_dir() {
        assert_eq!(staging_dir("/xyz-", "/tmp"), PathBuf::from("/xyz-tmp"));
        assert_eq!(staging_dir("/xyz-", "/var/log/"), PathBuf::from("/xyz-var/log"));
    }
}
