//! command_executor.rs - Typed system commands and the capability that runs them.
//!
//! Every external program the disk configurator touches is described by a
//! `SystemCommand` variant. Execution goes through the `CommandExecutor`
//! trait so the configuration workflow can be driven against a recording
//! fake in tests, while `SystemExecutor` runs the real utilities
//! synchronously, one at a time.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{HardenError, Result};

/// Represents a shell command to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemCommand {
    /// Corresponds to `df -h`
    DiskUsage,
    /// Corresponds to `lsblk`
    ListBlockDevices,
    /// Corresponds to `blkid -s UUID -o value <device>`
    BlkidUuid(PathBuf),
    /// Corresponds to `mkswap <device>`
    MakeSwap(PathBuf),
    /// Corresponds to `swapon <device>`
    SwapOn(PathBuf),
    /// Corresponds to `sysctl vm.swappiness=<value>`
    SetSwappiness(u8),
    /// Corresponds to `mkfs.<fs_type> <device>`
    MakeFilesystem { fs_type: String, device: PathBuf },
    /// Corresponds to `mount <device> <target>`
    Mount { device: PathBuf, target: PathBuf },
    /// Corresponds to `umount <target>`
    Unmount(PathBuf),
    /// Corresponds to `rsync -avrz <source>/ <dest>/`
    ///
    /// The trailing slashes copy the directory contents (dot-files included),
    /// so an empty source directory is a successful no-op.
    Rsync { source: PathBuf, dest: PathBuf },
}

impl SystemCommand {
    /// Program name looked up on `PATH`.
    pub fn program(&self) -> String {
        match self {
            Self::DiskUsage => "df".to_string(),
            Self::ListBlockDevices => "lsblk".to_string(),
            Self::BlkidUuid(_) => "blkid".to_string(),
            Self::MakeSwap(_) => "mkswap".to_string(),
            Self::SwapOn(_) => "swapon".to_string(),
            Self::SetSwappiness(_) => "sysctl".to_string(),
            Self::MakeFilesystem { fs_type, .. } => format!("mkfs.{}", fs_type),
            Self::Mount { .. } => "mount".to_string(),
            Self::Unmount(_) => "umount".to_string(),
            Self::Rsync { .. } => "rsync".to_string(),
        }
    }

    /// Arguments exactly as passed to the program.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::DiskUsage => vec!["-h".to_string()],
            Self::ListBlockDevices => vec![],
            Self::BlkidUuid(device) => vec![
                "-s".to_string(),
                "UUID".to_string(),
                "-o".to_string(),
                "value".to_string(),
                device.display().to_string(),
            ],
            Self::MakeSwap(device) | Self::SwapOn(device) => vec![device.display().to_string()],
            Self::SetSwappiness(value) => vec![format!("vm.swappiness={}", value)],
            Self::MakeFilesystem { device, .. } => vec![device.display().to_string()],
            Self::Mount { device, target } => {
                vec![device.display().to_string(), target.display().to_string()]
            }
            Self::Unmount(target) => vec![target.display().to_string()],
            Self::Rsync { source, dest } => vec![
                "-avrz".to_string(),
                with_trailing_slash(source),
                with_trailing_slash(dest),
            ],
        }
    }

    /// Whether the command mutates the system.
    ///
    /// Dry-run mode skips destructive commands; read-only ones still run so
    /// the preview shows real disk state.
    pub fn is_destructive(&self) -> bool {
        !matches!(
            self,
            Self::DiskUsage | Self::ListBlockDevices | Self::BlkidUuid(_)
        )
    }
}

impl fmt::Display for SystemCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())?;
        for arg in self.args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

fn with_trailing_slash(path: &Path) -> String {
    let rendered = path.display().to_string();
    if rendered.ends_with('/') {
        rendered
    } else {
        format!("{}/", rendered)
    }
}

/// Capability interface for every side effect of the disk configurator.
pub trait CommandExecutor {
    /// Run a command to completion; a non-zero exit is an error.
    fn run(&mut self, command: &SystemCommand) -> Result<()>;

    /// Run a command and return its stdout; a non-zero exit is an error.
    fn capture(&mut self, command: &SystemCommand) -> Result<String>;

    /// Create a directory and its parents (no error if it exists).
    fn ensure_dir(&mut self, path: &Path) -> Result<()>;

    /// Append `line` verbatim to the file at `path`, creating it if needed.
    fn append_line(&mut self, path: &Path, line: &str) -> Result<()>;
}

/// Runs the real OS utilities.
#[derive(Debug, Clone, Default)]
pub struct SystemExecutor {
    dry_run: bool,
}

impl SystemExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    fn build(command: &SystemCommand) -> Command {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args()).stdin(Stdio::null());
        cmd
    }
}

impl CommandExecutor for SystemExecutor {
    fn run(&mut self, command: &SystemCommand) -> Result<()> {
        let rendered = command.to_string();
        println!(">>> {}", rendered);

        if self.dry_run && command.is_destructive() {
            info!("[DRY RUN] Skipped: {}", rendered);
            return Ok(());
        }

        debug!("Executing: {}", rendered);
        // stdout/stderr inherited so the operator sees df/lsblk/rsync output
        let status = Self::build(command)
            .status()
            .map_err(|source| HardenError::CommandSpawn {
                command: rendered.clone(),
                source,
            })?;

        if status.success() {
            debug!("Command succeeded: {}", rendered);
            Ok(())
        } else {
            Err(HardenError::CommandFailed {
                command: rendered,
                code: status.code(),
            })
        }
    }

    fn capture(&mut self, command: &SystemCommand) -> Result<String> {
        let rendered = command.to_string();

        if self.dry_run && command.is_destructive() {
            info!("[DRY RUN] Skipped: {}", rendered);
            return Ok(String::new());
        }

        debug!("Capturing: {}", rendered);
        let output = Self::build(command)
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| HardenError::CommandSpawn {
                command: rendered.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            debug!(
                "Command {} failed: {}",
                rendered,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            Err(HardenError::CommandFailed {
                command: rendered,
                code: output.status.code(),
            })
        }
    }

    fn ensure_dir(&mut self, path: &Path) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Skipped: create directory {}", path.display());
            return Ok(());
        }
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn append_line(&mut self, path: &Path, line: &str) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] Skipped: append to {}: {}", path.display(), line.trim_end());
            return Ok(());
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_lines() {
        let dev = PathBuf::from("/dev/xvdd");
        assert_eq!(SystemCommand::DiskUsage.to_string(), "df -h");
        assert_eq!(SystemCommand::ListBlockDevices.to_string(), "lsblk");
        assert_eq!(
            SystemCommand::BlkidUuid(dev.clone()).to_string(),
            "blkid -s UUID -o value /dev/xvdd"
        );
        assert_eq!(SystemCommand::MakeSwap(dev.clone()).to_string(), "mkswap /dev/xvdd");
        assert_eq!(SystemCommand::SetSwappiness(30).to_string(), "sysctl vm.swappiness=30");
        assert_eq!(
            SystemCommand::MakeFilesystem {
                fs_type: "xfs".to_string(),
                device: dev.clone(),
            }
            .to_string(),
            "mkfs.xfs /dev/xvdd"
        );
        assert_eq!(
            SystemCommand::Mount {
                device: dev,
                target: PathBuf::from("/xyz-tmp"),
            }
            .to_string(),
            "mount /dev/xvdd /xyz-tmp"
        );
    }

    #[test]
    fn test_rsync_copies_directory_contents() {
        let cmd = SystemCommand::Rsync {
            source: PathBuf::from("/var/log"),
            dest: PathBuf::from("/xyz-var/log/"),
        };
        assert_eq!(cmd.args(), vec!["-avrz", "/var/log/", "/xyz-var/log/"]);
    }

    #[test]
    fn test_destructive_classification() {
        assert!(!SystemCommand::DiskUsage.is_destructive());
        assert!(!SystemCommand::BlkidUuid(PathBuf::from("/dev/sdb")).is_destructive());
        assert!(SystemCommand::MakeSwap(PathBuf::from("/dev/sdb")).is_destructive());
        assert!(SystemCommand::Unmount(PathBuf::from("/xyz-tmp")).is_destructive());
        assert!(SystemCommand::SetSwappiness(30).is_destructive());
    }

    #[test]
    fn test_dry_run_skips_destructive_commands() {
        let mut exec = SystemExecutor::new(true);
        // Would fail loudly if actually executed against a missing program
        let cmd = SystemCommand::MakeFilesystem {
            fs_type: "definitely-not-a-real-fs".to_string(),
            device: PathBuf::from("/dev/null"),
        };
        assert!(exec.run(&cmd).is_ok());
        assert_eq!(exec.capture(&cmd).expect("dry run capture"), "");
    }

    #[test]
    fn test_dry_run_skips_file_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fstab = dir.path().join("fstab");
        let staging = dir.path().join("xyz-tmp");

        let mut exec = SystemExecutor::new(true);
        exec.ensure_dir(&staging).expect("dry run mkdir");
        exec.append_line(&fstab, "UUID=x none swap sw 0 2\n")
            .expect("dry run append");

        assert!(!staging.exists());
        assert!(!fstab.exists());
    }

    #[test]
    fn test_append_line_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fstab = dir.path().join("fstab");
        fs::write(&fstab, "# existing\n").expect("seed");

        let mut exec = SystemExecutor::new(false);
        exec.append_line(&fstab, "UUID=a /tmp xfs defaults 1 2\n")
            .expect("append");
        exec.append_line(&fstab, "UUID=a /tmp xfs defaults 1 2\n")
            .expect("append again");

        let content = fs::read_to_string(&fstab).expect("read");
        assert_eq!(
            content,
            "# existing\nUUID=a /tmp xfs defaults 1 2\nUUID=a /tmp xfs defaults 1 2\n"
        );
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mut exec = SystemExecutor::new(false);
        let cmd = SystemCommand::MakeFilesystem {
            fs_type: "definitely-not-a-real-fs".to_string(),
            device: PathBuf::from("/dev/null"),
        };
        let err = exec.capture(&cmd).expect_err("program does not exist");
        assert!(matches!(err, HardenError::CommandSpawn { .. }));
    }
}
