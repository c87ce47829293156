//! Pre-flight sanity checks for the disk configurator
//!
//! This module verifies the system environment before any prompt is shown:
//! - Required runtime tools are present on `PATH`
//! - Running with root privileges (EUID 0)
//!
//! If any check fails, the program exits with a clear error message
//! before touching a disk.

use std::collections::BTreeSet;
use std::env;

use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

/// Tools the disk configurator shells out to.
///
/// `mkfs.<type>` is not listed: the formatter depends on the operator's answer
/// and a missing one fails at the format step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum RequiredTool {
    Df,
    Lsblk,
    Blkid,
    Mkswap,
    Swapon,
    Sysctl,
    Mount,
    Umount,
    Rsync,
}

impl RequiredTool {
    /// Debian/Ubuntu package providing the tool
    pub fn package(&self) -> &'static str {
        match self {
            Self::Df => "coreutils",
            Self::Lsblk | Self::Blkid | Self::Mkswap => "util-linux",
            Self::Swapon | Self::Mount | Self::Umount => "mount",
            Self::Sysctl => "procps",
            Self::Rsync => "rsync",
        }
    }
}

/// Result of environment verification
#[derive(Debug)]
pub struct SanityCheckResult {
    pub missing_tools: Vec<RequiredTool>,
    pub is_root: bool,
}

impl SanityCheckResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_tools.is_empty() && self.is_root
    }
}

/// Check if a binary is available in PATH
pub fn binary_exists(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Check if running as root (EUID 0)
fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Perform all sanity checks and return the result
pub fn verify_environment() -> SanityCheckResult {
    let missing_tools = RequiredTool::iter()
        .filter(|tool| !binary_exists(tool.as_ref()))
        .collect();

    SanityCheckResult {
        missing_tools,
        is_root: is_running_as_root(),
    }
}

/// Render the failure report printed to stderr
pub fn failure_report(result: &SanityCheckResult) -> String {
    let mut report = String::new();
    report.push('\n');
    report.push_str("╔══════════════════════════════════════════════════════════════════╗\n");
    report.push_str("║               hardenkit - Pre-flight Check Failed                ║\n");
    report.push_str("╚══════════════════════════════════════════════════════════════════╝\n\n");

    if !result.is_root {
        report.push_str("✗ ERROR: Root privileges required\n");
        report.push_str("   Formatting disks and editing /etc/fstab requires root.\n\n");
        report.push_str("   Solution: Run with sudo or as root user:\n");
        report.push_str("     sudo hardenkit disks\n\n");
    }

    if !result.missing_tools.is_empty() {
        report.push_str("✗ ERROR: Missing required tools\n\n");
        for tool in &result.missing_tools {
            let line = format!("   • {} (install: apt install {})\n", tool, tool.package());
            report.push_str(&line);
        }
        let packages: BTreeSet<&str> = result.missing_tools.iter().map(|t| t.package()).collect();
        let packages: Vec<&str> = packages.into_iter().collect();
        report.push_str("\n   Solution: Install missing packages:\n");
        report.push_str(&format!("     apt install {}\n\n", packages.join(" ")));
    }

    report.push_str("Fix the above issues and try again.\n");
    report
}

/// Skip root check (for development/testing)
/// Set HARDENKIT_SKIP_ROOT_CHECK=1 to skip
pub fn should_skip_root_check() -> bool {
    env::var("HARDENKIT_SKIP_ROOT_CHECK")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

/// Run pre-flight checks, exiting the process on failure
pub fn run_preflight_checks(skip_root: bool) {
    tracing::debug!("Running pre-flight sanity checks (skip_root={})...", skip_root);

    let mut result = verify_environment();

    if skip_root || should_skip_root_check() {
        tracing::warn!("Root check skipped");
        result.is_root = true;
    }

    if !result.is_ok() {
        eprint!("{}", failure_report(&result));
        std::process::exit(1);
    }

    tracing::info!("Pre-flight checks passed");
}
