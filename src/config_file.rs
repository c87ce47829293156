//! Configuration file handling for hardenkit.
//!
//! Every table the tools consult (mount options, script registry, pinned
//! checksums) lives in `HardeningConfig`. It is loaded once in `main` and
//! passed by reference to the disk configurator and the script fetcher.
//! A missing file means the built-in defaults, which reproduce the stock
//! hardening profile.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::mount_options::{MountOptionsTable, SWAP_KEY};

/// Pinned revision of the upstream hardening scripts.
pub const DEFAULT_SCRIPT_BASE_URL: &str = "https://raw.githubusercontent.com/parthraj-g0hil/Server-hardening/52673959eccc6204c02c5c16a63a97459501dae1/Hardening-scripts";

/// Scripts offered by the fetch menu, in menu order.
pub const DEFAULT_SCRIPTS: &[&str] = &[
    "apparmor.sh",
    "disable-usb.sh",
    "filesystem.py",
    "firewall.sh",
    "grub.sh",
    "package-lock.sh",
    "packages-lib.sh",
    "password-policy.sh",
    "ulimit.sh",
    "unwanted-users.sh",
    "version-hardening.sh",
];

/// Mount options applied per mount point.
pub const DEFAULT_MOUNT_OPTIONS: &[(&str, &str)] = &[
    ("/var/tmp", "nodev,nosuid,noexec"),
    ("/usr", "nodev"),
    ("/home", "nodev,nosuid"),
    ("/var", "nodev,nosuid"),
    ("/var/log", "nodev,nosuid"),
    ("/tmp", "defaults,nosuid,nodev,noexec"),
    ("/app", "nodev,nosuid,noexec"),
    (SWAP_KEY, "sw,nofail"),
    ("/dev/shm", "defaults,nodev,nosuid,noexec"),
];

/// Hardening configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HardeningConfig {
    // Disk configurator
    pub mount_options: BTreeMap<String, String>,
    pub default_mount_options: String,
    pub swappiness: u8,
    pub fstab_path: PathBuf,
    pub staging_prefix: String, // Joined with the trimmed mount point, e.g. "/xyz-" + "var/log"

    // Script fetcher
    pub script_base_url: String,
    pub scripts: Vec<String>,
    pub checksums: BTreeMap<String, String>, // script name -> lowercase hex SHA-256
    pub http_timeout_secs: Option<u64>,
}

impl Default for HardeningConfig {
    fn default() -> Self {
        Self {
            mount_options: DEFAULT_MOUNT_OPTIONS
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            default_mount_options: "defaults".to_string(),
            swappiness: 30,
            fstab_path: PathBuf::from("/etc/fstab"),
            staging_prefix: "/xyz-".to_string(),
            script_base_url: DEFAULT_SCRIPT_BASE_URL.to_string(),
            scripts: DEFAULT_SCRIPTS.iter().map(|s| (*s).to_string()).collect(),
            checksums: BTreeMap::new(),
            http_timeout_secs: None,
        }
    }
}

impl HardeningConfig {
    /// Load the config from `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let config = Self::load_from_file(path)?;
                config.validate()?;
                tracing::info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => {
                tracing::debug!("No configuration file given, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json_pretty()?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Render as pretty JSON (used by `dump-config`)
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize configuration to JSON")
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.default_mount_options.trim().is_empty() {
            anyhow::bail!("default_mount_options must not be empty");
        }
        for (mount_point, options) in &self.mount_options {
            if options.trim().is_empty() {
                anyhow::bail!("Mount options for {} must not be empty", mount_point);
            }
        }

        if self.staging_prefix.trim().is_empty() {
            anyhow::bail!("staging_prefix must not be empty");
        }
        if !self.staging_prefix.starts_with('/') {
            anyhow::bail!(
                "staging_prefix must be an absolute path prefix, got '{}'",
                self.staging_prefix
            );
        }

        let url = self.script_base_url.trim();
        if url.is_empty() {
            anyhow::bail!("script_base_url must be specified");
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            anyhow::bail!("script_base_url must be an http(s) URL, got '{}'", url);
        }

        if self.scripts.is_empty() {
            anyhow::bail!("Script registry must contain at least one script");
        }
        let mut seen = HashSet::new();
        for name in &self.scripts {
            validate_script_name(name)?;
            if !seen.insert(name.as_str()) {
                anyhow::bail!("Duplicate script in registry: {}", name);
            }
        }

        for (name, digest) in &self.checksums {
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                anyhow::bail!(
                    "Checksum for {} must be 64 hex characters (SHA-256), got '{}'",
                    name,
                    digest
                );
            }
            if !seen.contains(name.as_str()) {
                tracing::warn!("Checksum pinned for {} which is not in the script registry", name);
            }
        }

        Ok(())
    }

    /// Build the lookup table used by the disk configurator.
    pub fn mount_options_table(&self) -> MountOptionsTable {
        MountOptionsTable::new(
            self.mount_options.clone(),
            self.default_mount_options.clone(),
        )
    }
}

/// Script names become file names in the destination directory.
fn validate_script_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Script names must not be empty");
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        anyhow::bail!("Script name must be a plain file name, got '{}'", name);
    }
    Ok(())
}
