use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hardenkit - Linux server hardening helpers
#[derive(Parser, Debug)]
#[command(name = "hardenkit")]
#[command(about = "Interactive partition/swap hardening and hardening-script retrieval")]
#[command(version)]
pub struct Cli {
    /// Dry-run mode: show what would be executed without making changes.
    ///
    /// Destructive commands (mkfs, mount, rsync, swapon, sysctl), directory
    /// creation, fstab appends and script writes are skipped and logged.
    /// Read-only commands (df, lsblk, blkid) still execute.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// JSON configuration file (mount options, script registry, checksums)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactively format partitions/swap and add them to /etc/fstab
    Disks {
        /// Skip the root privilege pre-flight check
        #[arg(long)]
        skip_root_check: bool,
    },
    /// Download hardening scripts selected from a menu
    Fetch {
        /// Directory to write downloaded scripts into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        file: PathBuf,
    },
    /// Print the built-in default configuration as JSON
    DumpConfig {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
