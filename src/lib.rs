//! hardenkit Library
//!
//! Core functionality for the two operator tools: the disk configurator
//! (partition/swap setup with fstab persistence) and the hardening script
//! fetcher.

pub mod cli;
pub mod command_executor;
pub mod config_file;
pub mod console;
pub mod disk;
pub mod error;
pub mod fetch;
pub mod fstab;
pub mod mount_options;
pub mod sanity;

// Re-export main types for convenience
pub use command_executor::{CommandExecutor, SystemCommand, SystemExecutor};
pub use config_file::HardeningConfig;
pub use console::Console;
pub use disk::session::run_disk_session;
pub use disk::{ConfigureOutcome, DiskConfigurator, DiskRequest, DiskTarget};
pub use error::{HardenError, Result};
pub use fetch::http::{HttpClient, HttpResponse, ReqwestClient};
pub use fetch::{FetchFailure, FetchReport, ScriptFetcher, ScriptRegistry, run_fetch_session};
pub use fstab::FstabEntry;
pub use mount_options::MountOptionsTable;
