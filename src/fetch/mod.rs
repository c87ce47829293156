//! Hardening script retrieval.
//!
//! Prints the numbered registry, reads a comma-separated selection and
//! downloads each chosen script from the configured base URL into a local
//! directory.
//!
//! # Integrity
//!
//! Content is fetched over plain unauthenticated HTTP(S). Unless a SHA-256
//! is pinned in `HardeningConfig::checksums`, the body is written as
//! received with no verification. Pin checksums for anything that will be
//! executed as root.

pub mod http;
pub mod selection;

use std::fmt;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config_file::HardeningConfig;
use crate::console::Console;
use crate::error::{HardenError, Result};
use self::http::HttpClient;
pub use self::selection::{Pick, Selection, parse_selection};

const MENU_HEADER: &str = "========= Server Hardening Menu =========";
const SELECTION_PROMPT: &str = "Select script numbers (comma separated): ";

/// Ordered, 1-indexed list of downloadable script names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRegistry {
    scripts: Vec<String>,
}

impl ScriptRegistry {
    pub fn new(scripts: Vec<String>) -> Self {
        Self { scripts }
    }

    pub fn from_config(config: &HardeningConfig) -> Self {
        Self::new(config.scripts.clone())
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Script at 1-based `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.scripts.get(i))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.scripts
            .iter()
            .enumerate()
            .map(|(i, name)| (i + 1, name.as_str()))
    }

    /// Menu text as printed before the selection prompt.
    pub fn menu(&self) -> String {
        let mut menu = format!("{}\n\n", MENU_HEADER);
        for (index, name) in self.iter() {
            menu.push_str(&format!("{}. {}\n", index, name));
        }
        menu
    }
}

/// Why one script was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Server answered with something other than 200.
    Status(u16),
    /// Request could not be completed.
    Transport(String),
    /// Body did not match the pinned SHA-256.
    ChecksumMismatch { expected: String, actual: String },
    /// Body could not be written to disk.
    Write(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "Status {}", code),
            Self::Transport(e) => write!(f, "{}", e),
            Self::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: expected {}, got {}", expected, actual)
            }
            Self::Write(e) => write!(f, "write failed: {}", e),
        }
    }
}

/// Outcome of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// Paths written, in selection order.
    pub downloaded: Vec<PathBuf>,
    pub failed: Vec<(String, FetchFailure)>,
    /// Selected numbers outside the registry, as typed back to the operator.
    pub invalid: Vec<String>,
}

impl FetchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.invalid.is_empty()
    }
}

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// Downloads registry entries with an injected HTTP client.
pub struct ScriptFetcher<'a, C: HttpClient> {
    config: &'a HardeningConfig,
    registry: ScriptRegistry,
    client: &'a C,
    dest_dir: PathBuf,
    dry_run: bool,
}

impl<'a, C: HttpClient> ScriptFetcher<'a, C> {
    pub fn new(config: &'a HardeningConfig, client: &'a C, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            registry: ScriptRegistry::from_config(config),
            client,
            dest_dir: dest_dir.into(),
            dry_run: false,
        }
    }

    /// Fetch and verify but do not write files.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn registry(&self) -> &ScriptRegistry {
        &self.registry
    }

    /// `<base>/<name>`
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.config.script_base_url.trim_end_matches('/'), name)
    }

    /// Fetch every valid index of `selection`, recording invalid ones.
    ///
    /// Picks are handled in input order. Out-of-range numbers never reach the
    /// network; per-item failures do not stop the batch.
    pub fn fetch_selection<W: Write>(
        &self,
        selection: &Selection,
        out: &mut W,
    ) -> Result<FetchReport> {
        let mut report = FetchReport::default();

        for pick in &selection.picks {
            let name = match pick {
                Pick::Script(index) => self.registry.get(*index),
                Pick::OutOfRange(_) => None,
            };
            let Some(name) = name else {
                let number = match pick {
                    Pick::Script(index) => index.to_string(),
                    Pick::OutOfRange(number) => number.clone(),
                };
                writeln!(out, "Invalid selection: {}", number)?;
                report.invalid.push(number);
                continue;
            };

            match self.fetch_one(name) {
                Ok(path) => {
                    writeln!(out, "✓ Downloaded: {}", name)?;
                    report.downloaded.push(path);
                }
                Err(failure) => {
                    writeln!(out, "✗ Failed to download: {} ({})", name, failure)?;
                    report.failed.push((name.to_string(), failure));
                }
            }
        }

        info!(
            "Fetch batch done: {} downloaded, {} failed, {} invalid",
            report.downloaded.len(),
            report.failed.len(),
            report.invalid.len()
        );
        Ok(report)
    }

    /// Download a single script; nothing is written unless every check passes.
    pub fn fetch_one(&self, name: &str) -> std::result::Result<PathBuf, FetchFailure> {
        let url = self.url_for(name);
        let response = self
            .client
            .get(&url)
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        if !response.is_ok() {
            warn!("GET {} returned {}", url, response.status);
            return Err(FetchFailure::Status(response.status));
        }

        self.verify(name, &response.body)?;

        let path = self.dest_dir.join(name);
        if self.dry_run {
            info!("[DRY RUN] Skipped: write {} ({} bytes)", path.display(), response.body.len());
            return Ok(path);
        }
        write_script(&path, &response.body).map_err(|e| FetchFailure::Write(e.to_string()))?;
        info!("Wrote {} ({} bytes)", path.display(), response.body.len());
        Ok(path)
    }

    fn verify(&self, name: &str, body: &[u8]) -> std::result::Result<(), FetchFailure> {
        match self.config.checksums.get(name) {
            Some(expected) => {
                let actual = sha256_hex(body);
                if actual.eq_ignore_ascii_case(expected) {
                    info!("SHA-256 verified for {}", name);
                    Ok(())
                } else {
                    warn!("SHA-256 mismatch for {}: expected {}, got {}", name, expected, actual);
                    Err(FetchFailure::ChecksumMismatch {
                        expected: expected.to_lowercase(),
                        actual,
                    })
                }
            }
            None => {
                warn!("No checksum pinned for {}, writing unverified content", name);
                Ok(())
            }
        }
    }
}

fn write_script(path: &Path, body: &[u8]) -> Result<()> {
    fs::write(path, body).map_err(HardenError::from)
}

/// Show the menu, read one selection and fetch it.
///
/// A non-numeric selection prints a message and returns an empty report
/// without touching the network.
pub fn run_fetch_session<C, R, W>(
    fetcher: &ScriptFetcher<'_, C>,
    console: &mut Console<R, W>,
) -> Result<FetchReport>
where
    C: HttpClient,
    R: BufRead,
    W: Write,
{
    console.say(&fetcher.registry().menu())?;
    let input = console.ask(SELECTION_PROMPT)?;

    let selection = match parse_selection(&input, fetcher.registry().len()) {
        Ok(selection) => selection,
        Err(e) => {
            warn!("Rejected selection '{}': {}", input, e);
            console.say("Invalid input. Please enter numbers only.")?;
            return Ok(FetchReport::default());
        }
    };

    fetcher.fetch_selection(&selection, console.output_mut())
}
