//! hardenkit - Main entry point

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use hardenkit::cli::{Cli, Commands};
use hardenkit::{
    Console, HardeningConfig, ReqwestClient, ScriptFetcher, SystemExecutor, run_disk_session,
    run_fetch_session, sanity,
};

/// Initialize the logger with appropriate settings
fn init_logger() {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .init();
}

fn main() {
    init_logger();
    info!("hardenkit starting up");

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed: {:?}", cli);

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate { file } => validate_config(&file),
        Commands::DumpConfig { output } => {
            let config = HardeningConfig::default();
            match output {
                Some(path) => {
                    config.save_to_file(&path)?;
                    println!("✓ Default configuration written to {:?}", path);
                }
                None => println!("{}", config.to_json_pretty()?),
            }
            Ok(())
        }
        Commands::Disks { skip_root_check } => {
            let config = HardeningConfig::load_or_default(cli.config.as_deref())?;
            sanity::run_preflight_checks(skip_root_check);
            if cli.dry_run {
                info!("Dry-run mode: destructive commands will be skipped");
            }

            let mut executor = SystemExecutor::new(cli.dry_run);
            let mut console = Console::stdio();
            let outcomes = run_disk_session(&config, &mut executor, &mut console)
                .context("Disk configuration aborted")?;
            info!("Configured {} device(s)", outcomes.len());
            Ok(())
        }
        Commands::Fetch { dir } => {
            let config = HardeningConfig::load_or_default(cli.config.as_deref())?;
            let client = ReqwestClient::new(config.http_timeout_secs.map(Duration::from_secs))?;
            let fetcher = ScriptFetcher::new(&config, &client, dir).with_dry_run(cli.dry_run);

            let mut console = Console::stdio();
            let report = run_fetch_session(&fetcher, &mut console)?;
            if !report.is_clean() {
                info!(
                    "{} script(s) failed, {} selection(s) invalid",
                    report.failed.len(),
                    report.invalid.len()
                );
            }
            Ok(())
        }
    }
}

fn validate_config(path: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", path);
    let config = HardeningConfig::load_from_file(path)?;
    config.validate()?;
    info!("Configuration validation successful");
    println!(
        "✓ Configuration file is valid: {:?} ({} scripts, {} mount option rows)",
        path,
        config.scripts.len(),
        config.mount_options.len()
    );
    Ok(())
}
