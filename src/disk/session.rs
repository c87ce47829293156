//! Interactive disk configuration loop.
//!
//! show disks → device / mount point / filesystem prompts → configure →
//! show disks → "another?" until the operator answers anything but `y`.

use std::io::{BufRead, Write};

use tracing::info;

use super::{ConfigureOutcome, DiskConfigurator, DiskRequest, DiskTarget};
use crate::command_executor::CommandExecutor;
use crate::console::Console;
use crate::config_file::HardeningConfig;
use crate::error::Result;

const DEVICE_PROMPT: &str = "Enter the disk partition (e.g., xvdd,xvdf): ";
const MOUNT_POINT_PROMPT: &str = "Enter the mount point (/tmp, /var, /var/log, /home, swap): ";
const FS_TYPE_PROMPT: &str = "Enter filesystem type (xfs/ext4/swap): ";
const AGAIN_PROMPT: &str = "Do you want to configure another partition? (y/n): ";

/// Collect one request from the operator.
pub fn prompt_request<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<DiskRequest> {
    let device = console.ask(DEVICE_PROMPT)?;
    let mount_point = console.ask(MOUNT_POINT_PROMPT)?;
    let fs_type = console.ask(FS_TYPE_PROMPT)?.to_lowercase();
    Ok(DiskRequest::new(device, mount_point, fs_type))
}

/// Human-readable completion message for an outcome.
pub fn completion_message(outcome: &ConfigureOutcome) -> String {
    let mut message = match &outcome.target {
        DiskTarget::Swap => "Swap setup complete.".to_string(),
        DiskTarget::Partition { mount_point, .. } => {
            format!("{} successfully configured.", mount_point)
        }
    };
    if !outcome.is_persistent() {
        message.push_str(" (no UUID found, fstab not updated)");
    }
    message
}

/// Run the configuration loop until the operator declines to continue.
///
/// Returns every completed outcome. The first command failure ends the
/// session with that error.
pub fn run_disk_session<E, R, W>(
    config: &HardeningConfig,
    executor: &mut E,
    console: &mut Console<R, W>,
) -> Result<Vec<ConfigureOutcome>>
where
    E: CommandExecutor,
    R: BufRead,
    W: Write,
{
    let mut configurator = DiskConfigurator::new(config, executor);
    let mut outcomes = Vec::new();

    loop {
        configurator.show_disks()?;

        let request = prompt_request(console)?;
        info!(
            "Request: device={} mount_point={} fs_type={}",
            request.device, request.mount_point, request.fs_type
        );

        let outcome = configurator.configure(&request)?;
        console.say(&completion_message(&outcome))?;
        outcomes.push(outcome);

        configurator.show_disks()?;
        if !console.confirm(AGAIN_PROMPT)? {
            break;
        }
    }

    info!("Disk session finished after {} configuration(s)", outcomes.len());
    Ok(outcomes)
}
