//! Capability interface over the OS network-configuration tool.
//!
//! Detection itself only needs "give me the interface listing as text";
//! keeping that behind a trait lets tests feed canned listings and keeps
//! the platform command in one place.

use std::process::{Command, Output};

use lanserve_common::error::DetectError;

pub trait ListingSource {
    fn listing(&self) -> Result<String, DetectError>;
}

/// Production source: runs the platform's network tool through the shell
/// and captures its stdout.
pub struct CommandListing;

#[cfg(windows)]
const LISTING_COMMAND: &str = "ipconfig";
#[cfg(not(windows))]
const LISTING_COMMAND: &str = "ip addr || ifconfig";

impl ListingSource for CommandListing {
    fn listing(&self) -> Result<String, DetectError> {
        let output: Output = shell(LISTING_COMMAND)
            .output()
            .map_err(|source| DetectError::Spawn {
                command: LISTING_COMMAND,
                source,
            })?;

        if !output.status.success() {
            return Err(DetectError::CommandStatus {
                command: LISTING_COMMAND,
                status: output.status,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}
