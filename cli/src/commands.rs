//! Command-line surface and dispatch.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pushbullet::{Device, DeviceId, PushbulletApi, Target};

#[derive(Debug, Parser)]
#[command(name = "pbpush", version, about = "List Pushbullet devices and send pushes")]
pub struct Cli {
    /// YAML config file (defaults to ./pbpush.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List owned and shared devices
    Devices,
    /// Push a note
    Note {
        title: String,
        body: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Push a link
    Link {
        title: String,
        url: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Push an address
    Address {
        name: String,
        address: String,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Push a checklist
    List {
        title: String,
        #[arg(required = true)]
        items: Vec<String>,
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Debug, Clone, Copy, clap::Args)]
pub struct TargetArgs {
    /// Device to push to; all devices when omitted
    #[arg(long = "device", value_parser = clap::value_parser!(DeviceId).range(1..))]
    pub device: Option<DeviceId>,
}

impl TargetArgs {
    #[must_use]
    pub fn target(self) -> Target {
        Target::from(self.device)
    }
}

/// Format one device as a tab-separated line: id, name, owner.
#[must_use]
pub fn device_line(device: &Device) -> String {
    format!(
        "{}\t{}\t{}",
        device.id,
        device.display_name().unwrap_or("-"),
        device.owner_name.as_deref().unwrap_or("-")
    )
}

/// Execute `command` against `api`, writing human-readable output to `out`.
///
/// # Errors
/// Returns an error if the API call or the write fails.
pub async fn run<A, W>(api: &A, command: Command, out: &mut W) -> anyhow::Result<()>
where
    A: PushbulletApi + ?Sized,
    W: Write,
{
    match command {
        Command::Devices => {
            let devices = api.devices().await.context("failed to list devices")?;
            tracing::info!(count = devices.len(), "fetched devices");
            for device in &devices {
                writeln!(out, "{}", device_line(device))?;
            }
        }
        Command::Note {
            title,
            body,
            target,
        } => {
            let target = target.target();
            api.push_note(target, &title, &body)
                .await
                .context("failed to push note")?;
            writeln!(out, "pushed note to {target}")?;
        }
        Command::Link { title, url, target } => {
            let target = target.target();
            api.push_link(target, &title, &url)
                .await
                .context("failed to push link")?;
            writeln!(out, "pushed link to {target}")?;
        }
        Command::Address {
            name,
            address,
            target,
        } => {
            let target = target.target();
            api.push_address(target, &name, &address)
                .await
                .context("failed to push address")?;
            writeln!(out, "pushed address to {target}")?;
        }
        Command::List {
            title,
            items,
            target,
        } => {
            let target = target.target();
            api.push_list(target, &title, &items)
                .await
                .context("failed to push list")?;
            writeln!(out, "pushed list to {target}")?;
        }
    }
    Ok(())
}
