// SPDX-License-Identifier: GPL-3.0-only

mod list;
mod remove;

use std::process::ExitCode;

use anyhow::{Context, Result};
use snapkin_btrfs::{Settings, SubvolumeManager, SystemRunner};

use crate::cli::{Cli, Commands, ListArgs};

pub fn run(cli: Cli) -> Result<ExitCode> {
    let settings = settings(&cli)?;
    tracing::debug!(?settings, "resolved settings");
    let manager = SubvolumeManager::new(SystemRunner, settings);

    match cli.command {
        Some(Commands::List(args)) => list::run(&manager, &args),
        Some(Commands::Remove(args)) => remove::run(&manager, &args),
        None => {
            let cwd = std::env::current_dir().context("cannot read current directory")?;
            let args = ListArgs {
                summary: true,
                flags: false,
                disk: false,
                silent: false,
                json: false,
                path: cwd,
            };
            list::run(&manager, &args)
        }
    }
}

fn settings(cli: &Cli) -> Result<Settings> {
    let btrfs = match &cli.btrfs {
        Some(path) => path.clone(),
        None => which::which("btrfs")
            .context("btrfs not found in PATH (install btrfs-progs or pass --btrfs)")?,
    };

    Ok(Settings {
        btrfs: btrfs.to_string_lossy().into_owned(),
        mount_table: cli.mount_table.clone(),
    })
}
