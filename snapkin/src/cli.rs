// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use snapkin_btrfs::settings::DEFAULT_MOUNT_TABLE;

/// Manipulate files and directories inside BTRFS snapshots
#[derive(Debug, Parser)]
#[command(name = "snapkin", version)]
#[command(about = "Find and remove files or directories across BTRFS snapshots", long_about = None)]
pub struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Mount table used to find the top level subvolume
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_MOUNT_TABLE)]
    pub mount_table: PathBuf,

    /// btrfs binary to run instead of the one found on PATH
    #[arg(long, global = true, value_name = "PATH")]
    pub btrfs: Option<PathBuf>,

    /// Without a command, summarize the current directory
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search BTRFS snapshots for a file or directory
    List(ListArgs),
    /// Remove a file or directory from BTRFS snapshots
    Remove(RemoveArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Show only summary info
    #[arg(short, long)]
    pub summary: bool,

    /// Show snapshot flags
    #[arg(short, long)]
    pub flags: bool,

    /// Show target disk usage in each snapshot
    #[arg(short, long)]
    pub disk: bool,

    /// Only check that the path resolves and its snapshots can be read; print nothing
    #[arg(short = 'S', long)]
    pub silent: bool,

    /// Print the collected targets as JSON
    #[arg(long, conflicts_with = "silent")]
    pub json: bool,

    /// File or directory to look for
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Preview removals without making changes
    #[arg(short, long, conflicts_with = "interactive")]
    pub preview: bool,

    /// Prompt before every removal
    #[arg(short, long)]
    pub interactive: bool,

    /// Show target disk usage in each snapshot
    #[arg(short, long)]
    pub disk: bool,

    /// Also remove the target in the active filesystem
    #[arg(short, long)]
    pub active: bool,

    /// File or directory to remove
    pub path: PathBuf,
}
