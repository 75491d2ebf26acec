// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

pub const DEFAULT_BTRFS: &str = "btrfs";
pub const DEFAULT_MOUNT_TABLE: &str = "/proc/mounts";

/// Where snapkin finds its external collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Program used for subvolume queries and property toggles
    pub btrfs: String,
    /// Live mount table in `/proc/mounts` format
    pub mount_table: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            btrfs: DEFAULT_BTRFS.to_string(),
            mount_table: PathBuf::from(DEFAULT_MOUNT_TABLE),
        }
    }
}
