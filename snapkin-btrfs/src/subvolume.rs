// SPDX-License-Identifier: GPL-3.0-only

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::command::{CommandRunner, Probe, args, probe, run_checked};
use crate::error::{Result, SnapError};
use crate::mounts::find_mount_point;
use crate::settings::Settings;

/// Metadata of one subvolume as reported by `btrfs subvolume show`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubvolumeInfo {
    pub name: String,
    pub creation_time: String,
    pub id: String,
    pub parent_id: String,
    pub top_level_id: String,
    pub flags: String,
    /// Snapshot paths relative to the top level subvolume, in reported order
    pub snapshots: Vec<String>,
}

const NAME: &str = "Name:";
const CREATION_TIME: &str = "Creation time:";
const SUBVOLUME_ID: &str = "Subvolume ID:";
const PARENT_ID: &str = "Parent ID:";
const TOP_LEVEL_ID: &str = "Top level ID:";
const FLAGS: &str = "Flags:";

/// Snapshot entries are nested four tabs deep under `Snapshot(s):`.
const SNAPSHOT_INDENT: &str = "\t\t\t\t";

impl SubvolumeInfo {
    pub fn from_show_output(output: &str) -> Self {
        let lines: Vec<&str> = output.lines().collect();
        Self::parse_lines(&lines)
    }

    /// Parse the scalar fields in their fixed output order, then the snapshot list.
    pub fn parse_lines(lines: &[&str]) -> Self {
        let mut cursor = ShowCursor { lines };

        let name = cursor.take(NAME);
        let creation_time = cursor.take(CREATION_TIME);
        let id = cursor.take(SUBVOLUME_ID);
        let parent_id = cursor.take(PARENT_ID);
        let top_level_id = cursor.take(TOP_LEVEL_ID);
        let flags = cursor.take(FLAGS);

        Self {
            name,
            creation_time,
            id,
            parent_id,
            top_level_id,
            flags,
            snapshots: cursor.into_snapshots(),
        }
    }
}

/// Forward-only view over the lines not yet consumed.
struct ShowCursor<'a> {
    lines: &'a [&'a str],
}

impl<'a> ShowCursor<'a> {
    /// First remaining line carrying `label` wins; absence leaves the cursor in place.
    fn take(&mut self, label: &str) -> String {
        for (index, line) in self.lines.iter().enumerate() {
            if let Some(value) = labelled_value(line, label) {
                self.lines = &self.lines[index + 1..];
                return value.to_string();
            }
        }

        String::new()
    }

    fn into_snapshots(self) -> Vec<String> {
        self.lines
            .iter()
            .skip_while(|line| snapshot_entry(line).is_none())
            .map_while(|line| snapshot_entry(line))
            .map(ToString::to_string)
            .collect()
    }
}

fn labelled_value<'l>(line: &'l str, label: &str) -> Option<&'l str> {
    let value = line.trim_start().strip_prefix(label)?.trim();
    if value.is_empty() { None } else { Some(value) }
}

fn snapshot_entry(line: &str) -> Option<&str> {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    if !indent.contains(SNAPSHOT_INDENT) {
        return None;
    }

    let name = body.trim_end();
    if name.is_empty() { None } else { Some(name) }
}

fn btrfs_args(leading: &[&str], path: &Path, trailing: &[&str]) -> Vec<OsString> {
    let mut out = args(leading);
    out.push(path.as_os_str().to_os_string());
    out.extend(args(trailing));
    out
}

/// Manager for the subvolume queries and property toggles snapkin needs
pub struct SubvolumeManager<R> {
    runner: R,
    settings: Settings,
}

impl<R: CommandRunner> SubvolumeManager<R> {
    pub fn new(runner: R, settings: Settings) -> Self {
        Self { runner, settings }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Ask whether `path` is itself a subvolume root.
    pub fn probe(&self, path: &Path) -> Result<Probe> {
        probe(
            &self.runner,
            &self.settings.btrfs,
            &btrfs_args(&["subvolume", "show"], path, &[]),
        )
    }

    /// Full metadata of a subvolume; failure is fatal.
    pub fn info(&self, subvolume: &Path) -> Result<SubvolumeInfo> {
        let output = run_checked(
            &self.runner,
            &self.settings.btrfs,
            &btrfs_args(&["subvolume", "show"], subvolume, &[]),
        )?;
        Ok(SubvolumeInfo::from_show_output(&output))
    }

    /// Find the nearest directory at or above `path` that is a subvolume root.
    ///
    /// `path` must already be absolute and normalized. Every ancestor is
    /// probed in turn; reaching `/` without a hit is an error.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        if !path.is_absolute() {
            return Err(SnapError::InvalidPath(format!(
                "{} is not absolute",
                path.display()
            )));
        }

        let mut current = path;
        loop {
            match self.probe(current)? {
                Probe::Success(_) => {
                    debug!("{} is owned by subvolume {}", path.display(), current.display());
                    return Ok(current.to_path_buf());
                }
                Probe::Failed(stderr) => match current.parent() {
                    Some(parent) => current = parent,
                    None => {
                        return Err(SnapError::NoSubvolume {
                            path: path.to_path_buf(),
                            stderr,
                        });
                    }
                },
            }
        }
    }

    pub fn is_read_only(&self, subvolume: &Path) -> Result<bool> {
        let output = run_checked(
            &self.runner,
            &self.settings.btrfs,
            &btrfs_args(&["property", "get", "-ts"], subvolume, &["ro"]),
        )?;

        match output.trim() {
            "ro=true" => Ok(true),
            "ro=false" => Ok(false),
            other => Err(SnapError::UnexpectedProperty {
                path: subvolume.to_path_buf(),
                value: other.to_string(),
            }),
        }
    }

    pub fn set_read_only(&self, subvolume: &Path, read_only: bool) -> Result<()> {
        let value = if read_only { "true" } else { "false" };
        run_checked(
            &self.runner,
            &self.settings.btrfs,
            &btrfs_args(&["property", "set", "-ts"], subvolume, &["ro", value]),
        )?;

        info!("set ro={} on {}", value, subvolume.display());
        Ok(())
    }

    /// Mount point of the subvolume with the given top level id.
    pub fn mount_point(&self, top_level_id: &str) -> Result<PathBuf> {
        let table = fs::read_to_string(&self.settings.mount_table)?;
        find_mount_point(&table, top_level_id).ok_or_else(|| SnapError::MountNotFound {
            id: top_level_id.to_string(),
            table: self.settings.mount_table.clone(),
        })
    }
}
