// SPDX-License-Identifier: GPL-3.0-only

//! Projection of a live path into every snapshot of its subvolume

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::command::CommandRunner;
use crate::error::{Result, SnapError};
use crate::subvolume::{SubvolumeInfo, SubvolumeManager};

/// One path to act upon, split at its owning subvolume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub absolute_path: PathBuf,
    pub owning_subvolume: PathBuf,
    /// `absolute_path` below `owning_subvolume`; empty when they are equal
    pub relative_path: PathBuf,
}

impl Target {
    pub fn new(absolute_path: PathBuf, owning_subvolume: PathBuf) -> Result<Self> {
        let relative_path = absolute_path
            .strip_prefix(&owning_subvolume)
            .map_err(|_| {
                SnapError::InvalidPath(format!(
                    "{} is not inside {}",
                    absolute_path.display(),
                    owning_subvolume.display()
                ))
            })?
            .to_path_buf();

        Ok(Self {
            absolute_path,
            owning_subvolume,
            relative_path,
        })
    }

    /// Relative path as shown to the user, rooted at the subvolume.
    pub fn display_relative(&self) -> String {
        format!("/{}", self.relative_path.display())
    }

    /// The same logical path inside `root`.
    pub fn project_into(&self, root: &Path) -> PathBuf {
        if self.relative_path.as_os_str().is_empty() {
            root.to_path_buf()
        } else {
            root.join(&self.relative_path)
        }
    }
}

/// A snapshot known to contain the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotMatch {
    pub snapshot_path: PathBuf,
    pub search_path: PathBuf,
}

/// Everything [`locate`] learned about one target.
#[derive(Debug, Clone)]
pub struct Located {
    pub target: Target,
    pub subvolume: SubvolumeInfo,
    pub mount_point: PathBuf,
    pub matches: Vec<SnapshotMatch>,
}

/// Paths to act upon, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedTargetSet {
    pub relative_path: String,
    pub targets: Vec<PathBuf>,
}

impl ResolvedTargetSet {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl Located {
    /// Collect the search paths, optionally followed by the live path when it exists.
    pub fn into_target_set(self, include_active: bool) -> ResolvedTargetSet {
        let relative_path = self.target.display_relative();
        let mut targets: Vec<PathBuf> = self
            .matches
            .into_iter()
            .map(|found| found.search_path)
            .collect();

        if include_active && exists(&self.target.absolute_path) {
            targets.push(self.target.absolute_path);
        }

        ResolvedTargetSet {
            relative_path,
            targets,
        }
    }
}

/// Make `path` absolute against the current directory and fold `.`/`..` lexically.
///
/// Symlinks are left alone so paths that only exist in snapshots still resolve.
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }

    Ok(normalized)
}

fn exists(path: &Path) -> bool {
    path.is_dir() || path.is_file()
}

/// Snapshot root for a name reported under `Snapshot(s):`.
fn snapshot_root(mount_point: &Path, name: &str) -> PathBuf {
    let name = name.strip_prefix("<FS_TREE>/").unwrap_or(name);
    mount_point.join(name.trim_start_matches('/'))
}

/// Find every snapshot of the owning subvolume that holds the same relative path.
///
/// Results keep the order in which the snapshots were reported.
pub fn locate<R: CommandRunner>(manager: &SubvolumeManager<R>, path: &Path) -> Result<Located> {
    let absolute = normalize(path)?;
    let owning = manager.resolve(&absolute)?;
    let subvolume = manager.info(&owning)?;
    let mount_point = manager.mount_point(&subvolume.top_level_id)?;
    let target = Target::new(absolute, owning)?;

    let matches = subvolume
        .snapshots
        .iter()
        .filter_map(|name| {
            let snapshot_path = snapshot_root(&mount_point, name);
            let search_path = target.project_into(&snapshot_path);
            if exists(&search_path) {
                Some(SnapshotMatch {
                    snapshot_path,
                    search_path,
                })
            } else {
                debug!("{} not present", search_path.display());
                None
            }
        })
        .collect();

    Ok(Located {
        target,
        subvolume,
        mount_point,
        matches,
    })
}
