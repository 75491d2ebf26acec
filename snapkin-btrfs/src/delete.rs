// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use tracing::{error, info};

use crate::command::{CommandRunner, Probe, args, probe, render};
use crate::error::{Result, SnapError};
use crate::subvolume::SubvolumeManager;

/// Removes a path from its subvolume, lifting read-only for the duration.
///
/// The read-only property of the owning subvolume is the same after
/// [`GuardedDeleter::delete`] returns as it was before, whether the removal
/// succeeded or not. A process killed between the unlock and relock steps
/// leaves the subvolume writable.
pub struct GuardedDeleter<'a, R> {
    manager: &'a SubvolumeManager<R>,
}

impl<'a, R: CommandRunner> GuardedDeleter<'a, R> {
    pub fn new(manager: &'a SubvolumeManager<R>) -> Self {
        Self { manager }
    }

    pub fn delete(&self, target: &Path) -> Result<()> {
        let subvolume = self.manager.resolve(target)?;
        let read_only = self.manager.is_read_only(&subvolume)?;

        if read_only {
            info!("unlocking {}", subvolume.display());
            self.manager.set_read_only(&subvolume, false)?;
        }

        let mut rm_args = args(["-rf"]);
        rm_args.push(target.as_os_str().to_os_string());

        let removal = match probe(self.manager.runner(), "rm", &rm_args) {
            Ok(Probe::Success(_)) => Ok(()),
            Ok(Probe::Failed(stderr)) => Err(SnapError::CommandFailed {
                command: render("rm", &rm_args),
                stderr,
            }),
            Err(e) => Err(e),
        };

        if let Err(delete_error) = removal {
            if read_only {
                if let Err(restore_error) = self.manager.set_read_only(&subvolume, true) {
                    error!(
                        "{} left writable after failed delete: {}",
                        subvolume.display(),
                        restore_error
                    );
                    return Err(SnapError::RollbackFailed {
                        subvolume,
                        delete: delete_error.to_string(),
                        restore: restore_error.to_string(),
                    });
                }
            }
            return Err(delete_error);
        }

        info!("removed {}", target.display());

        if read_only {
            self.manager.set_read_only(&subvolume, true)?;
        }

        Ok(())
    }
}
