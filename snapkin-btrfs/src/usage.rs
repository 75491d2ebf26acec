// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use tracing::debug;

use crate::command::{CommandRunner, Probe, args, probe};

/// Shown when `du` cannot size a path.
pub const UNKNOWN_USAGE: &str = "??";

/// Shallow disk usage of `path` as printed by `du -h -d0`.
///
/// Never fails: any problem is reported as [`UNKNOWN_USAGE`] and only logged at debug level.
pub fn path_usage<R: CommandRunner>(runner: &R, path: &Path) -> String {
    let mut du_args = args(["-h", "-d0"]);
    du_args.push(path.as_os_str().to_os_string());

    match probe(runner, "du", &du_args) {
        Ok(Probe::Success(stdout)) => match stdout.split_whitespace().next() {
            Some(size) => size.to_string(),
            None => UNKNOWN_USAGE.to_string(),
        },
        Ok(Probe::Failed(stderr)) => {
            debug!("du failed for {}: {}", path.display(), stderr);
            UNKNOWN_USAGE.to_string()
        }
        Err(e) => {
            debug!("du failed for {}: {}", path.display(), e);
            UNKNOWN_USAGE.to_string()
        }
    }
}
