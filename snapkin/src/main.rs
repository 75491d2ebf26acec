// SPDX-License-Identifier: GPL-3.0-only

//! snapkin: find and remove a path across every snapshot of its BTRFS subvolume

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod commands;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    finish(commands::run(cli))
}

/// Report a fatal error on stderr; every error exits with status 1.
fn finish(result: anyhow::Result<ExitCode>) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!("fatal: {e:?}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "snapkin=debug,snapkin_btrfs=debug"
    } else {
        "snapkin=warn,snapkin_btrfs=warn"
    };

    // stderr keeps logs out of the listing on stdout
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use snapkin_btrfs::SnapError;

    use super::*;

    #[test]
    fn success_passes_through() {
        assert_eq!(finish(Ok(ExitCode::SUCCESS)), ExitCode::SUCCESS);
        assert_eq!(finish(Ok(ExitCode::FAILURE)), ExitCode::FAILURE);
    }

    #[test]
    fn library_errors_exit_with_failure() {
        let missing_mount = SnapError::MountNotFound {
            id: "5".to_string(),
            table: PathBuf::from("/proc/mounts"),
        };
        assert_eq!(finish(Err(missing_mount.into())), ExitCode::FAILURE);

        let failed_rm = SnapError::CommandFailed {
            command: "rm -rf /snaps/1/file".to_string(),
            stderr: "rm: cannot remove".to_string(),
        };
        assert_eq!(finish(Err(failed_rm.into())), ExitCode::FAILURE);
    }
}
