// SPDX-License-Identifier: GPL-3.0-only

//! External command execution
//!
//! Every query and mutation goes through a [`CommandRunner`], so callers only
//! ever see the exit status and the captured output streams.

use std::ffi::{OsStr, OsString};
use std::process::Command;

use tracing::debug;

use crate::error::{Result, SnapError};

/// Captured result of one finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Result of a command whose failure the caller wants to branch on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Success(String),
    Failed(String),
}

impl Probe {
    pub fn is_success(&self) -> bool {
        matches!(self, Probe::Success(_))
    }
}

/// Runs an external program to completion.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutcome>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutcome> {
        (**self).run(program, args)
    }
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutcome> {
        let rendered = render(program, args);
        debug!("running {rendered}");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| SnapError::Spawn {
                command: rendered.clone(),
                source,
            })?;

        let outcome = CommandOutcome {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        debug!(status = ?outcome.status, "{rendered} finished");
        Ok(outcome)
    }
}

pub fn render(program: &str, args: &[OsString]) -> String {
    if args.is_empty() {
        return program.to_string();
    }

    let args: Vec<String> = args
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    format!("{} {}", program, args.join(" "))
}

/// Build an argument vector from anything path- or string-like.
pub fn args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_os_string())
        .collect()
}

/// Run a command whose failure cannot be recovered from.
pub fn run_checked<R: CommandRunner>(
    runner: &R,
    program: &str,
    args: &[OsString],
) -> Result<String> {
    let outcome = runner.run(program, args)?;
    if !outcome.success() {
        return Err(SnapError::CommandFailed {
            command: render(program, args),
            stderr: outcome.stderr.trim_end().to_string(),
        });
    }

    Ok(outcome.stdout)
}

/// Run a command whose non-zero exit is an answer rather than an error.
pub fn probe<R: CommandRunner>(runner: &R, program: &str, args: &[OsString]) -> Result<Probe> {
    let outcome = runner.run(program, args)?;
    if outcome.success() {
        Ok(Probe::Success(outcome.stdout))
    } else {
        Ok(Probe::Failed(outcome.stderr.trim_end().to_string()))
    }
}
