// SPDX-License-Identifier: GPL-3.0-only

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use snapkin_btrfs::{
    CommandRunner, InteractionController, LinePrompt, Mode, Outcome, SubvolumeManager,
};

use super::list::collect;
use crate::cli::RemoveArgs;

pub fn run<R: CommandRunner>(manager: &SubvolumeManager<R>, args: &RemoveArgs) -> Result<ExitCode> {
    let mode = Mode::from_flags(args.preview, args.interactive);
    if mode != Mode::Preview && unsafe { libc::geteuid() } != 0 {
        tracing::warn!("not running as root; toggling snapshot read-only flags will likely fail");
    }

    let set = collect(manager, &args.path, args.active)?;
    tracing::debug!("{} targets for {}", set.len(), set.relative_path);

    let prompt = LinePrompt::new(io::stdin().lock(), io::stdout());
    let outcome =
        InteractionController::new(manager, prompt, io::stdout(), args.disk).run(&set, mode)?;

    Ok(exit_code(outcome))
}

/// A declined batch prompt is a normal exit; quitting is not.
fn exit_code(outcome: Outcome) -> ExitCode {
    match outcome {
        Outcome::Completed | Outcome::Declined => ExitCode::SUCCESS,
        Outcome::Quit => ExitCode::FAILURE,
    }
}
