// SPDX-License-Identifier: GPL-3.0-only

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use snapkin_btrfs::{
    CommandRunner, Located, ResolvedTargetSet, SubvolumeManager, locate, path_usage,
};

use crate::cli::ListArgs;

/// Resolve the targets for `path` without printing anything.
pub fn collect<R: CommandRunner>(
    manager: &SubvolumeManager<R>,
    path: &Path,
    include_active: bool,
) -> Result<ResolvedTargetSet> {
    Ok(locate(manager, path)?.into_target_set(include_active))
}

pub fn run<R: CommandRunner>(manager: &SubvolumeManager<R>, args: &ListArgs) -> Result<ExitCode> {
    if args.silent {
        let set = collect(manager, &args.path, false)?;
        tracing::debug!("collected {} targets", set.len());
        return Ok(ExitCode::SUCCESS);
    }

    let located = locate(manager, &args.path)?;
    let mut out = io::stdout().lock();

    if args.json {
        let set = located.into_target_set(false);
        writeln!(out, "{}", serde_json::to_string_pretty(&set)?)?;
        return Ok(ExitCode::SUCCESS);
    }

    display(manager, &located, args, &mut out)?;
    Ok(ExitCode::SUCCESS)
}

fn display<R: CommandRunner, W: Write>(
    manager: &SubvolumeManager<R>,
    located: &Located,
    args: &ListArgs,
    out: &mut W,
) -> Result<()> {
    let target = &located.target.absolute_path;
    writeln!(
        out,
        "target: {}  ({})",
        target.display(),
        path_usage(manager.runner(), target)
    )?;

    if args.summary {
        writeln!(out, "  found in {} snapshot(s)", located.matches.len())?;
        return Ok(());
    }

    for found in &located.matches {
        let snapshot = manager.info(&found.snapshot_path)?;
        let usage = args
            .disk
            .then(|| path_usage(manager.runner(), &found.search_path));

        writeln!(
            out,
            "{}",
            format_match(
                &snapshot.creation_time,
                args.flags.then_some(snapshot.flags.as_str()),
                usage.as_deref(),
                &found.snapshot_path,
            )
        )?;
    }

    Ok(())
}

/// One listing row: creation time, optional flags and usage, snapshot root.
fn format_match(
    creation_time: &str,
    flags: Option<&str>,
    usage: Option<&str>,
    snapshot_path: &Path,
) -> String {
    let mut columns = vec![format!("  {creation_time}")];
    columns.extend(flags.map(ToString::to_string));
    columns.extend(usage.map(ToString::to_string));
    columns.push(snapshot_path.display().to_string());
    columns.join("   ")
}
