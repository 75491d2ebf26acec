// SPDX-License-Identifier: GPL-3.0-only

//! Preview, interactive and batch removal over a resolved target set

use std::io::{BufRead, Write};
use std::path::Path;

use crate::command::CommandRunner;
use crate::delete::GuardedDeleter;
use crate::error::Result;
use crate::locate::ResolvedTargetSet;
use crate::progress::print_progress_line;
use crate::subvolume::SubvolumeManager;
use crate::usage::path_usage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Yes,
    No,
    Quit,
}

impl Reply {
    /// Classify one answer; `None` means ask again.
    pub fn classify(input: &str) -> Option<Reply> {
        match input.trim_end_matches(['\r', '\n']) {
            "" | "y" | "Y" => Some(Reply::Yes),
            "n" | "N" => Some(Reply::No),
            "q" | "Q" => Some(Reply::Quit),
            _ => None,
        }
    }
}

pub const RETRY_PROMPT: &str = "Confirm";

/// Source of yes/no/quit answers.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> Result<Reply>;
}

/// Line-oriented prompt over any reader and writer.
///
/// End of input counts as quit so a closed stdin cannot spin forever.
pub struct LinePrompt<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> LinePrompt<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl<I: BufRead, O: Write> Prompt for LinePrompt<I, O> {
    fn ask(&mut self, question: &str) -> Result<Reply> {
        let mut question = question;
        loop {
            write!(self.output, "{question} [Y/n/q]? ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Reply::Quit);
            }

            match Reply::classify(&line) {
                Some(reply) => return Ok(reply),
                None => question = RETRY_PROMPT,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Preview,
    Interactive,
    Batch,
}

impl Mode {
    pub fn from_flags(preview: bool, interactive: bool) -> Self {
        if preview {
            Mode::Preview
        } else if interactive {
            Mode::Interactive
        } else {
            Mode::Batch
        }
    }
}

/// How a removal run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The single batch confirmation was answered no.
    Declined,
    Quit,
}

pub struct InteractionController<'a, R, P, W> {
    manager: &'a SubvolumeManager<R>,
    prompt: P,
    out: W,
    disk: bool,
}

impl<'a, R, P, W> InteractionController<'a, R, P, W>
where
    R: CommandRunner,
    P: Prompt,
    W: Write,
{
    pub fn new(manager: &'a SubvolumeManager<R>, prompt: P, out: W, disk: bool) -> Self {
        Self {
            manager,
            prompt,
            out,
            disk,
        }
    }

    pub fn run(&mut self, set: &ResolvedTargetSet, mode: Mode) -> Result<Outcome> {
        match mode {
            Mode::Preview => self.preview(set),
            Mode::Interactive => self.interactive(set),
            Mode::Batch => self.batch(set),
        }
    }

    fn usage(&self, path: &Path) -> Option<String> {
        self.disk.then(|| path_usage(self.manager.runner(), path))
    }

    fn preview(&mut self, set: &ResolvedTargetSet) -> Result<Outcome> {
        for target in set.targets.iter().rev() {
            match self.usage(target) {
                Some(usage) => writeln!(self.out, "  would remove: {}  {}", target.display(), usage)?,
                None => writeln!(self.out, "  would remove: {}", target.display())?,
            }
        }

        Ok(Outcome::Completed)
    }

    fn interactive(&mut self, set: &ResolvedTargetSet) -> Result<Outcome> {
        let deleter = GuardedDeleter::new(self.manager);

        for target in set.targets.iter().rev() {
            let question = match self.usage(target) {
                Some(usage) => format!("  rm -rf {} ({})", target.display(), usage),
                None => format!("  rm -rf {}", target.display()),
            };

            match self.prompt.ask(&question)? {
                Reply::Yes => deleter.delete(target)?,
                Reply::No => {}
                Reply::Quit => return Ok(Outcome::Quit),
            }
        }

        Ok(Outcome::Completed)
    }

    fn batch(&mut self, set: &ResolvedTargetSet) -> Result<Outcome> {
        if set.is_empty() {
            writeln!(self.out, "  nothing to erase for \"{}\"", set.relative_path)?;
            return Ok(Outcome::Completed);
        }

        let question = format!(
            "  erase \"{}\" in all snapshots (count:{})",
            set.relative_path,
            set.len()
        );

        match self.prompt.ask(&question)? {
            Reply::Yes => {}
            Reply::No => return Ok(Outcome::Declined),
            Reply::Quit => return Ok(Outcome::Quit),
        }

        let deleter = GuardedDeleter::new(self.manager);
        let total = set.len();
        for (index, target) in set.targets.iter().rev().enumerate() {
            deleter.delete(target)?;
            print_progress_line(&mut self.out, index + 1, total)?;
        }

        Ok(Outcome::Completed)
    }
}
