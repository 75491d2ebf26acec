// SPDX-License-Identifier: GPL-3.0-only

//! Locate and remove a path across every snapshot of its BTRFS subvolume
//!
//! The owning subvolume is found by probing upward with
//! `btrfs subvolume show`, its snapshot list is read from the same query, and
//! each snapshot is checked for the path at the same relative position.
//! Removal temporarily lifts the read-only property of the snapshot holding
//! the path and always puts it back.

pub mod command;
pub mod delete;
pub mod error;
pub mod interaction;
pub mod locate;
pub mod mounts;
pub mod progress;
pub mod settings;
pub mod subvolume;
pub mod usage;

// Re-export commonly used types
pub use command::{CommandOutcome, CommandRunner, Probe, SystemRunner};
pub use delete::GuardedDeleter;
pub use error::{Result, SnapError};
pub use interaction::{InteractionController, LinePrompt, Mode, Outcome, Prompt, Reply};
pub use locate::{Located, ResolvedTargetSet, SnapshotMatch, Target, locate, normalize};
pub use settings::Settings;
pub use subvolume::{SubvolumeInfo, SubvolumeManager};
pub use usage::path_usage;
