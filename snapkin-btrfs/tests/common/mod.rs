#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use snapkin_btrfs::command::render;
use snapkin_btrfs::{CommandOutcome, CommandRunner, Result, Settings, SubvolumeManager};
use tempfile::TempDir;

/// Stand-in for `btrfs`, `rm` and `du` that keeps subvolume state in memory.
#[derive(Default)]
pub struct FakeTools {
    show: HashMap<PathBuf, String>,
    read_only: RefCell<HashMap<PathBuf, bool>>,
    pub fail_rm: bool,
    pub fail_unlock: bool,
    pub fail_relock: bool,
    pub fail_du: bool,
    pub calls: RefCell<Vec<String>>,
}

impl FakeTools {
    pub fn add_subvolume(&mut self, path: &Path, show_output: String, read_only: bool) {
        self.show.insert(path.to_path_buf(), show_output);
        self.read_only
            .borrow_mut()
            .insert(path.to_path_buf(), read_only);
    }

    pub fn read_only(&self, path: &Path) -> Option<bool> {
        self.read_only.borrow().get(path).copied()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .cloned()
            .collect()
    }
}

fn ok(stdout: impl Into<String>) -> Result<CommandOutcome> {
    Ok(CommandOutcome {
        status: Some(0),
        stdout: stdout.into(),
        stderr: String::new(),
    })
}

fn fail(stderr: impl Into<String>) -> Result<CommandOutcome> {
    Ok(CommandOutcome {
        status: Some(1),
        stdout: String::new(),
        stderr: stderr.into(),
    })
}

impl CommandRunner for FakeTools {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutcome> {
        self.calls.borrow_mut().push(render(program, args));

        let argv: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        let argv: Vec<&str> = argv.iter().map(String::as_str).collect();

        match (program, argv.as_slice()) {
            ("btrfs", ["subvolume", "show", path]) => match self.show.get(Path::new(path)) {
                Some(output) => ok(output.clone()),
                None => fail(format!("ERROR: Not a Btrfs subvolume: {path}")),
            },
            ("btrfs", ["property", "get", "-ts", path, "ro"]) => {
                match self.read_only.borrow().get(Path::new(path)) {
                    Some(value) => ok(format!("ro={value}\n")),
                    None => fail(format!("ERROR: object is not a btrfs object: {path}")),
                }
            }
            ("btrfs", ["property", "set", "-ts", path, "ro", value]) => {
                let read_only = *value == "true";
                if (!read_only && self.fail_unlock) || (read_only && self.fail_relock) {
                    return fail("ERROR: failed to set flags: Operation not permitted");
                }
                self.read_only
                    .borrow_mut()
                    .insert(PathBuf::from(path), read_only);
                ok("")
            }
            ("rm", ["-rf", path]) => {
                if self.fail_rm {
                    return fail(format!("rm: cannot remove '{path}': Read-only file system"));
                }
                let path = Path::new(path);
                if path.is_dir() {
                    fs::remove_dir_all(path)?;
                } else if path.exists() {
                    fs::remove_file(path)?;
                }
                ok("")
            }
            ("du", ["-h", "-d0", path]) => {
                if self.fail_du {
                    fail(format!("du: cannot access '{path}'"))
                } else {
                    ok(format!("4.0K\t{path}\n"))
                }
            }
            _ => fail(format!("unexpected command: {}", render(program, args))),
        }
    }
}

pub fn show_output(name: &str, top_level_id: &str, snapshots: &[&str]) -> String {
    let mut output = format!(
        "{name}\n\
\tName: \t\t\t{name}\n\
\tUUID: \t\t\t9e6d3bb5-5b5d-d04a-8e0f-3a5a1b8c2d11\n\
\tParent UUID: \t\t-\n\
\tReceived UUID: \t\t-\n\
\tCreation time: \t\t2024-01-15 09:30:00 +0000\n\
\tSubvolume ID: \t\t300\n\
\tGeneration: \t\t1200\n\
\tGen at creation: \t10\n\
\tParent ID: \t\t5\n\
\tTop level ID: \t\t{top_level_id}\n\
\tFlags: \t\t\t-\n\
\tSnapshot(s):\n"
    );
    for snapshot in snapshots {
        output.push_str(&format!("\t\t\t\t{snapshot}\n"));
    }
    output.push_str("\tQuota group:\t\tn/a\n");
    output
}

/// A throwaway tree shaped like a mounted top-level subvolume:
///
/// ```text
/// <top>/data              live subvolume
/// <top>/snaps/snap1       read-only snapshot containing file.txt
/// <top>/snaps/snap2       read-only snapshot without it
/// ```
pub struct Fixture {
    pub dir: TempDir,
    pub top: PathBuf,
    pub data: PathBuf,
    pub snap1: PathBuf,
    pub snap2: PathBuf,
    pub mount_table: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let top = dir.path().join("top");
        let data = top.join("data");
        let snap1 = top.join("snaps/snap1");
        let snap2 = top.join("snaps/snap2");

        fs::create_dir_all(&data).unwrap();
        fs::create_dir_all(&snap1).unwrap();
        fs::create_dir_all(&snap2).unwrap();
        fs::write(snap1.join("file.txt"), b"old contents").unwrap();

        let mount_table = dir.path().join("mounts");
        fs::write(
            &mount_table,
            format!(
                "proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0\n\
/dev/vdb {} btrfs rw,relatime,space_cache=v2,subvolid=5,subvol=/ 0 0\n",
                top.display()
            ),
        )
        .unwrap();

        Self {
            dir,
            top,
            data,
            snap1,
            snap2,
            mount_table,
        }
    }

    pub fn tools(&self) -> FakeTools {
        let mut tools = FakeTools::default();
        tools.add_subvolume(
            &self.data,
            show_output("data", "5", &["snaps/snap1", "snaps/snap2"]),
            false,
        );
        tools.add_subvolume(&self.snap1, show_output("snaps/snap1", "5", &[]), true);
        tools.add_subvolume(&self.snap2, show_output("snaps/snap2", "5", &[]), true);
        tools
    }

    pub fn settings(&self) -> Settings {
        Settings {
            btrfs: "btrfs".to_string(),
            mount_table: self.mount_table.clone(),
        }
    }

    pub fn manager<'t>(&self, tools: &'t FakeTools) -> SubvolumeManager<&'t FakeTools> {
        SubvolumeManager::new(tools, self.settings())
    }
}
