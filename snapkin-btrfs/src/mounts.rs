// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

/// Find the mount point whose options carry `subvolid=<top_level_id>`.
///
/// `table` uses the `/proc/mounts` layout: device, mount point, type,
/// options, dump, pass. The first matching line wins.
pub fn find_mount_point(table: &str, top_level_id: &str) -> Option<PathBuf> {
    if top_level_id.is_empty() {
        return None;
    }

    let wanted = format!("subvolid={top_level_id}");

    table
        .lines()
        .filter(|line| !line.trim().is_empty())
        .find_map(|line| {
            let mut fields = line.split_whitespace();
            let mount_point = fields.nth(1)?;
            let options = fields.nth(1)?;

            options
                .split(',')
                .any(|option| option == wanted)
                .then(|| PathBuf::from(unescape_mount_field(mount_point)))
        })
}

/// Decode the octal escapes (`\040` for space and friends) the kernel uses.
fn unescape_mount_field(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'\\'
            && index + 3 < bytes.len()
            && bytes[index + 1..index + 4].iter().all(|b| (b'0'..=b'7').contains(b))
        {
            if let Ok(num) = u8::from_str_radix(&value[index + 1..index + 4], 8) {
                output.push(num);
                index += 4;
                continue;
            }
        }

        output.push(bytes[index]);
        index += 1;
    }

    String::from_utf8_lossy(&output).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
/dev/nvme0n1p2 / btrfs rw,noatime,compress=zstd:3,ssd,space_cache=v2,subvolid=256,subvol=/@ 0 0
/dev/nvme0n1p2 /home btrfs rw,noatime,ssd,space_cache=v2,subvolid=257,subvol=/@home 0 0
/dev/nvme0n1p2 /mnt/btrfs\\040root btrfs rw,noatime,ssd,space_cache=v2,subvolid=5,subvol=/ 0 0
/dev/nvme0n1p2 /mnt/other btrfs rw,noatime,ssd,space_cache=v2,subvolid=5,subvol=/ 0 0
";

    #[test]
    fn finds_first_mount_with_matching_subvolid() {
        assert_eq!(
            find_mount_point(TABLE, "5"),
            Some(PathBuf::from("/mnt/btrfs root"))
        );
        assert_eq!(find_mount_point(TABLE, "257"), Some(PathBuf::from("/home")));
    }

    #[test]
    fn subvolid_must_match_exactly() {
        assert_eq!(find_mount_point(TABLE, "25"), None);
        assert_eq!(find_mount_point(TABLE, "2"), None);
    }

    #[test]
    fn missing_id_has_no_mount_point() {
        assert_eq!(find_mount_point(TABLE, "999"), None);
        assert_eq!(find_mount_point(TABLE, ""), None);
        assert_eq!(find_mount_point("", "5"), None);
    }

    #[test]
    fn tolerates_short_lines() {
        assert_eq!(find_mount_point("garbage\nnone /x\n", "5"), None);
    }
}
