//! Active-mount-table lookup for already-mounted SMB shares.
//!
//! On platforms without a native UNC client, a share the user (or an
//! automounter) has already mounted is the cheapest way to reach it: plain
//! local I/O under the mount point, no credentials, no transport. This module
//! scans the host's mount table for CIFS/SMBFS entries and matches them
//! against a `(host, share)` pair.
//!
//! A mount row matches when either:
//!
//! - its source is `//host/share` or `//user@host/share`, or
//! - its options carry `unc=\\host\share` (the cifs.ko convention).
//!
//! Matching is case-insensitive on both host and share.
//!
//! # Platform sources
//!
//! - **Linux**: `/proc/mounts` (`{device} {mountpoint} {fstype} {options} ...`)
//! - **macOS**: `mount(8)` output (`{source} on {mountpoint} ({fstype}, ...)`)
//! - elsewhere: empty table

use std::path::PathBuf;

/// One row of the system mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRow {
    /// Mount source (e.g. `//alice@nas/media`).
    pub source: String,
    /// Where the filesystem is mounted.
    pub mountpoint: PathBuf,
    /// Filesystem type (e.g. `cifs`, `smbfs`).
    pub fstype: String,
    /// Comma-separated mount options.
    pub options: String,
}

/// Filesystem types that indicate an SMB mount.
const SMB_FSTYPES: &[&str] = &["cifs", "smbfs", "smb3", "smb"];

impl MountRow {
    /// True when this row is an SMB-family mount.
    pub fn is_smb(&self) -> bool {
        let fstype = self.fstype.to_ascii_lowercase();
        SMB_FSTYPES.iter().any(|ft| fstype == *ft)
    }

    /// True when this mount serves `//host/share`.
    pub fn serves(&self, host: &str, share: &str) -> bool {
        if !self.is_smb() {
            return false;
        }
        source_matches(&self.source, host, share) || unc_option_matches(&self.options, host, share)
    }
}

/// Match a mount source of the form `//host/share` or `//user@host/share`.
fn source_matches(source: &str, host: &str, share: &str) -> bool {
    let Some(body) = source.strip_prefix("//") else {
        return false;
    };
    let mut pieces = body.splitn(2, '/');
    let authority = pieces.next().unwrap_or_default();
    let Some(mounted_share) = pieces.next() else {
        return false;
    };
    // Strip an embedded username; automounters record `user@host`.
    let mounted_host = authority.rsplit('@').next().unwrap_or(authority);

    mounted_host.eq_ignore_ascii_case(host)
        && mounted_share
            .trim_end_matches('/')
            .eq_ignore_ascii_case(share)
}

/// Match a cifs `unc=\\host\share` mount option.
fn unc_option_matches(options: &str, host: &str, share: &str) -> bool {
    for option in options.split(',') {
        let Some(value) = option.strip_prefix("unc=") else {
            continue;
        };
        let body = value.trim_start_matches('\\').trim_start_matches('/');
        let mut pieces = body.split(['\\', '/']).filter(|p| !p.is_empty());
        let (Some(mounted_host), Some(mounted_share)) = (pieces.next(), pieces.next()) else {
            continue;
        };
        if mounted_host.eq_ignore_ascii_case(host) && mounted_share.eq_ignore_ascii_case(share) {
            return true;
        }
    }
    false
}

/// A snapshot of the system mount table.
#[derive(Debug, Clone, Default)]
pub struct MountTable {
    rows: Vec<MountRow>,
}

impl MountTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from pre-parsed rows.
    pub fn from_rows(rows: Vec<MountRow>) -> Self {
        Self { rows }
    }

    /// Parse Linux `/proc/mounts` text.
    pub fn from_proc_mounts(text: &str) -> Self {
        let rows = text.lines().filter_map(parse_proc_mounts_line).collect();
        Self { rows }
    }

    /// Parse macOS/BSD `mount(8)` output.
    pub fn from_mount_output(text: &str) -> Self {
        let rows = text.lines().filter_map(parse_mount_output_line).collect();
        Self { rows }
    }

    /// Find a mounted SMB share serving `//host/share`, if any.
    pub fn find_share(&self, host: &str, share: &str) -> Option<&MountRow> {
        self.rows.iter().find(|row| row.serves(host, share))
    }

    /// All rows, for diagnostics.
    pub fn rows(&self) -> &[MountRow] {
        &self.rows
    }
}

/// `{device} {mountpoint} {fstype} {options} {dump} {pass}`
fn parse_proc_mounts_line(line: &str) -> Option<MountRow> {
    let mut fields = line.split_whitespace();
    let source = fields.next()?;
    let mountpoint = fields.next()?;
    let fstype = fields.next()?;
    let options = fields.next().unwrap_or_default();
    Some(MountRow {
        source: unescape_octal(source),
        mountpoint: PathBuf::from(unescape_octal(mountpoint)),
        fstype: fstype.to_string(),
        options: options.to_string(),
    })
}

/// `/proc/mounts` escapes spaces and other separators as `\040`-style octal.
fn unescape_octal(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let digits: String = chars.clone().take(3).collect();
        if digits.len() == 3 {
            if let Ok(value) = u8::from_str_radix(&digits, 8) {
                out.push(value as char);
                chars.nth(2);
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// `{source} on {mountpoint} ({fstype}, {options...})`
fn parse_mount_output_line(line: &str) -> Option<MountRow> {
    let on_idx = line.find(" on ")?;
    let source = line[..on_idx].to_string();

    let rest = &line[on_idx + 4..];
    let paren_idx = rest.rfind(" (")?;
    let mountpoint = PathBuf::from(&rest[..paren_idx]);

    let opts = rest[paren_idx + 2..].trim_end_matches(')');
    let mut parts = opts.splitn(2, ',');
    let fstype = parts.next()?.trim().to_string();
    let options = parts.next().unwrap_or_default().trim().to_string();

    Some(MountRow {
        source,
        mountpoint,
        fstype,
        options,
    })
}

/// Source of mount-table snapshots; the seam that lets tests inject a fixed
/// table.
pub trait MountSource: Send + Sync {
    /// Take a fresh snapshot of the mount table.
    fn scan(&self) -> MountTable;
}

/// The real system mount table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMounts;

impl MountSource for SystemMounts {
    fn scan(&self) -> MountTable {
        scan_system()
    }
}

/// A fixed table, for tests and for hosts with no mount table at all.
#[derive(Debug, Clone, Default)]
pub struct StaticMounts(
    /// The table every scan returns.
    pub MountTable,
);

impl MountSource for StaticMounts {
    fn scan(&self) -> MountTable {
        self.0.clone()
    }
}

#[cfg(target_os = "linux")]
fn scan_system() -> MountTable {
    match std::fs::read_to_string("/proc/mounts") {
        Ok(text) => MountTable::from_proc_mounts(&text),
        Err(err) => {
            tracing::warn!(error = %err, "failed to read /proc/mounts; treating mount table as empty");
            MountTable::empty()
        }
    }
}

#[cfg(target_os = "macos")]
fn scan_system() -> MountTable {
    match std::process::Command::new("mount")
        .stdin(std::process::Stdio::null())
        .output()
    {
        Ok(output) => MountTable::from_mount_output(&String::from_utf8_lossy(&output.stdout)),
        Err(err) => {
            tracing::warn!(error = %err, "mount command failed; treating mount table as empty");
            MountTable::empty()
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn scan_system() -> MountTable {
    MountTable::empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROC_MOUNTS: &str = "\
sysfs /sys sysfs rw,nosuid,nodev,noexec 0 0
/dev/sda1 / ext4 rw,relatime 0 0
//nas/media /mnt/media cifs rw,vers=3.1.1,username=alice,unc=\\\\nas\\media 0 0
//10.0.0.5/backup /mnt/backup cifs rw,username=bob 0 0
";

    const MACOS_MOUNT: &str = "\
/dev/disk3s1 on / (apfs, sealed, local, read-only)
//alice@nas/media on /Volumes/media (smbfs, nodev, nosuid, mounted by alice)
map auto_home on /System/Volumes/Data/home (autofs, automounted, nobrowse)
";

    #[test]
    fn proc_mounts_parsing() {
        let table = MountTable::from_proc_mounts(PROC_MOUNTS);
        assert_eq!(table.rows().len(), 4);
        let row = table.find_share("nas", "media").unwrap();
        assert_eq!(row.mountpoint, PathBuf::from("/mnt/media"));
        assert_eq!(row.fstype, "cifs");
    }

    #[test]
    fn proc_mounts_match_by_unc_option() {
        // Row whose source is a device name but whose unc= option matches.
        let table = MountTable::from_proc_mounts(
            "smbshare /mnt/x cifs rw,unc=\\\\fileserver\\public 0 0\n",
        );
        assert!(table.find_share("fileserver", "public").is_some());
        assert!(table.find_share("fileserver", "private").is_none());
    }

    #[test]
    fn proc_mounts_octal_escapes() {
        let table =
            MountTable::from_proc_mounts("//nas/my\\040share /mnt/my\\040share cifs rw 0 0\n");
        let row = table.find_share("nas", "my share").unwrap();
        assert_eq!(row.mountpoint, PathBuf::from("/mnt/my share"));
    }

    #[test]
    fn macos_mount_parsing() {
        let table = MountTable::from_mount_output(MACOS_MOUNT);
        assert_eq!(table.rows().len(), 3);
        let row = table.find_share("nas", "media").unwrap();
        assert_eq!(row.mountpoint, PathBuf::from("/Volumes/media"));
        assert_eq!(row.fstype, "smbfs");
        // Username embedded in the source does not block the match.
        assert_eq!(row.source, "//alice@nas/media");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let table = MountTable::from_proc_mounts("//NAS/Media /mnt/media cifs rw 0 0\n");
        assert!(table.find_share("nas", "media").is_some());
        assert!(table.find_share("NAS", "MEDIA").is_some());
    }

    #[test]
    fn non_smb_rows_never_match() {
        let table = MountTable::from_proc_mounts("//nas/media /mnt/media nfs rw 0 0\n");
        assert!(table.find_share("nas", "media").is_none());
    }

    #[test]
    fn ip_hosts_match() {
        let table = MountTable::from_proc_mounts(PROC_MOUNTS);
        assert!(table.find_share("10.0.0.5", "backup").is_some());
    }
}
