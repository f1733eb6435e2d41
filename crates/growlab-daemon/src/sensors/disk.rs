//! Disk usage probe and byte-size humanizer.

use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Disk usage snapshot for one filesystem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskStats {
    /// Bytes in use on the filesystem.
    pub used_bytes: u64,
    /// Percent used, following the used / (used + available) convention.
    pub percent: f64,
}

/// Source of disk usage statistics. A seam so the poll loop can be tested
/// with a synthetic probe.
pub trait DiskProbe {
    fn usage(&self, path: &Path) -> io::Result<DiskStats>;
}

/// Probe backed by statvfs(3). Queried fresh each cycle; at a multi-second
/// cadence freshness matters more than the syscall cost.
pub struct StatvfsProbe;

impl DiskProbe for StatvfsProbe {
    fn usage(&self, path: &Path) -> io::Result<DiskStats> {
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))?;

        let mut vfs: libc::statvfs = unsafe { std::mem::zeroed() };
        // SAFETY: c_path is a valid NUL-terminated string and vfs is a
        // valid out-pointer for the duration of the call
        let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut vfs) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }

        let frsize = vfs.f_frsize as u64;
        let total = vfs.f_blocks as u64 * frsize;
        let free = vfs.f_bfree as u64 * frsize;
        let available = vfs.f_bavail as u64 * frsize;
        let used = total.saturating_sub(free);

        let percent = if used + available > 0 {
            used as f64 / (used + available) as f64 * 100.0
        } else {
            0.0
        };

        Ok(DiskStats {
            used_bytes: used,
            percent,
        })
    }
}

const UNIT_SYMBOLS: [char; 8] = ['K', 'M', 'G', 'T', 'P', 'E', 'Z', 'Y'];

/// Formats a byte count using the largest binary unit in which the
/// truncated magnitude is at least 1; values below 1K render as "<n>B".
///
/// The magnitude is truncated, not rounded: 10000 bytes is "9K".
pub fn humanize_bytes(bytes: u64) -> String {
    let bytes = bytes as u128;
    for (i, symbol) in UNIT_SYMBOLS.iter().enumerate().rev() {
        // Thresholds up to Y = 2^80 need more than 64 bits
        let unit = 1u128 << (10 * (i as u32 + 1));
        if bytes >= unit {
            return format!("{}{}", bytes / unit, symbol);
        }
    }
    format!("{}B", bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_plain_bytes() {
        assert_eq!(humanize_bytes(0), "0B");
        assert_eq!(humanize_bytes(1), "1B");
        assert_eq!(humanize_bytes(1023), "1023B");
    }

    #[test]
    fn test_humanize_truncates() {
        assert_eq!(humanize_bytes(1024), "1K");
        assert_eq!(humanize_bytes(10000), "9K");
        assert_eq!(humanize_bytes(100001221), "95M");
        assert_eq!(humanize_bytes(500000000), "476M");
    }

    #[test]
    fn test_humanize_unit_boundaries() {
        assert_eq!(humanize_bytes((1 << 20) - 1), "1023K");
        assert_eq!(humanize_bytes(1 << 20), "1M");
        assert_eq!(humanize_bytes(1 << 30), "1G");
        assert_eq!(humanize_bytes(1 << 40), "1T");
        assert_eq!(humanize_bytes(1 << 60), "1E");
        assert_eq!(humanize_bytes(u64::MAX), "15E");
    }

    #[test]
    fn test_humanize_shape() {
        for n in [0u64, 7, 999, 4096, 123456789, u64::MAX] {
            let s = humanize_bytes(n);
            let (digits, unit) = s.split_at(s.len() - 1);
            assert!(unit.chars().all(|c| "BKMGTPEZY".contains(c)), "{s}");
            assert!(digits.chars().all(|c| c.is_ascii_digit()), "{s}");
        }
    }

    #[test]
    fn test_statvfs_root() {
        let stats = StatvfsProbe.usage(Path::new("/")).unwrap();
        assert!(stats.percent >= 0.0 && stats.percent <= 100.0);
    }

    #[test]
    fn test_statvfs_missing_path() {
        assert!(StatvfsProbe
            .usage(Path::new("/no/such/growlab/path"))
            .is_err());
    }
}
