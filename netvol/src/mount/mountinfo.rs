use std::path::{Path, PathBuf};

use netvol_shared::errors::NetvolResult;

/// Whether `path` is currently a mount point.
///
/// A path that does not exist is not mounted.
#[cfg(target_os = "linux")]
pub fn is_mounted(path: &Path) -> NetvolResult<bool> {
    let Ok(path) = path.canonicalize() else {
        return Ok(false);
    };

    let content = std::fs::read_to_string("/proc/self/mountinfo")
        .map_err(|e| {
            netvol_shared::errors::NetvolError::Mount(format!("failed to read mountinfo: {}", e))
        })?;

    Ok(mount_points(&content).any(|p| p == path))
}

#[cfg(not(target_os = "linux"))]
pub fn is_mounted(_path: &Path) -> NetvolResult<bool> {
    Ok(false)
}

/// Mount points listed in a mountinfo table (field 5 of each line).
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn mount_points(content: &str) -> impl Iterator<Item = PathBuf> + '_ {
    content
        .lines()
        .filter_map(|line| line.split_whitespace().nth(4))
        .map(|field| PathBuf::from(unescape(field)))
}

/// Undo the octal escaping mountinfo applies to spaces, tabs, newlines
/// and backslashes (`\040`, `\011`, `\012`, `\134`).
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = digits
                    .iter()
                    .fold(0u16, |acc, b| acc * 8 + u16::from(b - b'0'));
                if let Ok(value) = u8::try_from(value) {
                    out.push(value);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw
35 22 0:31 / /var/lib/docker-volumes rw,relatime shared:20 - nfs4 10.0.0.5:/exports rw,vers=4.0
36 22 0:32 / /mnt/with\\040space rw,relatime - tmpfs tmpfs rw
";

    #[test]
    fn test_mount_points() {
        let points: Vec<PathBuf> = mount_points(SAMPLE).collect();
        assert_eq!(
            points,
            vec![
                PathBuf::from("/"),
                PathBuf::from("/var/lib/docker-volumes"),
                PathBuf::from("/mnt/with space"),
            ]
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("/plain"), "/plain");
        assert_eq!(unescape("/a\\040b"), "/a b");
        assert_eq!(unescape("/tab\\011x"), "/tab\tx");
        assert_eq!(unescape("/back\\134slash"), "/back\\slash");
        assert_eq!(unescape("/short\\04"), "/short\\04");
    }

    #[test]
    fn test_missing_path_not_mounted() {
        assert!(!is_mounted(Path::new("/definitely/not/here")).unwrap());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_fresh_directory_not_mounted() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        assert!(!is_mounted(temp_dir.path()).unwrap());
    }
}
