//! Mapping between local directory trees and S3 key prefixes.
//!
//! A directory copy always nests the source root's own name one level under
//! the destination root: copying local `a/x` into prefix `y` writes keys
//! under `y/x`, and downloading prefix `a/x` into directory `y` writes files
//! under `y/x`. Individual items keep their path relative to the source root.

use std::path::{Path, PathBuf};

/// Last path segment of a key or prefix, ignoring a trailing separator.
pub fn last_key_segment(prefix: &str) -> &str {
    prefix
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(prefix)
}

/// Local directory that a download of `remote_prefix` into `local_root`
/// resolves to: `local_root` joined with the prefix's last segment.
pub fn final_local_dir(local_root: &Path, remote_prefix: &str) -> PathBuf {
    local_root.join(last_key_segment(remote_prefix))
}

/// Remote prefix that an upload of `local_root` into `remote_prefix`
/// resolves to: `remote_prefix` joined with the directory's own name.
pub fn final_remote_prefix(remote_prefix: &str, local_root: &Path) -> String {
    let name = local_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    join_key(remote_prefix, &name)
}

/// Local destination for one listed object: the key's path relative to
/// `remote_prefix`, appended to the final local directory.
pub fn local_path_for_key(final_dir: &Path, remote_prefix: &str, key: &str) -> PathBuf {
    let relative = key
        .strip_prefix(remote_prefix)
        .unwrap_or(key)
        .trim_start_matches('/');
    relative
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(final_dir.to_path_buf(), |path, part| path.join(part))
}

/// Destination key for one local file: its path relative to the source
/// root, appended to the final remote prefix. Backslashes are normalized
/// so Windows-style relative paths produce valid keys.
pub fn key_for_local_file(final_prefix: &str, relative: &Path) -> String {
    let clean = relative.to_string_lossy().replace('\\', "/");
    join_key(final_prefix, &clean)
}

fn join_key(prefix: &str, suffix: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let suffix = suffix.trim_start_matches('/');
    if prefix.is_empty() {
        suffix.to_string()
    } else if suffix.is_empty() {
        prefix.to_string()
    } else {
        format!("{}/{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_key_segment() {
        assert_eq!(last_key_segment("test_dir/a"), "a");
        assert_eq!(last_key_segment("test_dir/a/"), "a");
        assert_eq!(last_key_segment("a"), "a");
    }

    #[test]
    fn test_final_local_dir_nests_prefix_name() {
        assert_eq!(
            final_local_dir(Path::new("/tmp/dest"), "test_dir/a"),
            PathBuf::from("/tmp/dest/a")
        );
    }

    #[test]
    fn test_final_remote_prefix_nests_dir_name() {
        assert_eq!(final_remote_prefix("y", Path::new("a/x")), "y/x");
        assert_eq!(final_remote_prefix("y/", Path::new("a/x")), "y/x");
        // Bare source name degenerates to destination/source.
        assert_eq!(final_remote_prefix("y", Path::new("x")), "y/x");
        // Empty destination keeps only the source name.
        assert_eq!(final_remote_prefix("", Path::new("a/x")), "x");
    }

    #[test]
    fn test_local_path_for_key_preserves_relative_structure() {
        assert_eq!(
            local_path_for_key(Path::new("/tmp/dest/a"), "test_dir/a", "test_dir/a/x/f.txt"),
            PathBuf::from("/tmp/dest/a/x/f.txt")
        );
    }

    #[test]
    fn test_key_for_local_file() {
        assert_eq!(key_for_local_file("y/x", Path::new("sub/f.txt")), "y/x/sub/f.txt");
        assert_eq!(key_for_local_file("y/x", Path::new("f.txt")), "y/x/f.txt");
    }

    #[test]
    fn test_key_for_local_file_normalizes_backslashes() {
        assert_eq!(
            key_for_local_file("y/x", Path::new("sub\\f.txt")),
            "y/x/sub/f.txt"
        );
    }
}
