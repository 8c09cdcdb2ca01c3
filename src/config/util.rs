//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /srv/site/static/styles/   ← start
/// /srv/site/stamp.toml       ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("static/styles");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("stamp.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("stamp.toml")).unwrap();
        assert_eq!(found, dir.path().join("stamp.toml"));
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert!(find_config_file(dir.path(), &path).is_none());

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(Path::new("/"), &path), Some(path));
    }

    #[test]
    fn test_find_config_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(dir.path(), Path::new("no-such-stamp-config.toml")).is_none());
    }
}
