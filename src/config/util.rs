//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Returns the path of the first `config_name` found in `start` or one of
/// its ancestors. An absolute `config_name` is returned as-is if it exists.
///
/// ```text
/// /srv/platform/lms/static/   ← start
/// /srv/platform/assets.toml   ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("lms/static/sass");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("assets.toml"), "").unwrap();

        let found = find_config_file(Path::new("assets.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("assets.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(Path::new("assets-missing-7f3a.toml"), dir.path()).is_none());
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("custom.toml");
        assert!(find_config_file(&config, Path::new("/")).is_none());
        fs::write(&config, "").unwrap();
        assert_eq!(find_config_file(&config, Path::new("/")), Some(config));
    }
}
