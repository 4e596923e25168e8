//! Filesystem helpers shared by the compilers and module steps.

use anyhow::{Context, Result};
use jwalk::WalkDir;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::SystemTime,
};

/// Files never treated as sources, whatever their extension.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Prefix of the scratch files `write_atomic` leaves behind on crash.
pub const TEMP_PREFIX: &str = ".assetforge-";

/// Collect files under `dir` whose extension is `ext`, sorted.
///
/// With `recursive` unset only the direct children are listed. A missing
/// directory yields an empty list.
pub fn collect_files(dir: &Path, ext: &str, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<_> = WalkDir::new(dir)
        .max_depth(max_depth)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .filter(|p| has_extension(p, ext))
        .collect();
    files.sort();
    files
}

/// Case-sensitive extension check (`ext` without the dot).
#[inline]
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

/// Replace `dest` with `bytes` in a single rename.
///
/// Readers see either the previous file or the complete new one. The
/// scratch file lives next to `dest` so the rename never crosses devices.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let dir = dest
        .parent()
        .with_context(|| format!("Output path has no parent: {}", dest.display()))?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(dest)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    Ok(())
}

/// Bump the modification time of an existing file.
///
/// Returns `Ok(false)` when the file does not exist.
pub fn touch(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    let file = fs::OpenOptions::new()
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    file.set_modified(SystemTime::now())
        .with_context(|| format!("Failed to touch {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.scss"), "").unwrap();
        fs::write(dir.path().join("a.scss"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("nested/c.scss"), "").unwrap();

        let flat = collect_files(dir.path(), "scss", false);
        assert_eq!(
            flat,
            vec![dir.path().join("a.scss"), dir.path().join("b.scss")]
        );

        let deep = collect_files(dir.path(), "scss", true);
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&dir.path().join("nested/c.scss")));
    }

    #[test]
    fn test_collect_files_missing_dir() {
        assert!(collect_files(Path::new("/nonexistent/assetforge"), "scss", true).is_empty());
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("css/out.css");

        write_atomic(&dest, b"a{}").unwrap();
        write_atomic(&dest, b"b{}").unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"b{}");
        let leftovers: Vec<_> = fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_touch_updates_mtime() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("urls.py");
        fs::write(&file, "urlpatterns = []").unwrap();

        let old = SystemTime::now() - Duration::from_secs(3600);
        fs::File::options()
            .append(true)
            .open(&file)
            .unwrap()
            .set_modified(old)
            .unwrap();

        assert!(touch(&file).unwrap());
        let mtime = fs::metadata(&file).unwrap().modified().unwrap();
        assert!(mtime > old + Duration::from_secs(60));
        assert_eq!(fs::read_to_string(&file).unwrap(), "urlpatterns = []");
    }

    #[test]
    fn test_touch_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(!touch(&dir.path().join("missing.py")).unwrap());
    }
}
