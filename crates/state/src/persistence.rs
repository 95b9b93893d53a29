//! Filesystem bootstrapping and whole-file writes.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Permission bits for the SSH directory and its subdirectories.
pub const PRIVATE_DIR_MODE: u32 = 0o700;
/// Permission bits for configuration files.
pub const PRIVATE_FILE_MODE: u32 = 0o600;

#[cfg(unix)]
fn set_mode_if_different(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let current = fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .permissions()
        .mode()
        & 0o777;
    if current != mode {
        tracing::debug!(
            path = %path.display(),
            from = %format!("{current:o}"),
            to = %format!("{mode:o}"),
            "fixing permissions"
        );
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .with_context(|| format!("failed to chmod {}", path.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_mode_if_different(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Ensures `path` is a directory with permission bits `mode`.
///
/// Returns `true` when the directory had to be created.
pub fn ensure_directory(path: &Path, mode: u32) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            set_mode_if_different(path, mode)?;
            Ok(false)
        }
        Ok(_) => bail!("{} exists but is not a directory", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(path)
                .with_context(|| format!("failed to create directory {}", path.display()))?;
            set_mode_if_different(path, mode)?;
            Ok(true)
        }
        Err(e) => Err(e).with_context(|| format!("failed to stat {}", path.display())),
    }
}

/// Ensures `path` is a regular file readable only by its owner.
///
/// Creates an empty file when missing and returns `true` in that case.
pub fn ensure_private_file(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            set_mode_if_different(path, PRIVATE_FILE_MODE)?;
            Ok(false)
        }
        Ok(_) => bail!("{} exists but is not a file", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::write(path, "").with_context(|| format!("failed to create {}", path.display()))?;
            set_mode_if_different(path, PRIVATE_FILE_MODE)?;
            Ok(true)
        }
        Err(e) => Err(e).with_context(|| format!("failed to stat {}", path.display())),
    }
}

/// Reads a UTF-8 file, treating a missing file as empty.
pub fn read_or_empty(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// File a write to `path` lands on.
///
/// Symlinks are followed, so a config linked into a dotfiles checkout is
/// updated where it lives instead of being replaced by a regular file.
fn write_target(path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(real) => Ok(real),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => match fs::read_link(path) {
            // Dangling link: create the file it points at.
            Ok(dest) => Ok(match path.parent() {
                Some(parent) => parent.join(dest),
                None => dest,
            }),
            Err(_) => Ok(path.to_path_buf()),
        },
        Err(e) => Err(e).with_context(|| format!("failed to resolve {}", path.display())),
    }
}

/// Replaces the contents of `path` in one step.
///
/// Writes to a temporary file next to the target and renames it over the
/// original, so readers see either the old or the new file. The result is
/// owner read/write only. A symlinked `path` keeps its link; the file it
/// points at is replaced.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let target = write_target(path)?;
    if target != path {
        tracing::debug!(path = %path.display(), target = %target.display(), "following symlink");
    }
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write temp file for {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to flush temp file for {}", path.display()))?;
    set_mode_if_different(tmp.path(), PRIVATE_FILE_MODE)?;
    tmp.persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ensure_directory_creates_nested() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("a/b/c");
        assert!(ensure_directory(&dir, PRIVATE_DIR_MODE).unwrap());
        assert!(dir.is_dir());
        assert!(!ensure_directory(&dir, PRIVATE_DIR_MODE).unwrap());
    }

    #[test]
    fn ensure_directory_rejects_file() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();
        let err = ensure_directory(&file, PRIVATE_DIR_MODE).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn ensure_private_file_creates_empty() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("config");
        assert!(ensure_private_file(&file).unwrap());
        assert_eq!(fs::read_to_string(&file).unwrap(), "");
        assert!(!ensure_private_file(&file).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn ensure_private_file_tightens_mode() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("config");
        fs::write(&file, "Host a\n").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();

        ensure_private_file(&file).unwrap();
        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(fs::read_to_string(&file).unwrap(), "Host a\n");
    }

    #[test]
    fn read_or_empty_handles_missing() {
        let tmp = tempdir().unwrap();
        assert_eq!(read_or_empty(&tmp.path().join("nope")).unwrap(), "");
    }

    #[test]
    fn write_atomic_replaces_contents() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("config");
        fs::write(&file, "old\n").unwrap();
        write_atomic(&file, "new\n").unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "new\n");
        // No stray temp files left behind.
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_follows_symlink() {
        let tmp = tempdir().unwrap();
        let real = tmp.path().join("dotfiles_config");
        fs::write(&real, "old\n").unwrap();
        let link = tmp.path().join("config");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        write_atomic(&link, "Host a\n").unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), "Host a\n");
        assert_eq!(fs::read_to_string(&link).unwrap(), "Host a\n");
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_creates_dangling_symlink_target() {
        let tmp = tempdir().unwrap();
        let link = tmp.path().join("config");
        std::os::unix::fs::symlink("dotfiles_config", &link).unwrap();

        write_atomic(&link, "Host a\n").unwrap();
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(
            fs::read_to_string(tmp.path().join("dotfiles_config")).unwrap(),
            "Host a\n"
        );
    }
}
