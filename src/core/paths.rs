//! Path utilities for canopy.
//!
//! Stateless helpers that join a directory and a name, check existence, and perform the
//! create/rename/trash operations behind every mutation. Each mutating call re-validates
//! against the live filesystem at call time, so a stale menu or dialog simply fails here.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by the mutating path utilities.
///
/// The orchestrator collapses these to plain success/failure, but keeping the cause around
/// makes the debug log useful.
#[derive(Debug, Error)]
pub enum FsOpError {
    #[error("'{}' already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("'{}' does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("could not move '{}' to trash: {message}", .path.display())]
    Trash { path: PathBuf, message: String },
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type FsOpResult<T> = Result<T, FsOpError>;

impl FsOpError {
    fn io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::AlreadyExists => FsOpError::AlreadyExists(path.to_path_buf()),
            io::ErrorKind::NotFound => FsOpError::NotFound(path.to_path_buf()),
            _ => FsOpError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Joins a directory and an entry name into a full path.
#[inline]
pub fn add_path(dir: &Path, name: impl AsRef<OsStr>) -> PathBuf {
    dir.join(name.as_ref())
}

/// Returns true if `dir/name` exists. Broken symlinks count as existing.
pub fn exists(dir: &Path, name: &str) -> bool {
    fs::symlink_metadata(add_path(dir, name)).is_ok()
}

/// Creates an empty file at `dir/name`. Fails if anything already lives there.
pub fn new_file(dir: &Path, name: &str) -> FsOpResult<PathBuf> {
    let path = add_path(dir, name);
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| FsOpError::io(&path, e))?;
    Ok(path)
}

/// Creates a single directory at `dir/name`. Parents are not created.
pub fn new_dir(dir: &Path, name: &str) -> FsOpResult<PathBuf> {
    let path = add_path(dir, name);
    fs::create_dir(&path).map_err(|e| FsOpError::io(&path, e))?;
    Ok(path)
}

/// Renames the file `dir/old` to `dir/new`. Never overwrites an existing target.
///
/// `old` is the name as stored on disk, which need not be valid UTF-8.
pub fn rename_file(
    dir: &Path,
    old: impl AsRef<OsStr>,
    new: &str,
) -> FsOpResult<(PathBuf, PathBuf)> {
    rename_entry(dir, old.as_ref(), new, false)
}

/// Renames the directory `dir/old` to `dir/new`. Never overwrites an existing target.
pub fn rename_dir(
    dir: &Path,
    old: impl AsRef<OsStr>,
    new: &str,
) -> FsOpResult<(PathBuf, PathBuf)> {
    rename_entry(dir, old.as_ref(), new, true)
}

fn rename_entry(
    dir: &Path,
    old: &OsStr,
    new: &str,
    want_dir: bool,
) -> FsOpResult<(PathBuf, PathBuf)> {
    let from = add_path(dir, old);
    let to = add_path(dir, new);

    // Same kind rule as the tree listing: follow links, fall back to the link when broken.
    // fs::rename then moves the link itself, never its target.
    let meta = fs::metadata(&from)
        .or_else(|_| fs::symlink_metadata(&from))
        .map_err(|e| FsOpError::io(&from, e))?;
    if meta.is_dir() != want_dir {
        return Err(FsOpError::NotFound(from));
    }

    // std::fs::rename replaces existing targets on unix, the collision check has to be ours.
    if fs::symlink_metadata(&to).is_ok() {
        return Err(FsOpError::AlreadyExists(to));
    }

    fs::rename(&from, &to).map_err(|e| FsOpError::io(&from, e))?;
    Ok((from, to))
}

/// Moves the file `dir/name` to the system trash.
pub fn remove_file(dir: &Path, name: impl AsRef<OsStr>) -> FsOpResult<PathBuf> {
    move_to_trash(&add_path(dir, name))
}

/// Moves the directory `dir/name` (and its contents) to the system trash.
pub fn remove_dir(dir: &Path, name: impl AsRef<OsStr>) -> FsOpResult<PathBuf> {
    move_to_trash(&add_path(dir, name))
}

fn move_to_trash(path: &Path) -> FsOpResult<PathBuf> {
    if fs::symlink_metadata(path).is_err() {
        return Err(FsOpError::NotFound(path.to_path_buf()));
    }
    trash::delete(path).map_err(|e| FsOpError::Trash {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(path.to_path_buf())
}

/// Splits a path into its parent directory and final name component.
///
/// The name is kept as the raw OS string so it still addresses the entry when it is not
/// valid UTF-8.
pub fn split_parent(path: &Path) -> Option<(PathBuf, OsString)> {
    let parent = path.parent()?;
    let name = path.file_name()?.to_os_string();
    Some((parent.to_path_buf(), name))
}

/// Path of `path` relative to `root`.
///
/// The root itself maps to ".", paths outside the root are returned unchanged.
pub fn relative_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

/// Final component of a root directory, used as its display name.
pub fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::error;
    use tempfile::tempdir;

    #[test]
    fn test_new_file_is_new_only() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        assert!(!exists(dir.path(), "a.txt"));

        let created = new_file(dir.path(), "a.txt")?;
        assert_eq!(created, dir.path().join("a.txt"));
        assert!(exists(dir.path(), "a.txt"));

        let again = new_file(dir.path(), "a.txt");
        assert!(matches!(again, Err(FsOpError::AlreadyExists(_))));
        assert!(exists(dir.path(), "a.txt"));
        Ok(())
    }

    #[test]
    fn test_new_file_keeps_existing_contents() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("notes.md"), "keep me")?;

        assert!(new_file(dir.path(), "notes.md").is_err());
        assert_eq!(fs::read_to_string(dir.path().join("notes.md"))?, "keep me");
        Ok(())
    }

    #[test]
    fn test_new_dir_does_not_create_parents() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        new_dir(dir.path(), "src")?;
        assert!(dir.path().join("src").is_dir());

        assert!(new_dir(dir.path(), "src").is_err());
        assert!(new_dir(dir.path(), "missing/child").is_err());
        Ok(())
    }

    #[test]
    fn test_rename_file_moves_name() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        new_file(dir.path(), "a.txt")?;

        let (from, to) = rename_file(dir.path(), "a.txt", "b.txt")?;
        assert_eq!(from, dir.path().join("a.txt"));
        assert_eq!(to, dir.path().join("b.txt"));
        assert!(!exists(dir.path(), "a.txt"));
        assert!(exists(dir.path(), "b.txt"));
        Ok(())
    }

    #[test]
    fn test_rename_refuses_to_overwrite() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.txt"), "a")?;
        fs::write(dir.path().join("b.txt"), "b")?;

        let res = rename_file(dir.path(), "a.txt", "b.txt");
        assert!(matches!(res, Err(FsOpError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(dir.path().join("b.txt"))?, "b");
        assert!(exists(dir.path(), "a.txt"));
        Ok(())
    }

    #[test]
    fn test_rename_to_same_name_is_a_collision() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        new_dir(dir.path(), "pkg")?;
        assert!(rename_dir(dir.path(), "pkg", "pkg").is_err());
        assert!(exists(dir.path(), "pkg"));
        Ok(())
    }

    #[test]
    fn test_rename_kind_mismatch_fails() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        new_dir(dir.path(), "pkg")?;
        assert!(rename_file(dir.path(), "pkg", "other").is_err());
        assert!(rename_dir(dir.path(), "missing", "other").is_err());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_rename_dir_through_symlink_renames_the_link() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        new_dir(dir.path(), "real")?;
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link"))?;

        // listed as a directory, so it must rename as one
        assert!(rename_file(dir.path(), "link", "other").is_err());
        let (from, to) = rename_dir(dir.path(), "link", "renamed")?;
        assert_eq!(from, dir.path().join("link"));
        assert_eq!(to, dir.path().join("renamed"));

        assert!(fs::symlink_metadata(&to)?.file_type().is_symlink());
        assert!(dir.path().join("real").is_dir());
        assert!(!exists(dir.path(), "link"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_renames_as_file() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("dangling"))?;

        rename_file(dir.path(), "dangling", "still-dangling")?;
        assert!(exists(dir.path(), "still-dangling"));
        Ok(())
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_split_parent_keeps_raw_name() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"caf\xff.txt");
        let path = Path::new("/proj").join(name);
        assert_eq!(
            split_parent(&path),
            Some((PathBuf::from("/proj"), name.to_os_string()))
        );
    }

    #[test]
    fn test_remove_missing_fails_without_touching_trash() -> Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        assert!(matches!(
            remove_file(dir.path(), "ghost.txt"),
            Err(FsOpError::NotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn test_relative_path_and_dir_name() {
        let root = Path::new("/proj");
        assert_eq!(relative_path(root, Path::new("/proj")), ".");
        assert_eq!(
            relative_path(root, Path::new("/proj/src/main.rs")),
            Path::new("src").join("main.rs").display().to_string()
        );
        assert_eq!(relative_path(root, Path::new("/other/x")), "/other/x");
        assert_eq!(dir_name(root), "proj");
    }
}
