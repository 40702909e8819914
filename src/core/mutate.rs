//! Mutation orchestrator for canopy.
//!
//! Turns a confirmed dialog (or an unconfirmed removal) into a path utility call and, iff
//! that call succeeds, into exactly one [FsEvent]. Failures are swallowed: no event, no retry,
//! just a debug log line. The live tree is the user's feedback.

use crate::core::events::{EventBus, FsEvent};
use crate::core::paths::{self, FsOpResult, add_path};

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// The six mutations, each with the location it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateFile { parent: PathBuf },
    CreateDir { parent: PathBuf },
    RenameFile { parent: PathBuf, name: OsString },
    RenameDir { parent: PathBuf, name: OsString },
    RemoveFile { path: PathBuf },
    RemoveDir { path: PathBuf },
}

impl Mutation {
    #[inline]
    pub fn is_removal(&self) -> bool {
        matches!(self, Mutation::RemoveFile { .. } | Mutation::RemoveDir { .. })
    }

    /// True for mutations that need a name typed by the user.
    #[inline]
    pub fn needs_name(&self) -> bool {
        !self.is_removal()
    }

    /// True when the mutation acts on a file rather than a directory.
    #[inline]
    pub fn targets_file(&self) -> bool {
        matches!(
            self,
            Mutation::CreateFile { .. } | Mutation::RenameFile { .. } | Mutation::RemoveFile { .. }
        )
    }

    /// Directory whose namespace the mutation works in.
    pub fn parent_dir(&self) -> Option<&Path> {
        match self {
            Mutation::CreateFile { parent }
            | Mutation::CreateDir { parent }
            | Mutation::RenameFile { parent, .. }
            | Mutation::RenameDir { parent, .. } => Some(parent),
            Mutation::RemoveFile { path } | Mutation::RemoveDir { path } => path.parent(),
        }
    }
}

/// A mutation waiting on a dialog, tied to the root it was started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation {
    pub root: usize,
    pub mutation: Mutation,
}

impl PendingOperation {
    pub fn new(root: usize, mutation: Mutation) -> Self {
        Self { root, mutation }
    }
}

/// The filesystem calls behind each mutation.
///
/// [OsFileOps] is the real implementation. The seam exists so hosts can redirect removals
/// (e.g. to permanent deletion) and so tests avoid the user's trash.
///
/// Names of existing entries arrive as raw OS strings, new names as typed text.
pub trait FileOps {
    fn new_file(&self, dir: &Path, name: &str) -> FsOpResult<PathBuf>;
    fn new_dir(&self, dir: &Path, name: &str) -> FsOpResult<PathBuf>;
    fn rename_file(&self, dir: &Path, old: &OsStr, new: &str) -> FsOpResult<(PathBuf, PathBuf)>;
    fn rename_dir(&self, dir: &Path, old: &OsStr, new: &str) -> FsOpResult<(PathBuf, PathBuf)>;
    fn remove_file(&self, dir: &Path, name: &OsStr) -> FsOpResult<PathBuf>;
    fn remove_dir(&self, dir: &Path, name: &OsStr) -> FsOpResult<PathBuf>;
}

/// [FileOps] over the real filesystem, removals go to the system trash.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileOps;

impl FileOps for OsFileOps {
    fn new_file(&self, dir: &Path, name: &str) -> FsOpResult<PathBuf> {
        paths::new_file(dir, name)
    }

    fn new_dir(&self, dir: &Path, name: &str) -> FsOpResult<PathBuf> {
        paths::new_dir(dir, name)
    }

    fn rename_file(&self, dir: &Path, old: &OsStr, new: &str) -> FsOpResult<(PathBuf, PathBuf)> {
        paths::rename_file(dir, old, new)
    }

    fn rename_dir(&self, dir: &Path, old: &OsStr, new: &str) -> FsOpResult<(PathBuf, PathBuf)> {
        paths::rename_dir(dir, old, new)
    }

    fn remove_file(&self, dir: &Path, name: &OsStr) -> FsOpResult<PathBuf> {
        paths::remove_file(dir, name)
    }

    fn remove_dir(&self, dir: &Path, name: &OsStr) -> FsOpResult<PathBuf> {
        paths::remove_dir(dir, name)
    }
}

/// Runs mutations and reports successes on the event bus.
pub struct Mutator {
    ops: Box<dyn FileOps>,
}

impl Mutator {
    pub fn new(ops: Box<dyn FileOps>) -> Self {
        Self { ops }
    }

    /// Applies `mutation`. `name` is the user's input for create/rename and ignored for
    /// removals. Returns the emitted event, if any.
    pub fn apply(
        &self,
        mutation: &Mutation,
        name: Option<&str>,
        events: &mut EventBus,
    ) -> Option<FsEvent> {
        let result = self.run(mutation, name);
        match result {
            Ok(event) => {
                events.emit(event.clone());
                Some(event)
            }
            Err(reason) => {
                tracing::debug!("{:?} failed: {}", mutation, reason);
                None
            }
        }
    }

    fn run(&self, mutation: &Mutation, name: Option<&str>) -> Result<FsEvent, String> {
        let need_name = || match name {
            Some(n) if !n.is_empty() => Ok(n),
            _ => Err("empty name".to_string()),
        };

        let event = match mutation {
            Mutation::CreateFile { parent } => {
                FsEvent::FileCreated(self.ops.new_file(parent, need_name()?).map_err(str_err)?)
            }
            Mutation::CreateDir { parent } => {
                FsEvent::DirCreated(self.ops.new_dir(parent, need_name()?).map_err(str_err)?)
            }
            Mutation::RenameFile { parent, name: old } => {
                let (from, to) = self
                    .ops
                    .rename_file(parent, old, need_name()?)
                    .map_err(str_err)?;
                FsEvent::FileRenamed { from, to }
            }
            Mutation::RenameDir { parent, name: old } => {
                let (from, to) = self
                    .ops
                    .rename_dir(parent, old, need_name()?)
                    .map_err(str_err)?;
                FsEvent::DirRenamed { from, to }
            }
            Mutation::RemoveFile { path } => {
                let (dir, name) = paths::split_parent(path).ok_or("no parent")?;
                FsEvent::FileRemoved(self.ops.remove_file(&dir, &name).map_err(str_err)?)
            }
            Mutation::RemoveDir { path } => {
                let (dir, name) = paths::split_parent(path).ok_or("no parent")?;
                FsEvent::DirRemoved(self.ops.remove_dir(&dir, &name).map_err(str_err)?)
            }
        };
        Ok(event)
    }

    /// Full path a create/rename would produce for `name`.
    pub fn prospective_path(mutation: &Mutation, name: &str) -> Option<PathBuf> {
        mutation
            .needs_name()
            .then(|| mutation.parent_dir().map(|dir| add_path(dir, name)))
            .flatten()
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new(Box::new(OsFileOps))
    }
}

fn str_err(e: paths::FsOpError) -> String {
    e.to_string()
}
