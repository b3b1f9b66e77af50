//! Directory operations: create, list, remove, rename, move, copy.
//!
//! Each operation classifies its failure into one [`DirError`] kind so
//! callers branch on the kind, not on message text. The underlying OS error
//! is retained as the source wherever one exists.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::stat::{self, PathType};

/// Errors returned by directory operations.
#[derive(Debug, Error)]
pub enum DirError {
    /// The directory (or the source of a rename/move/copy) does not exist.
    #[error("directory not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Creation failed, including the case where the path already exists
    /// as something other than a directory.
    #[error("failed to create directory {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Enumeration of an existing directory failed.
    #[error("failed to list directory {}", .path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Recursive removal failed.
    #[error("failed to remove directory {}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Rename failed, including an already-existing destination.
    #[error("failed to rename directory {} to {}", .src.display(), .dst.display())]
    Rename {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Move failed; a cross-device move may have partially copied, which is
    /// reported here rather than hidden.
    #[error("failed to move directory {} to {}", .src.display(), .dst.display())]
    Move {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Recursive copy failed.
    #[error("failed to copy directory {} to {}", .src.display(), .dst.display())]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// `true` iff `path` exists and is a directory (a file at `path` is `false`).
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    stat::is_dir(path)
}

/// Create `path` and any missing parents.
///
/// Idempotent: an already-existing directory is a silent success. A path
/// that exists as a file (or other non-directory) is a [`DirError::Create`].
pub fn create<P: AsRef<Path>>(path: P) -> Result<(), DirError> {
    let p = path.as_ref();
    match PathType::of(p) {
        PathType::Directory => {
            debug!("directory already exists: {}", p.display());
            return Ok(());
        }
        PathType::File | PathType::Other => {
            return Err(DirError::Create {
                path: p.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                ),
            });
        }
        PathType::Missing => {}
    }
    fs::create_dir_all(p).map_err(|source| DirError::Create {
        path: p.to_path_buf(),
        source,
    })?;
    debug!("created directory {}", p.display());
    Ok(())
}

/// List the entry names directly under `path`, sorted lexicographically.
///
/// A missing path, or one that is not a directory, is [`DirError::NotFound`];
/// any other enumeration failure is [`DirError::List`].
pub fn list<P: AsRef<Path>>(path: P) -> Result<Vec<String>, DirError> {
    let p = path.as_ref();
    if !exists(p) {
        return Err(DirError::NotFound {
            path: p.to_path_buf(),
        });
    }
    let list_err = |source| DirError::List {
        path: p.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(p).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    debug!("listed {} entries in {}", names.len(), p.display());
    Ok(names)
}

/// List every file under `path` recursively, as paths relative to `path`,
/// sorted lexicographically. Directories themselves are not included.
pub fn list_recursive<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>, DirError> {
    let p = path.as_ref();
    if !exists(p) {
        return Err(DirError::NotFound {
            path: p.to_path_buf(),
        });
    }
    let list_err = |source| DirError::List {
        path: p.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in WalkDir::new(p).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| list_err(io::Error::other(e)))?;
        if entry.file_type().is_file() {
            let rel = entry
                .path()
                .strip_prefix(p)
                .map_err(|e| list_err(io::Error::other(e)))?;
            files.push(rel.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Remove `path` and all of its contents.
///
/// Idempotent: a missing path is a silent success, so callers never need an
/// existence check first. A path that is actually a file, or any OS failure
/// during the recursive removal, is [`DirError::Remove`].
pub fn remove<P: AsRef<Path>>(path: P) -> Result<(), DirError> {
    let p = path.as_ref();
    if PathType::of(p) == PathType::Missing {
        return Ok(());
    }
    fs::remove_dir_all(p).map_err(|source| DirError::Remove {
        path: p.to_path_buf(),
        source,
    })?;
    debug!("removed directory {}", p.display());
    Ok(())
}

/// Rename the directory `src` to `dst`.
///
/// The source must exist as a directory ([`DirError::NotFound`] otherwise)
/// and the destination must not exist at all ([`DirError::Rename`]).
pub fn rename<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<(), DirError> {
    let (s, d) = (src.as_ref(), dst.as_ref());
    if !exists(s) {
        return Err(DirError::NotFound {
            path: s.to_path_buf(),
        });
    }
    let rename_err = |source| DirError::Rename {
        src: s.to_path_buf(),
        dst: d.to_path_buf(),
        source,
    };
    if stat::exists(d) {
        return Err(rename_err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        )));
    }
    fs::rename(s, d).map_err(rename_err)?;
    debug!("renamed directory {} to {}", s.display(), d.display());
    Ok(())
}

/// Move the directory `src` to `dst`.
///
/// The destination may be missing or an empty directory; a file or a
/// non-empty directory at `dst` is [`DirError::Move`]. A plain `fs::rename`
/// is attempted first; when it fails (typically a cross-device move) the
/// tree is copied and the source removed. That fallback is NOT atomic: a
/// failure partway through is surfaced as [`DirError::Move`] and may leave
/// both copies on disk.
pub fn rename_into<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<(), DirError> {
    let (s, d) = (src.as_ref(), dst.as_ref());
    if !exists(s) {
        return Err(DirError::NotFound {
            path: s.to_path_buf(),
        });
    }
    let move_err = |source| DirError::Move {
        src: s.to_path_buf(),
        dst: d.to_path_buf(),
        source,
    };
    match PathType::of(d) {
        PathType::Missing => {}
        PathType::Directory => {
            let occupied = fs::read_dir(d).map_err(move_err)?.next().is_some();
            if occupied {
                return Err(move_err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "destination directory is not empty",
                )));
            }
        }
        PathType::File | PathType::Other => {
            return Err(move_err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "destination exists and is not a directory",
            )));
        }
    }
    match fs::rename(s, d) {
        Ok(()) => {
            debug!("moved directory {} to {}", s.display(), d.display());
            Ok(())
        }
        Err(e) => {
            warn!(
                "rename of {} failed ({}), falling back to copy+remove",
                s.display(),
                e
            );
            copy_tree(s, d).map_err(move_err)?;
            fs::remove_dir_all(s).map_err(move_err)?;
            Ok(())
        }
    }
}

/// Recursively copy the directory `src` to `dst`.
///
/// The destination must not already exist ([`DirError::Copy`] otherwise);
/// the source must be a directory ([`DirError::NotFound`]).
pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<(), DirError> {
    let (s, d) = (src.as_ref(), dst.as_ref());
    if !exists(s) {
        return Err(DirError::NotFound {
            path: s.to_path_buf(),
        });
    }
    let copy_err = |source| DirError::Copy {
        src: s.to_path_buf(),
        dst: d.to_path_buf(),
        source,
    };
    if stat::exists(d) {
        return Err(copy_err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        )));
    }
    copy_tree(s, d).map_err(copy_err)?;
    debug!("copied directory {} to {}", s.display(), d.display());
    Ok(())
}

/// Mirror the tree rooted at `src` into `dst`, creating `dst` as needed.
/// Regular files and directories are copied; other entry kinds (sockets,
/// device nodes) are skipped.
fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(io::Error::other)?;
        let rel = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let target = dst.join(rel);
        let ft = entry.file_type();
        if ft.is_dir() {
            fs::create_dir_all(&target)?;
        } else if ft.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            crate::file::copy_contents(entry.path(), &target)?;
        }
    }
    Ok(())
}
