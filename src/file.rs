//! File operations: read, write, append, copy, rename, move, remove.
//!
//! Writes bring missing parent directories into existence through the
//! [`DirectoryProvider`] seam; everything else goes straight to the OS.
//! Failures are classified into one [`FileError`] kind per operation
//! category, with the underlying OS error kept as the source.

use std::fs::{self, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use fs_extra::file::{copy as buffered_copy, CopyOptions};
use thiserror::Error;
use tracing::{debug, warn};

use crate::dir::{self, DirError};
use crate::stat::{self, PathType};

/// Errors returned by file operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// The file (or the source of a copy/rename/move) does not exist.
    #[error("file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// Reading failed: permissions, invalid UTF-8 in text mode, or any
    /// other OS-level read failure.
    #[error("failed to read file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing failed, including a failure to create the parent directory.
    #[error("failed to write file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Copy failed, including an already-occupied destination.
    #[error("failed to copy file {} to {}", .src.display(), .dst.display())]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Rename failed, including an already-occupied destination.
    #[error("failed to rename file {} to {}", .src.display(), .dst.display())]
    Rename {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Move failed; a cross-device move may have left a partial copy at the
    /// destination, which is reported here rather than hidden.
    #[error("failed to move file {} to {}", .src.display(), .dst.display())]
    Move {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Removal failed (e.g. the path is actually a directory).
    #[error("failed to remove file {}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Capability used by [`write`]/[`append`] to bring a missing parent
/// directory into existence before the file is opened.
///
/// Production code uses [`OsDirectories`]; tests can substitute a provider
/// that refuses, to exercise the error path without touching OS permissions.
pub trait DirectoryProvider {
    fn ensure(&self, path: &Path) -> Result<(), DirError>;
}

/// Default [`DirectoryProvider`] delegating to [`dir::create`].
#[derive(Debug, Default, Clone, Copy)]
pub struct OsDirectories;

impl DirectoryProvider for OsDirectories {
    fn ensure(&self, path: &Path) -> Result<(), DirError> {
        dir::create(path)
    }
}

/// `true` iff `path` exists and is a regular file (a directory is `false`).
pub fn exists<P: AsRef<Path>>(path: P) -> bool {
    stat::is_file(path)
}

/// Read `path` as UTF-8 text.
///
/// A missing file is [`FileError::NotFound`]; invalid UTF-8 or any other
/// read failure is [`FileError::Read`].
pub fn read<P: AsRef<Path>>(path: P) -> Result<String, FileError> {
    let p = path.as_ref();
    if !exists(p) {
        return Err(FileError::NotFound {
            path: p.to_path_buf(),
        });
    }
    let text = fs::read_to_string(p).map_err(|source| FileError::Read {
        path: p.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes of text from {}", text.len(), p.display());
    Ok(text)
}

/// Read `path` as raw bytes.
pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, FileError> {
    let p = path.as_ref();
    if !exists(p) {
        return Err(FileError::NotFound {
            path: p.to_path_buf(),
        });
    }
    fs::read(p).map_err(|source| FileError::Read {
        path: p.to_path_buf(),
        source,
    })
}

/// Write `contents` to `path`, truncating any previous contents and creating
/// missing parent directories via [`OsDirectories`].
pub fn write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<(), FileError> {
    write_with(&OsDirectories, path, contents, false)
}

/// Append `contents` to the end of `path`, creating the file (and missing
/// parent directories) if needed.
pub fn append<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<(), FileError> {
    write_with(&OsDirectories, path, contents, true)
}

/// Write through an explicit [`DirectoryProvider`].
///
/// `append` selects add-to-end mode; otherwise the file is truncated. Any
/// provider failure is re-wrapped as [`FileError::Write`] with the provider
/// error retained as the source.
pub fn write_with<D, P, C>(dirs: &D, path: P, contents: C, append: bool) -> Result<(), FileError>
where
    D: DirectoryProvider,
    P: AsRef<Path>,
    C: AsRef<[u8]>,
{
    let p = path.as_ref();
    let write_err = |source| FileError::Write {
        path: p.to_path_buf(),
        source,
    };
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() && !dir::exists(parent) {
            debug!("creating missing parent {} for write", parent.display());
            dirs.ensure(parent)
                .map_err(|e| write_err(io::Error::other(e)))?;
        }
    }
    let mut open = OpenOptions::new();
    if append {
        open.append(true).create(true);
    } else {
        open.write(true).create(true).truncate(true);
    }
    let mut f = open.open(p).map_err(write_err)?;
    f.write_all(contents.as_ref()).map_err(write_err)?;
    debug!(
        "wrote {} bytes to {} (append={})",
        contents.as_ref().len(),
        p.display(),
        append
    );
    Ok(())
}

/// Copy the file `src` to `dst`.
///
/// The source must be a regular file ([`FileError::NotFound`] otherwise)
/// and the destination must not exist, whether as a file or a directory
/// ([`FileError::Copy`]).
pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<(), FileError> {
    let (s, d) = (src.as_ref(), dst.as_ref());
    if !exists(s) {
        return Err(FileError::NotFound {
            path: s.to_path_buf(),
        });
    }
    let copy_err = |source| FileError::Copy {
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
    copy_contents(s, d).map_err(copy_err)?;
    debug!("copied file {} to {}", s.display(), d.display());
    Ok(())
}

/// Rename the file `src` to `dst`. The destination must not exist.
pub fn rename<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<(), FileError> {
    let (s, d) = (src.as_ref(), dst.as_ref());
    if !exists(s) {
        return Err(FileError::NotFound {
            path: s.to_path_buf(),
        });
    }
    let rename_err = |source| FileError::Rename {
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
    debug!("renamed file {} to {}", s.display(), d.display());
    Ok(())
}

/// Move the file `src` to `dst`.
///
/// A directory at `dst` is [`FileError::Move`] and leaves the source
/// untouched. A plain `fs::rename` is attempted first; when it fails
/// (typically a cross-device move) the contents are copied and the source
/// removed. The fallback is NOT atomic: a failure after the copy step is
/// surfaced as [`FileError::Move`] and may leave both copies on disk.
pub fn rename_into<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Result<(), FileError> {
    let (s, d) = (src.as_ref(), dst.as_ref());
    if !exists(s) {
        return Err(FileError::NotFound {
            path: s.to_path_buf(),
        });
    }
    let move_err = |source| FileError::Move {
        src: s.to_path_buf(),
        dst: d.to_path_buf(),
        source,
    };
    if stat::is_dir(d) {
        return Err(move_err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination is an existing directory",
        )));
    }
    match fs::rename(s, d) {
        Ok(()) => {
            debug!("moved file {} to {}", s.display(), d.display());
            Ok(())
        }
        Err(e) => {
            warn!(
                "rename of {} failed ({}), falling back to copy+remove",
                s.display(),
                e
            );
            copy_contents(s, d).map_err(move_err)?;
            fs::remove_file(s).map_err(move_err)?;
            Ok(())
        }
    }
}

/// Remove the file at `path`.
///
/// Idempotent: a missing path is a silent success. A path that is actually
/// a directory, or any other OS failure, is [`FileError::Remove`].
pub fn remove<P: AsRef<Path>>(path: P) -> Result<(), FileError> {
    let p = path.as_ref();
    if PathType::of(p) == PathType::Missing {
        return Ok(());
    }
    fs::remove_file(p).map_err(|source| FileError::Remove {
        path: p.to_path_buf(),
        source,
    })?;
    debug!("removed file {}", p.display());
    Ok(())
}

/// Copy a single file's contents with a 64 KiB buffer. Shared with the
/// directory tree mirror in [`crate::dir`].
pub(crate) fn copy_contents(src: &Path, dst: &Path) -> io::Result<()> {
    let mut options = CopyOptions::new();
    options.overwrite = false;
    options.buffer_size = 64 * 1024;
    buffered_copy(src, dst, &options)
        .map(|_| ())
        .map_err(io::Error::other)
}
