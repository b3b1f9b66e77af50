//! Stateless filesystem and YAML helpers with typed errors.
//!
//! Three small façades layered leaves-first: [`dir`] wraps directory
//! operations, [`file`] wraps file operations (delegating parent-directory
//! creation to `dir` through the [`file::DirectoryProvider`] seam), and
//! [`yaml`] loads and dumps serde-representable values through `file`.
//!
//! Every operation either returns its success value or fails with exactly
//! one typed error from the owning module's error enum; underlying OS and
//! codec errors are classified once at the operation boundary and kept as
//! sources, never allowed to escape untyped. There is no retry logic and no
//! in-process locking: calls are synchronous, single-attempt, and race at
//! the mercy of the underlying filesystem.

pub mod dir;
pub mod file;
pub mod stat;
pub mod yaml;

pub use crate::dir::DirError;
pub use crate::file::{DirectoryProvider, FileError, OsDirectories};
pub use crate::stat::PathType;
pub use crate::yaml::YamlError;
