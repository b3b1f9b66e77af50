//! YAML load/dump for serde-representable values.
//!
//! Both directions go through [`crate::file`], so a missing file surfaces as
//! `YamlError::File(FileError::NotFound)` and dumping inherits the file
//! layer's parent auto-creation and truncate-on-write semantics. Codec
//! failures are classified separately from I/O failures.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::file::{self, FileError};

/// Errors returned by YAML operations.
#[derive(Debug, Error)]
pub enum YamlError {
    /// An underlying file operation failed; a missing file on load shows up
    /// here as `File(FileError::NotFound)`.
    #[error(transparent)]
    File(#[from] FileError),

    /// The file exists but its content is not well-formed YAML (or does not
    /// match the requested type).
    #[error("invalid YAML in {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The value cannot be represented by the YAML codec.
    #[error("failed to serialize YAML for {}", .path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Load the YAML document at `path` into any deserializable type.
///
/// Use `serde_yaml_ng::Value` as `T` when the shape is not known up front.
pub fn load<T, P>(path: P) -> Result<T, YamlError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let p = path.as_ref();
    let text = file::read(p)?;
    let value = serde_yaml_ng::from_str(&text).map_err(|source| YamlError::Parse {
        path: p.to_path_buf(),
        source,
    })?;
    debug!("loaded YAML document from {}", p.display());
    Ok(value)
}

/// Serialize `value` to YAML text and write it to `path`, overwriting any
/// previous contents and creating missing parent directories.
pub fn dump<T, P>(path: P, value: &T) -> Result<(), YamlError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let p = path.as_ref();
    let text = serde_yaml_ng::to_string(value).map_err(|source| YamlError::Serialize {
        path: p.to_path_buf(),
        source,
    })?;
    file::write(p, text)?;
    debug!("dumped YAML document to {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_yaml_ng::Value;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        name: String,
        retries: u32,
        targets: Vec<String>,
    }

    #[test]
    fn typed_roundtrip() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("settings.yaml");
        let original = Settings {
            name: "staging".into(),
            retries: 3,
            targets: vec!["alpha".into(), "beta".into()],
        };
        dump(&p, &original).unwrap();
        let loaded: Settings = load(&p).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn untyped_roundtrip_preserves_structure() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("tree.yaml");
        let mut map = BTreeMap::new();
        map.insert("numbers".to_string(), vec![1i64, 2, 3]);
        dump(&p, &map).unwrap();
        let value: Value = load(&p).unwrap();
        assert_eq!(value["numbers"][2], Value::from(3));
    }

    #[test]
    fn missing_file_is_the_not_found_kind() {
        let tmp = tempdir().unwrap();
        let res: Result<Value, _> = load(tmp.path().join("absent.yaml"));
        match res {
            Err(YamlError::File(FileError::NotFound { .. })) => {}
            other => panic!("expected File(NotFound), got {:?}", other),
        }
    }

    #[test]
    fn malformed_yaml_is_the_parse_kind() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("broken.yaml");
        file::write(&p, "key: [unclosed").unwrap();
        let res: Result<Value, _> = load(&p);
        assert!(matches!(res, Err(YamlError::Parse { .. })));
    }

    #[test]
    fn dump_creates_parent_directories() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("conf/deep/app.yaml");
        dump(&p, &BTreeMap::from([("on", true)])).unwrap();
        assert!(p.is_file());
    }
}
