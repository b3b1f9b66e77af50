use std::fs;

use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use tempfile::tempdir;

use fskit::{file, yaml, FileError, YamlError};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Manifest {
    name: String,
    version: String,
    enabled: bool,
    limits: Limits,
    tags: Vec<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Limits {
    max_items: u64,
    ratio: f64,
}

fn sample_manifest() -> Manifest {
    Manifest {
        name: "fixture".into(),
        version: "1.2.3".into(),
        enabled: true,
        limits: Limits {
            max_items: 500,
            ratio: 0.75,
        },
        tags: vec!["one".into(), "two".into()],
    }
}

#[test]
fn dump_then_load_is_deep_equal() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let p = tmp.path().join("manifest.yaml");

    let original = sample_manifest();
    yaml::dump(&p, &original)?;
    let loaded: Manifest = yaml::load(&p)?;

    assert_eq!(loaded, original);
    Ok(())
}

// Dumping inherits the file layer's parent auto-creation, so a deeply nested
// destination works without any directory setup.
#[test]
fn dump_into_missing_directories() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let p = tmp.path().join("conf/env/prod/manifest.yaml");

    yaml::dump(&p, &sample_manifest())?;
    assert!(file::exists(&p));

    let loaded: Manifest = yaml::load(&p)?;
    assert_eq!(loaded.limits.max_items, 500);
    Ok(())
}

#[test]
fn load_missing_file_is_the_not_found_kind() {
    let tmp = tempdir().unwrap();
    let res: Result<Value, _> = yaml::load(tmp.path().join("absent.yaml"));
    match res {
        Err(YamlError::File(FileError::NotFound { .. })) => {}
        other => panic!("expected File(NotFound), got {:?}", other),
    }
}

#[test]
fn load_invalid_yaml_is_the_parse_kind() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let p = tmp.path().join("broken.yaml");
    fs::write(&p, "mapping: {nested: [a, b\n  dangling")?;

    let res: Result<Value, _> = yaml::load(&p);
    match res {
        Err(YamlError::Parse { .. }) => {}
        other => panic!("expected Parse error, got {:?}", other),
    }
    Ok(())
}

// A document written by hand loads into a generic Value tree whose scalars,
// sequences and mappings all come back intact.
#[test]
fn untyped_tree_survives_the_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempdir()?;
    let p = tmp.path().join("tree.yaml");
    fs::write(
        &p,
        "title: example\ncount: 4\npi: 3.5\nflag: false\nempty: null\nitems:\n  - a\n  - b\n",
    )?;

    let value: Value = yaml::load(&p)?;
    let back = tmp.path().join("tree_copy.yaml");
    yaml::dump(&back, &value)?;
    let reloaded: Value = yaml::load(&back)?;

    assert_eq!(reloaded, value);
    assert_eq!(reloaded["count"], Value::from(4));
    assert_eq!(reloaded["items"][1], Value::from("b"));
    Ok(())
}
