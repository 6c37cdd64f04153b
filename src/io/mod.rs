//! File system access of the driver binary.
//!
//! The rewrite core never touches the file system; these helpers read and
//! write the JSON-serialized syntax trees the binary operates on.

pub mod output;
pub mod walker;

use crate::core::CompilationUnit;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Load a compilation unit exactly as serialized
pub fn read_unit(path: &Path) -> Result<CompilationUnit> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a serialized compilation unit", path.display()))
}

pub fn write_unit(path: &Path, unit: &CompilationUnit) -> Result<()> {
    let json = serde_json::to_string_pretty(unit)?;
    write_file(path, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::jmock_class_builder;
    use tempfile::TempDir;

    #[test]
    fn test_unit_survives_a_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("ListTest.json");
        let unit = jmock_class_builder().unit();

        write_unit(&path, &unit).unwrap();
        let loaded = read_unit(&path).unwrap();

        assert_eq!(loaded, unit);
    }

    #[test]
    fn test_unit_without_path_is_written_without_one() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ListTest.json");
        write_unit(&path, &jmock_class_builder().unit()).unwrap();

        let loaded = read_unit(&path).unwrap();
        assert_eq!(loaded.path, None);
        let raw: serde_json::Value = serde_json::from_str(&read_file(&path).unwrap()).unwrap();
        assert!(raw.get("path").is_none());
    }

    #[test]
    fn test_read_unit_reports_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let error = read_unit(&path).unwrap_err();
        assert!(error.to_string().contains("broken.json"));
    }
}
