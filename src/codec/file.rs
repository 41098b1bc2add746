use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use super::{Decoded, decode_str, encode};
use crate::domain::ShapeSet;

/// Read and decode a persisted document
///
/// Nothing is returned until the whole document has decoded, so a failure
/// leaves whatever the caller currently holds untouched.
pub fn load(path: &Path) -> Result<Decoded> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;

    decode_str(&contents).with_context(|| format!("Failed to decode document: {}", path.display()))
}

/// Encode and write a document atomically
///
/// The JSON goes to a temporary file next to `path` which is then renamed
/// over it, so readers see either the old document or the new one.
pub fn save(path: &Path, set: &ShapeSet, circle_count: u64, earned_reward: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, &encode(set, circle_count, earned_reward))
            .context("Failed to serialize document")?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    tmp.persist(path)
        .with_context(|| format!("Failed to write document: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zones.json");

        let mut set = ShapeSet::new();
        set.add_circle((40.7128, -74.006), 250.0, true).unwrap();
        set.add_marker(40.71, -74.0).unwrap();

        save(&path, &set, 1, true).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.shapes, set);
        assert_eq!(loaded.circle_count, 1);
        assert!(loaded.earned_reward);
    }

    #[test]
    fn test_save_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zones.json");

        let mut set = ShapeSet::new();
        set.add_circle((1.0, 1.0), 10.0, true).unwrap();
        save(&path, &set, 1, false).unwrap();

        set.add_circle((2.0, 2.0), 10.0, false).unwrap();
        save(&path, &set, 2, false).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.shapes.circles().len(), 2);
        assert_eq!(loaded.circle_count, 2);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_load_failures() {
        let dir = tempdir().unwrap();

        assert!(load(&dir.path().join("missing.json")).is_err());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"type": "Feature"}"#).unwrap();
        let err = load(&bad).unwrap_err();
        assert!(err.to_string().contains("Failed to decode document"));
    }
}
