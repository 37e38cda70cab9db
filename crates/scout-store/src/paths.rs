//! Atomic file write helpers.

use anyhow::{anyhow, Result};
use std::path::Path;

/// Ensure all parent directories exist for a path.
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| anyhow!("Failed to create directory {}: {}", parent.display(), e))?;
        }
    }
    Ok(())
}

/// Write a file atomically (write to .tmp, then rename). A crash mid-write
/// leaves the previous artifact untouched.
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent_dirs(path)?;
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|s| s.to_str()).unwrap_or("tmp")
    ));
    std::fs::write(&tmp_path, contents)
        .map_err(|e| anyhow!("Failed to write temp file {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        anyhow!(
            "Failed to rename {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        )
    })?;
    Ok(())
}

/// Write a JSON file atomically (compact format, no pretty printing).
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec(value).map_err(|e| anyhow!("Failed to serialize JSON: {}", e))?;
    atomic_write(path, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parents() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested/deep/file.json");
        atomic_write(&path, b"{}")?;
        assert_eq!(std::fs::read(&path)?, b"{}");
        Ok(())
    }

    #[test]
    fn test_atomic_write_replaces_existing() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("file.json");
        atomic_write(&path, b"old")?;
        atomic_write(&path, b"new")?;
        assert_eq!(std::fs::read(&path)?, b"new");
        Ok(())
    }
}
