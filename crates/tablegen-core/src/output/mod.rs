pub mod workspace;

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, TableGenError};

/// Write `content` to `path` atomically.
///
/// Writes to a temporary sibling file, then renames it into place, so a
/// crash mid-write leaves either the old module or the new one, never a
/// truncated file.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "module".to_string());
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let mut file = fs::File::create(&tmp_path).map_err(|e| TableGenError::Output {
        message: format!("Failed to create temp file at {}", tmp_path.display()),
        source: e,
    })?;
    file.write_all(content.as_bytes())
        .map_err(|e| TableGenError::Output {
            message: format!("Failed to write temp file at {}", tmp_path.display()),
            source: e,
        })?;
    file.sync_all().map_err(|e| TableGenError::Output {
        message: format!("Failed to sync {} to disk", tmp_path.display()),
        source: e,
    })?;

    fs::rename(&tmp_path, path).map_err(|e| TableGenError::Output {
        message: format!(
            "Failed to rename {} → {}",
            tmp_path.display(),
            path.display()
        ),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("users.ts");

        write_atomic(&path, "first\n").unwrap();
        write_atomic(&path, "second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        assert!(!dir.path().join(".users.ts.tmp").exists());
    }

    #[test]
    fn test_write_atomic_missing_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("users.ts");

        let err = write_atomic(&path, "x").unwrap_err();
        assert!(matches!(err, TableGenError::Output { .. }));
    }
}
