// dqi-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Write `content` to `path` through a temporary sibling file, creating
/// missing parent directories. Readers see the old file or the new one,
/// never a partial write.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    // Same directory as the target so the rename stays on one filesystem
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file.write_all(b"\n")?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// Pretty-printed JSON document, written atomically.
pub fn write_json<P: AsRef<Path>, T: Serialize>(
    path: P,
    value: &T,
) -> Result<(), InfrastructureError> {
    let body = serde_json::to_string_pretty(value)?;
    atomic_write(path, body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write_creates_parents() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("target").join("report_card.json");

        atomic_write(&file_path, "{}")?;

        assert_eq!(fs::read_to_string(file_path)?, "{}\n");
        Ok(())
    }

    #[test]
    fn test_write_json_overwrites_existing() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("report.json");

        atomic_write(&file_path, "Initial")?;
        write_json(&file_path, &serde_json::json!({ "grade": "B" }))?;

        let read_content = fs::read_to_string(file_path)?;
        assert_eq!(read_content, "{\n  \"grade\": \"B\"\n}\n");
        Ok(())
    }
}
