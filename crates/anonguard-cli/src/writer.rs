use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

pub fn report_file_name(timestamp: &str, extension: &str) -> String {
    format!("deidentification_{}.{}", timestamp, extension)
}

/// Resolve where a report goes.
///
/// An existing directory, or a path ending with a separator, receives
/// `deidentification_{timestamp}.{extension}`. Anything else is taken as the
/// file itself, with missing parent directories created.
pub fn resolve_file_path(path: &Path, timestamp: &str, extension: &str) -> Result<PathBuf> {
    let filename = report_file_name(timestamp, extension);

    if path.exists() {
        return Ok(if path.is_dir() {
            path.join(&filename)
        } else {
            path.to_path_buf()
        });
    }

    let raw = path.to_string_lossy();
    if raw.ends_with('/') || raw.ends_with('\\') {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        return Ok(path.join(filename));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    Ok(path.to_path_buf())
}

/// Directory for a report with no configured location, created if needed.
pub fn default_report_path(dir: &Path, timestamp: &str, extension: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    Ok(dir.join(report_file_name(timestamp, extension)))
}

pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TS: &str = "20251022-153045";

    #[test]
    fn test_existing_directory_gets_default_name() {
        let temp_dir = TempDir::new().unwrap();
        let result = resolve_file_path(temp_dir.path(), TS, "md").unwrap();

        assert_eq!(
            result.file_name().unwrap(),
            "deidentification_20251022-153045.md"
        );
        assert!(result.starts_with(temp_dir.path()));
    }

    #[test]
    fn test_existing_file_is_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("report.json");
        fs::write(&file_path, "old").unwrap();

        let result = resolve_file_path(&file_path, TS, "json").unwrap();
        assert_eq!(result, file_path);
    }

    #[test]
    fn test_trailing_slash_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let new_dir = temp_dir.path().join("reports/");

        let result = resolve_file_path(&new_dir, TS, "json").unwrap();

        assert!(temp_dir.path().join("reports").is_dir());
        assert_eq!(
            result.file_name().unwrap(),
            "deidentification_20251022-153045.json"
        );
    }

    #[test]
    fn test_new_file_creates_parent() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("k5.md");

        let result = resolve_file_path(&file_path, TS, "md").unwrap();

        assert_eq!(result, file_path);
        assert!(temp_dir.path().join("nested").is_dir());
        assert!(!file_path.exists());
    }

    #[test]
    fn test_default_report_path_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("out");

        let result = default_report_path(&dir, TS, "json").unwrap();

        assert!(dir.is_dir());
        assert_eq!(result, dir.join("deidentification_20251022-153045.json"));
    }

    #[test]
    fn test_write_report() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.md");
        write_report(&path, "# Report\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Report\n");
    }
}
