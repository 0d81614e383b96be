//! The build scan marker file.
//!
//! Gradle writes `gradle-build-scan.txt` into the build root when a build
//! scan is published. The file is removed before every run so that a file
//! left by an earlier build is never attributed to the current one.

use crate::runner::RunnerError;
use camino::{Utf8Path, Utf8PathBuf};
use std::io;

/// Name of the marker file under the build root.
pub const BUILD_SCAN_FILENAME: &str = "gradle-build-scan.txt";

/// The marker file of one build root.
#[derive(Debug, Clone)]
pub struct BuildScanFile {
    path: Utf8PathBuf,
}

impl BuildScanFile {
    /// Returns the marker file for a build root.
    pub fn in_root(build_root: &Utf8Path) -> Self {
        Self {
            path: build_root.join(BUILD_SCAN_FILENAME),
        }
    }

    /// Returns the marker file path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Deletes the file if it exists.
    pub fn clear(&self) -> Result<(), RunnerError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path, "removed stale build scan file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(RunnerError::BuildScanClearFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Reads the file, with trailing whitespace removed.
    ///
    /// A missing file and an unreadable file are both reported as `None`.
    pub fn read(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents.trim_end().to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path, error = %e, "ignoring unreadable build scan file");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scan_file(dir: &tempfile::TempDir) -> BuildScanFile {
        let root = Utf8Path::from_path(dir.path()).unwrap();
        BuildScanFile::in_root(root)
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        assert_eq!(scan_file(&dir).read(), None);
    }

    #[test]
    fn test_read_trims_trailing_newline() {
        let dir = tempdir().unwrap();
        let file = scan_file(&dir);
        std::fs::write(file.path(), "https://scans.example/abc\n").unwrap();
        assert_eq!(file.read().as_deref(), Some("https://scans.example/abc"));
    }

    #[test]
    fn test_clear_then_read_is_absent() {
        let dir = tempdir().unwrap();
        let file = scan_file(&dir);
        std::fs::write(file.path(), "https://scans.example/stale").unwrap();

        file.clear().unwrap();
        assert!(!file.path().exists());
        assert_eq!(file.read(), None);

        // Clearing an absent file is not an error.
        file.clear().unwrap();
    }

    #[test]
    fn test_path_is_under_root() {
        let file = BuildScanFile::in_root(Utf8Path::new("/work/project"));
        assert_eq!(file.path().as_str(), "/work/project/gradle-build-scan.txt");
    }
}
