//! Gradle executable resolution.

use crate::runner::RunnerError;
use camino::{Utf8Path, Utf8PathBuf};

/// File name of the Gradle wrapper script.
#[cfg(windows)]
pub const WRAPPER_SCRIPT: &str = "gradlew.bat";
/// File name of the Gradle wrapper script.
#[cfg(not(windows))]
pub const WRAPPER_SCRIPT: &str = "gradlew";

/// Finds the wrapper script directly under the build root.
pub fn locate_wrapper_script(build_root: &Utf8Path) -> Result<Utf8PathBuf, RunnerError> {
    let script = build_root.join(WRAPPER_SCRIPT);
    if script.is_file() {
        Ok(script)
    } else {
        Err(RunnerError::NotFound(script))
    }
}

/// Resolves an executable given by the caller.
///
/// Paths with a directory component, or that exist relative to the current
/// directory, are used as they are. Bare names are looked up on `PATH`.
pub fn resolve_explicit_executable(executable: &Utf8Path) -> Utf8PathBuf {
    if executable.components().count() > 1 || executable.exists() {
        return executable.to_owned();
    }

    match which::which(executable.as_str()) {
        Ok(path) => Utf8PathBuf::try_from(path).unwrap_or_else(|_| executable.to_owned()),
        Err(_) => executable.to_owned(),
    }
}

/// Fails with [`RunnerError::NotExecutable`] unless `path` is a runnable file.
pub fn verify_is_executable(path: &Utf8Path) -> Result<(), RunnerError> {
    let not_executable = || RunnerError::NotExecutable(path.to_owned());

    let metadata = std::fs::metadata(path).map_err(|_| not_executable())?;
    if !metadata.is_file() {
        return Err(not_executable());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 == 0 {
            return Err(not_executable());
        }
    }

    Ok(())
}
