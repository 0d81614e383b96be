//! Build outcome.

/// The outcome of one Gradle invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Exit status of the Gradle process; -1 if it was killed by a signal.
    pub exit_code: i32,
    /// Contents of the build scan file, if Gradle wrote one.
    pub build_scan: Option<String>,
}

impl BuildResult {
    /// Returns true if Gradle exited with status 0.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the message to report for a failed build.
    pub fn failure_message(&self) -> Option<String> {
        if self.succeeded() {
            return None;
        }

        let message = match self.build_scan.as_deref().filter(|scan| !scan.is_empty()) {
            Some(scan) => format!("Gradle build failed: {}", scan),
            None => format!(
                "Gradle build failed: process exited with status {}",
                self.exit_code
            ),
        };
        Some(message)
    }
}
