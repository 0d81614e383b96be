//! Gradle build orchestration.

use crate::build_scan::BuildScanFile;
use crate::process::{ProcessExecutor, TokioExecutor};
use crate::result::BuildResult;
use crate::wrapper::{locate_wrapper_script, resolve_explicit_executable, verify_is_executable};
use camino::{Utf8Path, Utf8PathBuf};
use compiler_log::{DiagnosticSink, LogProcessor, SplitMode, Stream};
use thiserror::Error;

/// Error types for the Gradle runner.
///
/// A build that runs and exits non-zero is not an error; it is reported
/// through [`BuildResult::failure_message`] and [`DiagnosticSink::set_failed`].
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Failed to spawn the Gradle process.
    #[error("failed to spawn gradle: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// No wrapper script under the build root.
    #[error("Gradle wrapper script not found at: {0}")]
    NotFound(Utf8PathBuf),

    /// The resolved executable lacks execute permission.
    #[error("Gradle script '{0}' is not executable.")]
    NotExecutable(Utf8PathBuf),

    /// Reading the Gradle output or waiting on the process failed.
    #[error("gradle process error: {0}")]
    ProcessFailed(String),

    /// A stale build scan file could not be removed.
    #[error("failed to remove build scan file {path}: {source}")]
    BuildScanClearFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs one Gradle build.
#[derive(Debug, Clone)]
pub struct GradleRunner {
    build_root: Utf8PathBuf,
    executable: Option<Utf8PathBuf>,
    arguments: Vec<String>,
    split_mode: SplitMode,
}

impl GradleRunner {
    /// Creates a runner for the wrapper script under `build_root`.
    pub fn new(build_root: Utf8PathBuf) -> Self {
        Self {
            build_root,
            executable: None,
            arguments: Vec::new(),
            split_mode: SplitMode::default(),
        }
    }

    /// Runs `executable` instead of the wrapper script.
    pub fn with_executable(mut self, executable: Option<Utf8PathBuf>) -> Self {
        self.executable = executable;
        self
    }

    /// Sets the arguments passed to Gradle.
    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Sets how console output is split into lines.
    pub fn with_split_mode(mut self, split_mode: SplitMode) -> Self {
        self.split_mode = split_mode;
        self
    }

    /// Returns the build root.
    pub fn build_root(&self) -> &Utf8Path {
        &self.build_root
    }

    /// Returns the arguments passed to Gradle.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Returns the build scan file of this build root.
    pub fn build_scan_file(&self) -> BuildScanFile {
        BuildScanFile::in_root(&self.build_root)
    }

    /// Resolves the program to launch, as an absolute path when possible.
    pub fn resolve_executable(&self) -> Result<Utf8PathBuf, RunnerError> {
        let executable = match &self.executable {
            Some(explicit) => resolve_explicit_executable(explicit),
            None => locate_wrapper_script(&self.build_root)?,
        };
        tracing::debug!(executable = %executable, "resolved gradle executable");

        if executable.is_relative() {
            if let Ok(cwd) = std::env::current_dir() {
                if let Ok(cwd) = Utf8PathBuf::try_from(cwd) {
                    return Ok(cwd.join(executable));
                }
            }
        }

        Ok(executable)
    }

    /// Runs the build with a real child process.
    pub async fn execute<S: DiagnosticSink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<BuildResult, RunnerError> {
        self.execute_with(&TokioExecutor, sink).await
    }

    /// Runs the build with the given process executor.
    ///
    /// Resolution and permission errors are returned before anything is
    /// launched. A non-zero exit is reported once through `sink.set_failed`
    /// and returned as an unsuccessful [`BuildResult`].
    pub async fn execute_with<E: ProcessExecutor, S: DiagnosticSink + ?Sized>(
        &self,
        executor: &E,
        sink: &mut S,
    ) -> Result<BuildResult, RunnerError> {
        let build_scan_file = self.build_scan_file();
        build_scan_file.clear()?;

        let executable = self.resolve_executable()?;
        verify_is_executable(&executable)?;

        tracing::info!(
            executable = %executable,
            args = ?self.arguments,
            cwd = %self.build_root,
            "launching gradle"
        );

        let mut processor = LogProcessor::new(self.split_mode);
        let exit_code = executor
            .run(
                &executable,
                &self.arguments,
                &self.build_root,
                &mut |stream: Stream, chunk: &str| processor.process(stream, chunk, &mut *sink),
            )
            .await?;
        processor.finish(&mut *sink);

        tracing::debug!(exit_code, "gradle exited");

        let result = BuildResult {
            exit_code,
            build_scan: build_scan_file.read(),
        };

        if let Some(build_scan) = &result.build_scan {
            tracing::info!(build_scan = %build_scan, "gradle build scan");
        }

        if let Some(message) = result.failure_message() {
            sink.set_failed(&message);
        }

        Ok(result)
    }
}
