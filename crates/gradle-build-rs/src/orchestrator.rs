//! Main orchestration logic.

use crate::cli::Args;
use crate::config::{BuildConfig, ConfigError};
use crate::output::{BuildSummary, ReportSink};
use camino::Utf8PathBuf;
use gradle_runner::RunnerError;
use miette::Diagnostic;
use thiserror::Error;

/// Orchestration errors.
#[derive(Debug, Error, Diagnostic)]
pub enum OrchestratorError {
    /// Invalid configuration.
    #[error(transparent)]
    #[diagnostic(code(gradle_build_rs::config))]
    Config(#[from] ConfigError),

    /// No wrapper script and no explicit executable.
    #[error("Gradle wrapper script not found at: {0}")]
    #[diagnostic(
        code(gradle_build_rs::wrapper_not_found),
        help("add the Gradle wrapper to the build root or pass --gradle-executable")
    )]
    WrapperNotFound(Utf8PathBuf),

    /// The Gradle executable can't be run.
    #[error("Gradle script '{0}' is not executable.")]
    #[diagnostic(
        code(gradle_build_rs::not_executable),
        help("mark the script executable, e.g. `chmod +x gradlew`")
    )]
    NotExecutable(Utf8PathBuf),

    /// Gradle could not be run to completion.
    #[error("gradle error: {0}")]
    #[diagnostic(code(gradle_build_rs::gradle))]
    Gradle(RunnerError),
}

impl From<RunnerError> for OrchestratorError {
    fn from(error: RunnerError) -> Self {
        match error {
            RunnerError::NotFound(path) => OrchestratorError::WrapperNotFound(path),
            RunnerError::NotExecutable(path) => OrchestratorError::NotExecutable(path),
            other => OrchestratorError::Gradle(other),
        }
    }
}

/// Runs the build and reports its output.
pub async fn run(args: Args) -> Result<BuildSummary, OrchestratorError> {
    let config = BuildConfig::resolve(&args)?;
    tracing::debug!(?config, "resolved configuration");

    let runner = config.runner();
    let mut sink = ReportSink::stdio(args.output, args.fail_on_warnings);
    let result = runner.execute(&mut sink).await?;

    let (summary, _, _) = sink.finish(&result);
    Ok(summary)
}
