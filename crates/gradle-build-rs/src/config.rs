//! Configuration resolution.
//!
//! Command line flags win. When a flag is absent, the GitHub Actions input
//! variables (`INPUT_BUILD-ROOT-DIRECTORY`, `INPUT_GRADLE-EXECUTABLE`,
//! `INPUT_ARGUMENTS`) are consulted before falling back to defaults.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use compiler_log::SplitMode;
use gradle_runner::GradleRunner;
use thiserror::Error;

const INPUT_BUILD_ROOT: &str = "INPUT_BUILD-ROOT-DIRECTORY";
const INPUT_EXECUTABLE: &str = "INPUT_GRADLE-EXECUTABLE";
const INPUT_ARGUMENTS: &str = "INPUT_ARGUMENTS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An argument string ends inside a quoted section.
    #[error("unbalanced quote in arguments: {0}")]
    UnbalancedQuote(String),

    /// A path could not be expanded.
    #[error("failed to expand {input}: {message}")]
    Expand { input: String, message: String },

    /// The current directory is unusable.
    #[error("current directory is not valid UTF-8")]
    CurrentDir,
}

/// Fully resolved settings for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Absolute build root.
    pub build_root: Utf8PathBuf,
    /// Explicit Gradle executable, if any.
    pub executable: Option<Utf8PathBuf>,
    /// Arguments passed to Gradle.
    pub arguments: Vec<String>,
    /// How console output is split.
    pub split_mode: SplitMode,
}

impl BuildConfig {
    /// Resolves configuration from flags and the process environment.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()
            .ok()
            .and_then(|p| Utf8PathBuf::try_from(p).ok())
            .ok_or(ConfigError::CurrentDir)?;
        Self::resolve_with(args, &cwd, |name| std::env::var(name).ok())
    }

    /// Resolves configuration with an explicit working directory and environment.
    pub fn resolve_with(
        args: &Args,
        cwd: &Utf8Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let input = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let build_root = match &args.build_root {
            Some(root) => root.clone(),
            None => input(INPUT_BUILD_ROOT)
                .map(Utf8PathBuf::from)
                .unwrap_or_else(|| Utf8PathBuf::from(".")),
        };
        let build_root = expand_path(&build_root)?;
        let build_root = if build_root.is_relative() {
            cwd.join(build_root)
        } else {
            build_root
        };

        let executable = match &args.gradle_executable {
            Some(executable) => Some(executable.clone()),
            None => input(INPUT_EXECUTABLE).map(Utf8PathBuf::from),
        };
        let executable = executable.as_deref().map(expand_path).transpose()?;

        let arguments = if !args.arguments.is_empty() {
            args.arguments.clone()
        } else {
            match input(INPUT_ARGUMENTS) {
                Some(value) => split_arguments(&value)?,
                None => Vec::new(),
            }
        };

        Ok(Self {
            build_root,
            executable,
            arguments,
            split_mode: args.split.into(),
        })
    }

    /// Creates the runner for this configuration.
    pub fn runner(&self) -> GradleRunner {
        GradleRunner::new(self.build_root.clone())
            .with_executable(self.executable.clone())
            .with_arguments(self.arguments.clone())
            .with_split_mode(self.split_mode)
    }
}

/// Expands `~` and environment variables in a path.
fn expand_path(path: &Utf8Path) -> Result<Utf8PathBuf, ConfigError> {
    shellexpand::full(path.as_str())
        .map(|expanded| Utf8PathBuf::from(expanded.as_ref()))
        .map_err(|e| ConfigError::Expand {
            input: path.to_string(),
            message: e.to_string(),
        })
}

/// Splits an argument string into words with POSIX shell quoting rules.
///
/// No expansion is performed. An unterminated quote is an error.
pub fn split_arguments(input: &str) -> Result<Vec<String>, ConfigError> {
    shell_words::split(input).map_err(|_| ConfigError::UnbalancedQuote(input.to_string()))
}
