//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use compiler_log::SplitMode;

/// Runs a Gradle build and annotates javac and kotlinc diagnostics.
#[derive(Debug, Parser)]
#[command(name = "gradle-build-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory containing the Gradle build [default: $INPUT_BUILD-ROOT-DIRECTORY or .]
    #[arg(long = "build-root")]
    pub build_root: Option<Utf8PathBuf>,

    /// Gradle executable to run instead of the wrapper script
    #[arg(long = "gradle-executable")]
    pub gradle_executable: Option<Utf8PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// How console output is split before classification
    #[arg(long, value_enum, default_value = "tokens")]
    pub split: SplitArg,

    /// Exit with error on warnings
    #[arg(long = "fail-on-warnings")]
    pub fail_on_warnings: bool,

    /// Print debug logs to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Arguments passed to Gradle [default: $INPUT_ARGUMENTS]
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub arguments: Vec<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable (one line per annotation)
    Machine,
    /// JSON output
    Json,
    /// GitHub Actions workflow commands
    Github,
}

/// Line splitting options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum SplitArg {
    /// Split on whitespace and commas, chunk by chunk (default)
    #[default]
    Tokens,
    /// Split on newlines, reassembling lines across chunks
    Lines,
}

impl From<SplitArg> for SplitMode {
    fn from(split: SplitArg) -> Self {
        match split {
            SplitArg::Tokens => SplitMode::Tokens,
            SplitArg::Lines => SplitMode::Lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["gradle-build-rs"]);
        assert!(args.build_root.is_none());
        assert!(args.gradle_executable.is_none());
        assert!(matches!(args.output, OutputFormat::Human));
        assert_eq!(args.split, SplitArg::Tokens);
        assert!(args.arguments.is_empty());
        assert!(!args.fail_on_warnings);
    }

    #[test]
    fn test_gradle_arguments() {
        let args = Args::parse_from([
            "gradle-build-rs",
            "--build-root",
            "/path/to/project",
            "build",
            "--info",
            "-x",
            "test",
        ]);
        assert_eq!(args.build_root.unwrap().as_str(), "/path/to/project");
        assert_eq!(args.arguments, vec!["build", "--info", "-x", "test"]);
    }

    #[test]
    fn test_arguments_after_separator() {
        let args = Args::parse_from(["gradle-build-rs", "--output", "json", "--", "--version"]);
        assert!(matches!(args.output, OutputFormat::Json));
        assert_eq!(args.arguments, vec!["--version"]);
    }

    #[test]
    fn test_output_formats() {
        let args = Args::parse_from(["gradle-build-rs", "--output", "github"]);
        assert!(matches!(args.output, OutputFormat::Github));

        let args = Args::parse_from(["gradle-build-rs", "--output", "machine"]);
        assert!(matches!(args.output, OutputFormat::Machine));
    }

    #[test]
    fn test_split_mode() {
        let args = Args::parse_from(["gradle-build-rs", "--split", "lines"]);
        assert_eq!(SplitMode::from(args.split), SplitMode::Lines);
    }
}
