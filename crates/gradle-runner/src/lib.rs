//! Gradle build runner.
//!
//! Launches Gradle (an explicit executable or the `gradlew` wrapper under the
//! build root), streams its console output through [`compiler_log`], and
//! decides the build outcome from the exit status and the
//! `gradle-build-scan.txt` file Gradle may leave behind.
//!
//! # Example
//!
//! ```ignore
//! use camino::Utf8PathBuf;
//! use compiler_log::{MemorySink, SplitMode};
//! use gradle_runner::GradleRunner;
//!
//! #[tokio::main]
//! async fn main() {
//!     let runner = GradleRunner::new(Utf8PathBuf::from("/path/to/project"))
//!         .with_arguments(vec!["build".to_string()])
//!         .with_split_mode(SplitMode::Lines);
//!
//!     let mut sink = MemorySink::new();
//!     let result = runner.execute(&mut sink).await.unwrap();
//!
//!     if let Some(message) = result.failure_message() {
//!         eprintln!("{}", message);
//!     }
//! }
//! ```

mod build_scan;
mod process;
mod result;
mod runner;
mod wrapper;

pub use build_scan::{BuildScanFile, BUILD_SCAN_FILENAME};
pub use process::{ProcessExecutor, TokioExecutor};
pub use result::BuildResult;
pub use runner::{GradleRunner, RunnerError};
pub use wrapper::{locate_wrapper_script, resolve_explicit_executable, verify_is_executable, WRAPPER_SCRIPT};
