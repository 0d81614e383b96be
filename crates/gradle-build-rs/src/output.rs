//! Output formatting.

use crate::cli::OutputFormat;
use compiler_log::{AnnotationKind, AnnotationProperties, DiagnosticSink, Stream};
use gradle_runner::BuildResult;
use serde::Serialize;
use std::io::{self, Write};

/// A formatted annotation for JSON output.
#[derive(Debug, Serialize)]
pub struct FormattedAnnotation {
    /// The annotation type (Error, Warning, Notice, Failure).
    #[serde(rename = "type")]
    pub annotation_type: String,
    /// The file path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// The start position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Position>,
    /// The end position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Position>,
    /// The message.
    pub message: String,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// Formats annotations for one output format.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats one annotation. Returns `None` for JSON, which is written at the end.
    pub fn format_annotation(
        &self,
        kind: AnnotationKind,
        message: &str,
        properties: &AnnotationProperties,
    ) -> Option<String> {
        match self.format {
            OutputFormat::Human => Some(format_human(kind, message, properties)),
            OutputFormat::Machine => Some(format_machine(kind, message, properties)),
            OutputFormat::Github => Some(format_workflow_command(kind, message, properties)),
            OutputFormat::Json => None,
        }
    }

    /// Formats the terminal failure message.
    pub fn format_failure(&self, message: &str) -> Option<String> {
        match self.format {
            OutputFormat::Human => Some(format!("Error: {}\n", message)),
            OutputFormat::Machine => Some(format!("FAILED {}\n", message)),
            OutputFormat::Github => Some(format!("::error::{}\n", escape_data(message))),
            OutputFormat::Json => None,
        }
    }

    /// Returns whether raw Gradle output is echoed.
    pub fn echoes_transcript(&self) -> bool {
        matches!(self.format, OutputFormat::Human | OutputFormat::Github)
    }
}

fn kind_label(kind: AnnotationKind) -> &'static str {
    match kind {
        AnnotationKind::Error => "Error",
        AnnotationKind::Warning => "Warning",
        AnnotationKind::Notice => "Notice",
    }
}

/// Formats as human-readable output.
fn format_human(kind: AnnotationKind, message: &str, properties: &AnnotationProperties) -> String {
    let Some(file) = &properties.file else {
        return format!("{}: {}\n", kind_label(kind), message);
    };

    let mut location = file.clone();
    if let Some(line) = properties.start_line {
        location.push_str(&format!(":{}", line));
        if let Some(column) = properties.start_column {
            location.push_str(&format!(":{}", column));
        }
    }

    format!("{}\n{}: {}\n\n", location, kind_label(kind), message.trim_start())
}

/// Formats as machine-readable output.
fn format_machine(kind: AnnotationKind, message: &str, properties: &AnnotationProperties) -> String {
    let severity = kind.as_str().to_uppercase();
    let Some(file) = &properties.file else {
        return format!("{} {}\n", severity, message);
    };

    format!(
        "{} {}:{}:{}:{}:{} {}\n",
        severity,
        file,
        properties.start_line.unwrap_or(0),
        properties.start_column.unwrap_or(0),
        properties.end_line.unwrap_or(0),
        properties.end_column.unwrap_or(0),
        message.trim_start()
    )
}

/// Formats as a GitHub Actions workflow command.
fn format_workflow_command(
    kind: AnnotationKind,
    message: &str,
    properties: &AnnotationProperties,
) -> String {
    let mut fields = Vec::new();
    if let Some(file) = &properties.file {
        fields.push(format!("file={}", escape_property(file)));
    }
    let numbers = [
        ("line", properties.start_line),
        ("endLine", properties.end_line),
        ("col", properties.start_column),
        ("endColumn", properties.end_column),
    ];
    for (key, value) in numbers {
        if let Some(value) = value {
            fields.push(format!("{}={}", key, value));
        }
    }

    if fields.is_empty() {
        format!("::{}::{}\n", kind.as_str(), escape_data(message))
    } else {
        format!(
            "::{} {}::{}\n",
            kind.as_str(),
            fields.join(","),
            escape_data(message)
        )
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Summary of a build run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Number of error annotations.
    pub error_count: usize,
    /// Number of warning annotations.
    pub warning_count: usize,
    /// Number of notice annotations.
    pub notice_count: usize,
    /// Gradle exit status.
    pub exit_code: i32,
    /// Whether the build was reported as failed.
    pub failed: bool,
    /// Whether to fail on warnings.
    pub fail_on_warnings: bool,
}

impl BuildSummary {
    /// Returns whether the process should exit with an error status.
    pub fn should_fail(&self) -> bool {
        self.failed || (self.fail_on_warnings && self.warning_count > 0)
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        let plural = |count: usize, word: &str| {
            if count == 1 {
                format!("{} {}", count, word)
            } else {
                format!("{} {}s", count, word)
            }
        };
        let status = if self.failed { "failed" } else { "succeeded" };

        format!(
            "====================================\nGradle build {} (exit status {}) with {}, {} and {}",
            status,
            self.exit_code,
            plural(self.error_count, "error"),
            plural(self.warning_count, "warning"),
            plural(self.notice_count, "notice")
        )
    }
}

/// A sink that writes annotations in the selected format.
pub struct ReportSink<O: Write, E: Write> {
    formatter: Formatter,
    format: OutputFormat,
    stdout: O,
    stderr: E,
    summary: BuildSummary,
    json: Vec<FormattedAnnotation>,
}

impl ReportSink<io::Stdout, io::Stderr> {
    /// Creates a sink writing to the process's stdout and stderr.
    pub fn stdio(format: OutputFormat, fail_on_warnings: bool) -> Self {
        Self::new(format, fail_on_warnings, io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> ReportSink<O, E> {
    /// Creates a sink over the given writers.
    pub fn new(format: OutputFormat, fail_on_warnings: bool, stdout: O, stderr: E) -> Self {
        Self {
            formatter: Formatter::new(format),
            format,
            stdout,
            stderr,
            summary: BuildSummary {
                fail_on_warnings,
                ..Default::default()
            },
            json: Vec::new(),
        }
    }

    /// Writes the trailing output and returns the summary and writers.
    pub fn finish(mut self, result: &BuildResult) -> (BuildSummary, O, E) {
        self.summary.exit_code = result.exit_code;

        if self.format == OutputFormat::Json {
            let json = serde_json::to_string_pretty(&self.json).unwrap_or_else(|_| "[]".to_string());
            let _ = writeln!(self.stdout, "{}", json);
        } else {
            let _ = writeln!(self.stdout, "{}", self.summary.format());
        }
        let _ = self.stdout.flush();
        let _ = self.stderr.flush();

        (self.summary, self.stdout, self.stderr)
    }
}

impl<O: Write, E: Write> DiagnosticSink for ReportSink<O, E> {
    fn annotate(&mut self, kind: AnnotationKind, message: &str, properties: &AnnotationProperties) {
        match kind {
            AnnotationKind::Error => self.summary.error_count += 1,
            AnnotationKind::Warning => self.summary.warning_count += 1,
            AnnotationKind::Notice => self.summary.notice_count += 1,
        }

        match self.formatter.format_annotation(kind, message, properties) {
            Some(text) => {
                let _ = self.stdout.write_all(text.as_bytes());
            }
            None => self.json.push(FormattedAnnotation {
                annotation_type: kind_label(kind).to_string(),
                filename: properties.file.clone(),
                start: properties.start_line.map(|line| Position {
                    line,
                    column: properties.start_column,
                }),
                end: properties.end_line.map(|line| Position {
                    line,
                    column: properties.end_column,
                }),
                message: message.to_string(),
            }),
        }
    }

    fn transcript(&mut self, stream: Stream, chunk: &str) {
        if !self.formatter.echoes_transcript() {
            return;
        }
        // Human output keeps annotations alone on stdout.
        let _ = match (self.format, stream) {
            (OutputFormat::Human, _) | (_, Stream::Stderr) => self.stderr.write_all(chunk.as_bytes()),
            (_, Stream::Stdout) => self.stdout.write_all(chunk.as_bytes()),
        };
    }

    fn set_failed(&mut self, message: &str) {
        self.summary.failed = true;

        match self.formatter.format_failure(message) {
            Some(text) => {
                let _ = self.stderr.write_all(text.as_bytes());
                if self.format == OutputFormat::Github {
                    let _ = self.stdout.write_all(text.as_bytes());
                }
            }
            None => self.json.push(FormattedAnnotation {
                annotation_type: "Failure".to_string(),
                filename: None,
                start: None,
                end: None,
                message: message.to_string(),
            }),
        }
    }
}
