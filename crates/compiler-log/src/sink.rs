//! Host reporting interface.

use crate::diagnostic::Severity;
use crate::splitter::Stream;
use serde::Serialize;

/// The three annotation kinds a host can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Error,
    Warning,
    Notice,
}

impl From<Severity> for AnnotationKind {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => AnnotationKind::Error,
            Severity::Warning => AnnotationKind::Warning,
            Severity::Notice => AnnotationKind::Notice,
        }
    }
}

impl AnnotationKind {
    /// Returns the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Error => "error",
            AnnotationKind::Warning => "warning",
            AnnotationKind::Notice => "notice",
        }
    }
}

/// Source location attached to an annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationProperties {
    pub file: Option<String>,
    pub start_line: Option<u32>,
    pub end_line: Option<u32>,
    pub start_column: Option<u32>,
    pub end_column: Option<u32>,
}

impl AnnotationProperties {
    /// Returns true if no location is attached.
    pub fn is_unlocated(&self) -> bool {
        self.file.is_none() && self.start_line.is_none() && self.start_column.is_none()
    }
}

/// Receives everything a build reports.
///
/// `annotate` carries classified diagnostics and unclassified stderr lines,
/// `transcript` carries the raw child output, and `set_failed` is called at
/// most once per build with the terminal failure message.
pub trait DiagnosticSink {
    /// Reports one annotation.
    fn annotate(&mut self, kind: AnnotationKind, message: &str, properties: &AnnotationProperties);

    /// Receives a raw chunk of child output before it is classified.
    fn transcript(&mut self, _stream: Stream, _chunk: &str) {}

    /// Marks the build as failed.
    fn set_failed(&mut self, message: &str);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn annotate(&mut self, kind: AnnotationKind, message: &str, properties: &AnnotationProperties) {
        (**self).annotate(kind, message, properties)
    }

    fn transcript(&mut self, stream: Stream, chunk: &str) {
        (**self).transcript(stream, chunk)
    }

    fn set_failed(&mut self, message: &str) {
        (**self).set_failed(message)
    }
}

/// A recorded annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub kind: AnnotationKind,
    pub message: String,
    pub properties: AnnotationProperties,
}

/// A sink that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Annotations in the order they were reported.
    pub annotations: Vec<Annotation>,
    /// Raw chunks in the order they were received.
    pub transcript: Vec<(Stream, String)>,
    /// Failure messages; a well-behaved build reports at most one.
    pub failures: Vec<String>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the annotations of one kind.
    pub fn of_kind(&self, kind: AnnotationKind) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(move |a| a.kind == kind)
    }
}

impl DiagnosticSink for MemorySink {
    fn annotate(&mut self, kind: AnnotationKind, message: &str, properties: &AnnotationProperties) {
        self.annotations.push(Annotation {
            kind,
            message: message.to_string(),
            properties: properties.clone(),
        });
    }

    fn transcript(&mut self, stream: Stream, chunk: &str) {
        self.transcript.push((stream, chunk.to_string()));
    }

    fn set_failed(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }
}
