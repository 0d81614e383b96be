//! Maps classified records onto sink annotations.

use crate::diagnostic::DiagnosticRecord;
use crate::sink::{AnnotationProperties, DiagnosticSink};

/// Reports a record to the sink.
///
/// Records describe a single position, so the line and column are used as
/// both the start and the end of the annotated range.
pub fn emit<S: DiagnosticSink + ?Sized>(record: &DiagnosticRecord, sink: &mut S) {
    let properties = AnnotationProperties {
        file: Some(record.file_path.clone()),
        start_line: record.line,
        end_line: record.line,
        start_column: record.column,
        end_column: record.column,
    };

    sink.annotate(record.severity.into(), &record.message, &properties);
}
